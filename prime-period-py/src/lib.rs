use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use pp::DynamicalSystem;

// ============================================================================
// Helper conversions
// ============================================================================

/// Columns of a (dim x n_points) array as state vectors.
fn columns_to_points(arr: &Array2<f64>) -> Vec<Vec<f64>> {
    let (nrows, ncols) = arr.dim();
    (0..ncols)
        .map(|j| (0..nrows).map(|i| arr[[i, j]]).collect())
        .collect()
}

fn faer_to_array2(m: &faer::Mat<f64>) -> Array2<f64> {
    let nrows = m.nrows();
    let ncols = m.ncols();
    Array2::from_shape_fn((nrows, ncols), |(i, j)| m[(i, j)])
}

fn period_err_to_py(e: pp::PeriodError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn make_period(period: f64, discrete: bool) -> PyResult<pp::Period> {
    if !discrete {
        return Ok(pp::Period::Continuous(period));
    }
    if period < 1.0 || period.fract() != 0.0 {
        return Err(PyValueError::new_err(format!(
            "discrete period must be a positive integer, got {period}"
        )));
    }
    Ok(pp::Period::Discrete(period as usize))
}

// ============================================================================
// Result class
// ============================================================================

/// Orbit reduced to its minimal period.
#[pyclass]
#[derive(Clone)]
struct MinimalPeriodResult {
    result: pp::MinimalPeriod,
}

#[pymethods]
impl MinimalPeriodResult {
    /// Orbit points (dim x n_points), first column is the reference point.
    #[getter]
    fn points<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        faer_to_array2(&self.result.orbit.to_matrix()).into_pyarray(py)
    }

    /// Minimal period (iterations for maps, time for flows).
    #[getter]
    fn period(&self) -> f64 {
        self.result.period().as_f64()
    }

    /// Whether the period is an iteration count.
    #[getter]
    fn discrete(&self) -> bool {
        matches!(self.result.period(), pp::Period::Discrete(_))
    }

    /// False when the continuous-time search ran out of crossings.
    #[getter]
    fn converged(&self) -> bool {
        self.result.converged
    }

    /// Whether the period was reduced and the orbit resampled.
    #[getter]
    fn reduced(&self) -> bool {
        self.result.reduced
    }

    /// Stability flag carried over from the input orbit.
    #[getter]
    fn stable(&self) -> bool {
        self.result.orbit.stable
    }

    fn __repr__(&self) -> String {
        format!(
            "MinimalPeriodResult(period={}, points={}, converged={}, reduced={})",
            self.result.period(),
            self.result.orbit.len(),
            self.result.converged,
            self.result.reduced
        )
    }
}

// ============================================================================
// Minimal period
// ============================================================================

/// Reduce a periodic orbit to its minimal period.
///
/// Parameters
/// ----------
/// system : str
///     System name: "standard", "henon", "logistic" (maps) or
///     "harmonic", "damped" (flows).
/// points : numpy.ndarray
///     Orbit points (dim x n_points); the first column is the reference point.
/// period : float
///     Reported period. Must be a positive integer for maps.
/// stable : bool
///     Stability flag, passed through.
/// atol : float
///     Recurrence tolerance.
/// maxiter : int
///     Section crossings scanned (flows only).
/// partition : int
///     Samples per period when a flow orbit is regenerated.
/// dt : float
///     Integration step (flows only).
/// params : dict, optional
///     System parameters (e.g., {"r": 3.2}).
///
/// Returns
/// -------
/// MinimalPeriodResult
#[pyfunction]
#[pyo3(signature = (system, points, period, stable=false, atol=1e-4, maxiter=40, partition=100, dt=0.01, params=None))]
#[allow(clippy::too_many_arguments)]
fn minimal_period<'py>(
    system: &str,
    points: PyReadonlyArray2<f64>,
    period: f64,
    stable: bool,
    atol: f64,
    maxiter: usize,
    partition: usize,
    dt: f64,
    params: Option<&Bound<'py, PyDict>>,
) -> PyResult<MinimalPeriodResult> {
    let points = columns_to_points(&points.as_array().to_owned());
    let mut sys = make_system(system, params, dt)?;
    let orbit = pp::PeriodicOrbit::new(points, make_period(period, sys.is_discrete())?, stable)
        .map_err(period_err_to_py)?;
    let config = pp::PeriodConfig {
        atol,
        maxiter,
        partition,
    };

    let result = pp::minimal_period(sys.as_mut(), orbit, &config).map_err(period_err_to_py)?;
    Ok(MinimalPeriodResult { result })
}

/// Sample one period of the orbit through an initial condition.
///
/// Parameters
/// ----------
/// system : str
///     System name (see minimal_period).
/// initial_condition : numpy.ndarray
///     Reference point.
/// period : float
///     Period to cover. Must be a positive integer for maps.
/// interval : float
///     Sampling interval (iterations for maps, time for flows).
/// dt : float
///     Integration step (flows only).
/// params : dict, optional
///     System parameters.
///
/// Returns
/// -------
/// numpy.ndarray
///     Orbit points (dim x n_points).
#[pyfunction]
#[pyo3(signature = (system, initial_condition, period, interval=1.0, dt=0.01, params=None))]
fn complete_orbit<'py>(
    py: Python<'py>,
    system: &str,
    initial_condition: PyReadonlyArray1<f64>,
    period: f64,
    interval: f64,
    dt: f64,
    params: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let u0 = initial_condition.as_array().to_vec();
    let mut sys = make_system(system, params, dt)?;
    let period = make_period(period, sys.is_discrete())?;
    let points =
        pp::complete_orbit(sys.as_mut(), &u0, period, interval).map_err(period_err_to_py)?;

    let dim = u0.len();
    let arr = Array2::from_shape_fn((dim, points.len()), |(i, j)| points[j][i]);
    Ok(arr.into_pyarray(py))
}

// ============================================================================
// Systems
// ============================================================================

fn make_system<'py>(
    name: &str,
    params: Option<&Bound<'py, PyDict>>,
    dt: f64,
) -> PyResult<Box<dyn DynamicalSystem>> {
    let get_f64 = |key: &str, default: f64| -> PyResult<f64> {
        match params {
            Some(d) => match d.get_item(key)? {
                Some(v) => v.extract::<f64>(),
                None => Ok(default),
            },
            None => Ok(default),
        }
    };

    match name {
        "standard" => {
            let map = pp::StandardMap {
                epsilon: get_f64("epsilon", 0.12)?,
            };
            let sys = pp::IteratedMap::new(map, &[0.0, 0.0]).map_err(period_err_to_py)?;
            Ok(Box::new(sys))
        }
        "henon" => {
            let map = pp::HenonMap {
                a: get_f64("a", 1.4)?,
                b: get_f64("b", 0.3)?,
            };
            let sys = pp::IteratedMap::new(map, &[0.0, 0.0]).map_err(period_err_to_py)?;
            Ok(Box::new(sys))
        }
        "logistic" => {
            let map = pp::LogisticMap {
                r: get_f64("r", 3.9)?,
            };
            let sys = pp::IteratedMap::new(map, &[0.5]).map_err(period_err_to_py)?;
            Ok(Box::new(sys))
        }
        "harmonic" => {
            let field = pp::HarmonicOscillator {
                omega: get_f64("omega", 1.0)?,
            };
            let flow = pp::FlowSystem::new(field, &[0.0, 0.0], dt).map_err(period_err_to_py)?;
            Ok(Box::new(flow))
        }
        "damped" => {
            let field = pp::DampedOscillator {
                omega: get_f64("omega", 1.0)?,
                zeta: get_f64("zeta", 0.05)?,
            };
            let flow = pp::FlowSystem::new(field, &[0.0, 0.0], dt).map_err(period_err_to_py)?;
            Ok(Box::new(flow))
        }
        _ => Err(PyValueError::new_err(format!(
            "unknown system: '{name}'. Use 'standard', 'henon', 'logistic', 'harmonic', or 'damped'"
        ))),
    }
}

// ============================================================================
// Module definition
// ============================================================================

/// Prime period - minimal period resolution for periodic orbits.
///
/// Classes
/// -------
/// MinimalPeriodResult : Orbit at its minimal period
///
/// Functions
/// ---------
/// minimal_period : Reduce an orbit to its minimal period
/// complete_orbit : Sample one period of an orbit
#[pymodule]
fn prime_period(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<MinimalPeriodResult>()?;
    m.add_function(wrap_pyfunction!(minimal_period, m)?)?;
    m.add_function(wrap_pyfunction!(complete_orbit, m)?)?;
    Ok(())
}
