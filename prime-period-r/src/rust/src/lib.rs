use extendr_api::prelude::*;
use prime_period as pp;
use pp::DynamicalSystem;

// ============================================================================
// Helper conversions
// ============================================================================

/// Columns of an R matrix (dim x n_points) as state vectors.
fn rmatrix_to_points(x: RMatrix<f64>) -> std::result::Result<Vec<Vec<f64>>, Error> {
    let nrows = x.nrows();
    let ncols = x.ncols();
    let data = x
        .as_real_slice()
        .ok_or_else(|| Error::Other("points must be a numeric matrix".to_string()))?;
    // R matrices are column-major, so each column is contiguous
    Ok((0..ncols)
        .map(|j| data[j * nrows..(j + 1) * nrows].to_vec())
        .collect())
}

fn faer_to_rmatrix(m: &faer::Mat<f64>) -> RMatrix<f64> {
    RMatrix::new_matrix(m.nrows(), m.ncols(), |r, c| m[(r, c)])
}

fn points_to_rmatrix(points: &[Vec<f64>]) -> RMatrix<f64> {
    let dim = points.first().map_or(0, |p| p.len());
    RMatrix::new_matrix(dim, points.len(), |r, c| points[c][r])
}

fn period_err(e: pp::PeriodError) -> Error {
    Error::Other(e.to_string())
}

fn make_period(period: f64, discrete: bool) -> std::result::Result<pp::Period, Error> {
    if !discrete {
        return Ok(pp::Period::Continuous(period));
    }
    if period < 1.0 || period.fract() != 0.0 {
        return Err(Error::Other(format!(
            "discrete period must be a positive integer, got {period}"
        )));
    }
    Ok(pp::Period::Discrete(period as usize))
}

// ============================================================================
// Minimal period
// ============================================================================

/// Reduce a periodic orbit to its minimal period.
/// @param system Character system name.
/// @param points Numeric matrix (dim x n_points), first column is the reference point.
/// @param period Numeric reported period (integer-valued for maps).
/// @param stable Logical stability flag, passed through.
/// @param atol Numeric recurrence tolerance.
/// @param maxiter Integer section crossings scanned (flows only).
/// @param partition Integer samples per period for regenerated flow orbits.
/// @param dt Numeric integration step (flows only).
/// @param params Named list of system parameters.
/// @return List with points, period, discrete, converged, reduced, stable.
/// @export
#[extendr]
#[allow(clippy::too_many_arguments)]
fn rust_minimal_period(
    system: &str,
    points: RMatrix<f64>,
    period: f64,
    stable: bool,
    atol: f64,
    maxiter: i32,
    partition: i32,
    dt: f64,
    params: List,
) -> Result<List> {
    if maxiter < 0 || partition < 1 {
        return Err(Error::Other(
            "maxiter must be non-negative and partition positive".to_string(),
        ));
    }
    let points = rmatrix_to_points(points)?;
    let mut sys = make_system(system, &params, dt)?;
    let orbit = pp::PeriodicOrbit::new(points, make_period(period, sys.is_discrete())?, stable)
        .map_err(period_err)?;
    let config = pp::PeriodConfig {
        atol,
        maxiter: maxiter as usize,
        partition: partition as usize,
    };

    let result = pp::minimal_period(sys.as_mut(), orbit, &config).map_err(period_err)?;

    Ok(list!(
        points = faer_to_rmatrix(&result.orbit.to_matrix()),
        period = result.period().as_f64(),
        discrete = matches!(result.period(), pp::Period::Discrete(_)),
        converged = result.converged,
        reduced = result.reduced,
        stable = result.orbit.stable
    ))
}

/// Sample one period of the orbit through an initial condition.
/// @param system Character system name.
/// @param initial_condition Numeric vector.
/// @param period Numeric period (integer-valued for maps).
/// @param interval Numeric sampling interval.
/// @param dt Numeric integration step (flows only).
/// @param params Named list of system parameters.
/// @return Numeric matrix (dim x n_points).
/// @export
#[extendr]
fn rust_complete_orbit(
    system: &str,
    initial_condition: Vec<f64>,
    period: f64,
    interval: f64,
    dt: f64,
    params: List,
) -> Result<RMatrix<f64>> {
    let mut sys = make_system(system, &params, dt)?;
    let period = make_period(period, sys.is_discrete())?;
    let points = pp::complete_orbit(sys.as_mut(), &initial_condition, period, interval)
        .map_err(period_err)?;
    Ok(points_to_rmatrix(&points))
}

// ============================================================================
// Systems
// ============================================================================

fn make_system(
    name: &str,
    params: &List,
    dt: f64,
) -> std::result::Result<Box<dyn DynamicalSystem>, Error> {
    let get_f64 = |key: &str, default: f64| -> f64 {
        params
            .dollar(key)
            .ok()
            .and_then(|v: Robj| v.as_real())
            .unwrap_or(default)
    };

    match name {
        "standard" => Ok(Box::new(pp::IteratedMap::new(
            pp::StandardMap {
                epsilon: get_f64("epsilon", 0.12),
            },
            &[0.0, 0.0],
        )
        .map_err(period_err)?)),
        "henon" => Ok(Box::new(pp::IteratedMap::new(
            pp::HenonMap {
                a: get_f64("a", 1.4),
                b: get_f64("b", 0.3),
            },
            &[0.0, 0.0],
        )
        .map_err(period_err)?)),
        "logistic" => Ok(Box::new(pp::IteratedMap::new(
            pp::LogisticMap {
                r: get_f64("r", 3.9),
            },
            &[0.5],
        )
        .map_err(period_err)?)),
        "harmonic" => {
            let field = pp::HarmonicOscillator {
                omega: get_f64("omega", 1.0),
            };
            Ok(Box::new(
                pp::FlowSystem::new(field, &[0.0, 0.0], dt).map_err(period_err)?,
            ))
        }
        "damped" => {
            let field = pp::DampedOscillator {
                omega: get_f64("omega", 1.0),
                zeta: get_f64("zeta", 0.05),
            };
            Ok(Box::new(
                pp::FlowSystem::new(field, &[0.0, 0.0], dt).map_err(period_err)?,
            ))
        }
        _ => Err(Error::Other(format!(
            "Unknown system: '{}'. Use 'standard', 'henon', 'logistic', 'harmonic', or 'damped'.",
            name
        ))),
    }
}

// ============================================================================
// Module registration
// ============================================================================

extendr_module! {
    mod prime_period_r;
    fn rust_minimal_period;
    fn rust_complete_orbit;
}
