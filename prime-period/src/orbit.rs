use crate::system::{check_dim, iterations_in, DynamicalSystem};
use crate::types::{Period, PeriodError};

/// Sample one full period of the orbit through `u0`.
///
/// The system is reset to `u0` and the state recorded every `interval`
/// time units. Discrete periods use a whole-iteration stride and yield
/// `period / stride` points; continuous periods yield
/// `round(period / interval)` points at times 0, Δt, 2Δt, ... The closing
/// point, which repeats `u0`, is not included.
pub fn complete_orbit<S: DynamicalSystem + ?Sized>(
    system: &mut S,
    u0: &[f64],
    period: Period,
    interval: f64,
) -> Result<Vec<Vec<f64>>, PeriodError> {
    check_dim(system, u0)?;
    if !(interval.is_finite() && interval > 0.0) {
        return Err(PeriodError::InvalidInput(format!(
            "sampling interval must be positive, got {interval}"
        )));
    }

    match period {
        Period::Discrete(t) => {
            if t == 0 {
                return Err(PeriodError::InvalidInput(
                    "discrete period must be positive".to_string(),
                ));
            }
            let stride = iterations_in(interval).max(1);
            let n_points = t.div_ceil(stride);
            system.reinit(u0);
            let mut points = Vec::with_capacity(n_points);
            points.push(u0.to_vec());
            for _ in 1..n_points {
                system.step_n(stride);
                points.push(system.state().to_vec());
            }
            Ok(points)
        }
        Period::Continuous(t) => {
            if !(t.is_finite() && t > 0.0) {
                return Err(PeriodError::InvalidInput(format!(
                    "continuous period must be positive, got {t}"
                )));
            }
            let n_points = ((t / interval).round() as usize).max(1);
            system.reinit(u0);
            let mut points = Vec::with_capacity(n_points);
            points.push(u0.to_vec());
            for _ in 1..n_points {
                system.advance(interval);
                points.push(system.state().to_vec());
            }
            Ok(points)
        }
    }
}
