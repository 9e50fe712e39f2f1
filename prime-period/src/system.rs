use crate::types::{PeriodError, TimeMode};

/// A stateful dynamical system that can be re-initialized and stepped.
///
/// Searches mutate the system in place and do not restore its prior state.
pub trait DynamicalSystem {
    /// Reset to `state`, with elapsed time zero.
    fn reinit(&mut self, state: &[f64]);

    /// Advance by one nominal step (one map iteration, or one integrator step).
    fn step(&mut self);

    /// Advance by `n` nominal steps.
    fn step_n(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Advance by a span of time. Discrete systems round to whole iterations.
    fn advance(&mut self, span: f64);

    /// Current state.
    fn state(&self) -> &[f64];

    /// Time elapsed since the last `reinit`.
    fn time(&self) -> f64;

    fn time_mode(&self) -> TimeMode;

    /// State space dimension.
    fn dim(&self) -> usize;

    fn is_discrete(&self) -> bool {
        self.time_mode() == TimeMode::Discrete
    }
}

/// Scoped handle over a system that has been reset to a start state.
///
/// Each probe borrows the system exclusively, so the stepping done through
/// one probe ends before the next one can reset the system.
pub struct Probe<'a, S: DynamicalSystem + ?Sized> {
    system: &'a mut S,
}

impl<'a, S: DynamicalSystem + ?Sized> Probe<'a, S> {
    /// Reset `system` to `start` and hand out a probe over it.
    pub fn start(system: &'a mut S, start: &[f64]) -> Self {
        system.reinit(start);
        Self { system }
    }

    /// Advance by `n` nominal steps and return the state reached.
    pub fn run(self, n: usize) -> &'a [f64] {
        let system = self.system;
        system.step_n(n);
        let system: &'a S = system;
        system.state()
    }
}

/// Check that `state` has the dimension `system` expects.
pub fn check_dim<S: DynamicalSystem + ?Sized>(
    system: &S,
    state: &[f64],
) -> Result<(), PeriodError> {
    if state.len() != system.dim() {
        return Err(PeriodError::DimensionMismatch {
            expected: system.dim(),
            found: state.len(),
        });
    }
    Ok(())
}

/// Number of whole iterations closest to `span`, for discrete systems.
pub(crate) fn iterations_in(span: f64) -> usize {
    if span.is_finite() && span > 0.0 {
        span.round() as usize
    } else {
        0
    }
}
