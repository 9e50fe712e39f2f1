use crate::system::DynamicalSystem;
use crate::types::{PeriodError, TimeMode};

/// Autonomous vector field du/dt = f(u).
pub trait VectorField: Send + Sync {
    /// Evaluate f(u) into `dudt`.
    fn rhs(&self, state: &[f64], dudt: &mut [f64]);

    /// State space dimension.
    fn dim(&self) -> usize;

    /// Field name.
    fn name(&self) -> &str;
}

/// Harmonic oscillator (2D, conservative).
///
/// x' = v
/// v' = -ω²·x
///
/// Every non-zero initial condition lies on a closed orbit of period 2π/ω.
#[derive(Debug, Clone)]
pub struct HarmonicOscillator {
    pub omega: f64,
}

impl Default for HarmonicOscillator {
    fn default() -> Self {
        Self { omega: 1.0 }
    }
}

impl HarmonicOscillator {
    pub fn period(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.omega
    }
}

impl VectorField for HarmonicOscillator {
    fn rhs(&self, state: &[f64], dudt: &mut [f64]) {
        dudt[0] = state[1];
        dudt[1] = -self.omega * self.omega * state[0];
    }
    fn dim(&self) -> usize {
        2
    }
    fn name(&self) -> &str {
        "harmonic_oscillator"
    }
}

/// Damped oscillator (2D, dissipative).
///
/// x' = v
/// v' = -ω²·x - 2ζω·v
///
/// For 0 < ζ < 1 trajectories spiral into the origin and never close.
#[derive(Debug, Clone)]
pub struct DampedOscillator {
    pub omega: f64,
    pub zeta: f64,
}

impl Default for DampedOscillator {
    fn default() -> Self {
        Self {
            omega: 1.0,
            zeta: 0.05,
        }
    }
}

impl VectorField for DampedOscillator {
    fn rhs(&self, state: &[f64], dudt: &mut [f64]) {
        dudt[0] = state[1];
        dudt[1] = -self.omega * self.omega * state[0] - 2.0 * self.zeta * self.omega * state[1];
    }
    fn dim(&self) -> usize {
        2
    }
    fn name(&self) -> &str {
        "damped_oscillator"
    }
}

/// A wrapper that turns a closure into a VectorField.
pub struct ClosureField<F: Fn(&[f64], &mut [f64]) + Send + Sync> {
    func: F,
    dim: usize,
    name: String,
}

impl<F: Fn(&[f64], &mut [f64]) + Send + Sync> ClosureField<F> {
    pub fn new(func: F, dim: usize, name: impl Into<String>) -> Self {
        Self {
            func,
            dim,
            name: name.into(),
        }
    }
}

impl<F: Fn(&[f64], &mut [f64]) + Send + Sync> VectorField for ClosureField<F> {
    fn rhs(&self, state: &[f64], dudt: &mut [f64]) {
        (self.func)(state, dudt)
    }
    fn dim(&self) -> usize {
        self.dim
    }
    fn name(&self) -> &str {
        &self.name
    }
}

/// A continuous-time system: a vector field integrated with classical
/// fourth-order Runge-Kutta at a fixed nominal step `dt`.
#[derive(Debug, Clone)]
pub struct FlowSystem<V: VectorField> {
    field: V,
    dt: f64,
    state: Vec<f64>,
    t: f64,
    // RK4 stage buffers
    k: [Vec<f64>; 4],
    tmp: Vec<f64>,
}

impl<V: VectorField> FlowSystem<V> {
    pub fn new(field: V, initial_condition: &[f64], dt: f64) -> Result<Self, PeriodError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PeriodError::InvalidInput(format!(
                "integration step must be positive, got {dt}"
            )));
        }
        let n = field.dim();
        if initial_condition.len() != n {
            return Err(PeriodError::DimensionMismatch {
                expected: n,
                found: initial_condition.len(),
            });
        }
        Ok(Self {
            field,
            dt,
            state: initial_condition.to_vec(),
            t: 0.0,
            k: [vec![0.0; n], vec![0.0; n], vec![0.0; n], vec![0.0; n]],
            tmp: vec![0.0; n],
        })
    }

    fn rk4(&mut self, h: f64) {
        let n = self.state.len();
        let [k1, k2, k3, k4] = &mut self.k;

        self.field.rhs(&self.state, k1);
        for i in 0..n {
            self.tmp[i] = self.state[i] + 0.5 * h * k1[i];
        }
        self.field.rhs(&self.tmp, k2);
        for i in 0..n {
            self.tmp[i] = self.state[i] + 0.5 * h * k2[i];
        }
        self.field.rhs(&self.tmp, k3);
        for i in 0..n {
            self.tmp[i] = self.state[i] + h * k3[i];
        }
        self.field.rhs(&self.tmp, k4);
        for i in 0..n {
            self.state[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
        self.t += h;
    }
}

impl<V: VectorField> DynamicalSystem for FlowSystem<V> {
    fn reinit(&mut self, state: &[f64]) {
        self.state.clear();
        self.state.extend_from_slice(state);
        self.t = 0.0;
    }

    fn step(&mut self) {
        self.rk4(self.dt);
    }

    /// Integrates over `span` in equal sub-steps no longer than `dt`.
    fn advance(&mut self, span: f64) {
        if !(span.is_finite() && span > 0.0) {
            return;
        }
        let n_sub = (span / self.dt).ceil().max(1.0) as usize;
        let h = span / n_sub as f64;
        for _ in 0..n_sub {
            self.rk4(h);
        }
    }

    fn state(&self) -> &[f64] {
        &self.state
    }

    fn time(&self) -> f64 {
        self.t
    }

    fn time_mode(&self) -> TimeMode {
        TimeMode::Continuous
    }

    fn dim(&self) -> usize {
        self.field.dim()
    }
}
