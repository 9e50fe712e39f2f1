use std::f64::consts::PI;

use crate::system::{iterations_in, DynamicalSystem};
use crate::types::{PeriodError, TimeMode};

/// A discrete-time rule u_{n+1} = f(u_n).
///
/// Wrapped in an [`IteratedMap`] to become a [`DynamicalSystem`].
pub trait MapFn: Send + Sync {
    /// Image of `state` under one application of the map.
    fn step(&self, state: &[f64]) -> Vec<f64>;

    fn dim(&self) -> usize;

    /// Short identifier used in log output.
    fn name(&self) -> &str;
}

/// Chirikov standard map (2D, symplectic/area-preserving).
///
/// y' = (y + ε sin(2πx)) mod 1
/// x' = (x + y') mod 1
///
/// With ε = 0 it is a family of circle rotations: the point (x, p/q) has
/// minimal period q.
#[derive(Debug, Clone)]
pub struct StandardMap {
    pub epsilon: f64,
}

impl Default for StandardMap {
    fn default() -> Self {
        Self { epsilon: 0.12 }
    }
}

impl MapFn for StandardMap {
    fn step(&self, state: &[f64]) -> Vec<f64> {
        let x = state[0];
        let y = state[1];
        let y_new = (y + self.epsilon * (2.0 * PI * x).sin()).rem_euclid(1.0);
        let x_new = (x + y_new).rem_euclid(1.0);
        vec![x_new, y_new]
    }
    fn dim(&self) -> usize {
        2
    }
    fn name(&self) -> &str {
        "standard_map"
    }
}

/// Hénon map (2D, dissipative).
///
/// x' = 1 - a·x² + y
/// y' = b·x
#[derive(Debug, Clone)]
pub struct HenonMap {
    pub a: f64,
    pub b: f64,
}

impl Default for HenonMap {
    fn default() -> Self {
        Self { a: 1.4, b: 0.3 }
    }
}

impl MapFn for HenonMap {
    fn step(&self, state: &[f64]) -> Vec<f64> {
        let x = state[0];
        let y = state[1];
        vec![1.0 - self.a * x * x + y, self.b * x]
    }
    fn dim(&self) -> usize {
        2
    }
    fn name(&self) -> &str {
        "henon_map"
    }
}

/// Logistic map (1D, dissipative).
///
/// x' = r·x·(1-x)
#[derive(Debug, Clone)]
pub struct LogisticMap {
    pub r: f64,
}

impl Default for LogisticMap {
    fn default() -> Self {
        Self { r: 3.9 }
    }
}

impl LogisticMap {
    /// The period-2 cycle, which exists for r > 3.
    pub fn period_two_cycle(&self) -> Option<[f64; 2]> {
        let r = self.r;
        if r <= 3.0 {
            return None;
        }
        let root = ((r - 3.0) * (r + 1.0)).sqrt();
        Some([(r + 1.0 + root) / (2.0 * r), (r + 1.0 - root) / (2.0 * r)])
    }
}

impl MapFn for LogisticMap {
    fn step(&self, state: &[f64]) -> Vec<f64> {
        let x = state[0];
        vec![self.r * x * (1.0 - x)]
    }
    fn dim(&self) -> usize {
        1
    }
    fn name(&self) -> &str {
        "logistic_map"
    }
}

/// A wrapper that turns a closure into a MapFn.
pub struct ClosureMap<F: Fn(&[f64]) -> Vec<f64> + Send + Sync> {
    func: F,
    dim: usize,
    name: String,
}

impl<F: Fn(&[f64]) -> Vec<f64> + Send + Sync> ClosureMap<F> {
    pub fn new(func: F, dim: usize, name: impl Into<String>) -> Self {
        Self {
            func,
            dim,
            name: name.into(),
        }
    }
}

impl<F: Fn(&[f64]) -> Vec<f64> + Send + Sync> MapFn for ClosureMap<F> {
    fn step(&self, state: &[f64]) -> Vec<f64> {
        (self.func)(state)
    }
    fn dim(&self) -> usize {
        self.dim
    }
    fn name(&self) -> &str {
        &self.name
    }
}

/// A discrete-time system: a map together with its current state.
#[derive(Debug, Clone)]
pub struct IteratedMap<M: MapFn> {
    map: M,
    state: Vec<f64>,
    n: usize,
}

impl<M: MapFn> IteratedMap<M> {
    pub fn new(map: M, initial_condition: &[f64]) -> Result<Self, PeriodError> {
        if initial_condition.len() != map.dim() {
            return Err(PeriodError::DimensionMismatch {
                expected: map.dim(),
                found: initial_condition.len(),
            });
        }
        Ok(Self {
            map,
            state: initial_condition.to_vec(),
            n: 0,
        })
    }
}

impl<M: MapFn> DynamicalSystem for IteratedMap<M> {
    fn reinit(&mut self, state: &[f64]) {
        self.state.clear();
        self.state.extend_from_slice(state);
        self.n = 0;
    }

    fn step(&mut self) {
        self.state = self.map.step(&self.state);
        self.n += 1;
    }

    fn advance(&mut self, span: f64) {
        self.step_n(iterations_in(span));
    }

    fn state(&self) -> &[f64] {
        &self.state
    }

    fn time(&self) -> f64 {
        self.n as f64
    }

    fn time_mode(&self) -> TimeMode {
        TimeMode::Discrete
    }

    fn dim(&self) -> usize {
        self.map.dim()
    }
}
