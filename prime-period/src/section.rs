use crate::system::{check_dim, DynamicalSystem};
use crate::types::PeriodError;

/// Default bound on nominal steps taken while looking for one crossing.
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

const MAX_REFINE: usize = 50;
const REFINE_TOL: f64 = 1e-12;

/// Hyperplane {u : n·u = b}.
#[derive(Debug, Clone, PartialEq)]
pub struct Hyperplane {
    pub normal: Vec<f64>,
    pub offset: f64,
}

impl Hyperplane {
    pub fn new(normal: Vec<f64>, offset: f64) -> Self {
        Self { normal, offset }
    }

    /// Plane through `point` with the given normal: b = n·point.
    pub fn through(point: &[f64], normal: Vec<f64>) -> Self {
        let offset = dot(&normal, point);
        Self { normal, offset }
    }

    /// n·u − b. Positive on the side the normal points to.
    pub fn signed_distance(&self, u: &[f64]) -> f64 {
        dot(&self.normal, u) - self.offset
    }

    pub fn normal_norm(&self) -> f64 {
        dot(&self.normal, &self.normal).sqrt()
    }

    fn contains(&self, u: &[f64]) -> bool {
        self.signed_distance(u).abs() <= REFINE_TOL * self.normal_norm() * (1.0 + self.offset.abs())
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Poincaré map of a system on a hyperplane.
///
/// Only crossings in the direction of the normal count (n·u − b goes from
/// negative to non-negative). For continuous-time systems the crossing is
/// located inside the bracketing step by regula falsi (Illinois variant).
///
/// Holds the system exclusively for its lifetime.
pub struct SectionMap<'a, S: DynamicalSystem + ?Sized> {
    system: &'a mut S,
    plane: Hyperplane,
    max_steps: usize,
    // current crossing
    crossing: Vec<f64>,
    crossing_time: f64,
    // time of the system state since the map was built
    clock: f64,
    prev: Vec<f64>,
    post: Vec<f64>,
}

impl<'a, S: DynamicalSystem + ?Sized> SectionMap<'a, S> {
    /// Build the map from `start`.
    ///
    /// If `start` lies on the plane it is the current crossing, at time 0.
    /// Otherwise the system is advanced to the first crossing.
    pub fn new(system: &'a mut S, plane: Hyperplane, start: &[f64]) -> Result<Self, PeriodError> {
        Self::with_max_steps(system, plane, start, DEFAULT_MAX_STEPS)
    }

    pub fn with_max_steps(
        system: &'a mut S,
        plane: Hyperplane,
        start: &[f64],
        max_steps: usize,
    ) -> Result<Self, PeriodError> {
        if plane.normal.len() != system.dim() {
            return Err(PeriodError::DimensionMismatch {
                expected: system.dim(),
                found: plane.normal.len(),
            });
        }
        check_dim(system, start)?;
        if plane.normal_norm() == 0.0 {
            return Err(PeriodError::InvalidInput(
                "section normal must be non-zero".to_string(),
            ));
        }
        system.reinit(start);
        let on_plane = plane.contains(start);
        let mut map = Self {
            system,
            plane,
            max_steps,
            crossing: start.to_vec(),
            crossing_time: 0.0,
            clock: 0.0,
            prev: Vec::with_capacity(start.len()),
            post: Vec::with_capacity(start.len()),
        };
        if !on_plane && map.next_crossing().is_none() {
            return Err(PeriodError::InvalidInput(format!(
                "trajectory did not reach the section within {max_steps} steps"
            )));
        }
        Ok(map)
    }

    /// Advance to the next crossing and return its time, or `None` if no
    /// crossing happens within the step budget.
    pub fn next_crossing(&mut self) -> Option<f64> {
        let mut g_prev = self.plane.signed_distance(self.system.state());
        for _ in 0..self.max_steps {
            self.prev.clear();
            self.prev.extend_from_slice(self.system.state());
            let t_before = self.system.time();

            self.system.step();

            let h = self.system.time() - t_before;
            let g = self.plane.signed_distance(self.system.state());
            if !g.is_finite() {
                return None;
            }
            if g_prev < 0.0 && g >= 0.0 {
                let tau = if g == 0.0 || self.system.is_discrete() {
                    self.crossing.clear();
                    self.crossing.extend_from_slice(self.system.state());
                    h
                } else {
                    self.locate(h, g_prev, g)
                };
                self.crossing_time = self.clock + tau;
                self.clock += h;
                log::trace!("section crossing at t = {}", self.crossing_time);
                return Some(self.crossing_time);
            }
            self.clock += h;
            g_prev = g;
        }
        None
    }

    /// Find the sub-step `tau` in (0, h] where the bracketed crossing
    /// happens, store the crossing state, and leave the system at the end
    /// of the step.
    fn locate(&mut self, h: f64, g_lo: f64, g_hi: f64) -> f64 {
        self.post.clear();
        self.post.extend_from_slice(self.system.state());

        let tol = REFINE_TOL * self.plane.normal_norm();
        let (mut lo, mut hi, mut f_lo, mut f_hi) = (0.0, h, g_lo, g_hi);
        let mut side = 0i8;
        let mut tau = hi;
        self.crossing.clear();
        self.crossing.extend_from_slice(&self.post);

        for _ in 0..MAX_REFINE {
            let guess = (lo * f_hi - hi * f_lo) / (f_hi - f_lo);
            self.system.reinit(&self.prev);
            self.system.advance(guess);
            let f = self.plane.signed_distance(self.system.state());
            tau = guess;
            self.crossing.clear();
            self.crossing.extend_from_slice(self.system.state());
            if f.abs() <= tol || hi - lo <= f64::EPSILON * h {
                break;
            }
            if f < 0.0 {
                lo = guess;
                f_lo = f;
                if side == -1 {
                    f_hi *= 0.5;
                }
                side = -1;
            } else {
                hi = guess;
                f_hi = f;
                if side == 1 {
                    f_lo *= 0.5;
                }
                side = 1;
            }
        }

        self.system.reinit(&self.post);
        tau
    }

    /// State at the current crossing.
    pub fn state(&self) -> &[f64] {
        &self.crossing
    }

    /// Time of the current crossing, measured from construction.
    pub fn time(&self) -> f64 {
        self.crossing_time
    }
}
