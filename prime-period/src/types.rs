use faer::Mat;

/// Number of samples per period used when regenerating continuous-time orbits.
pub const DEFAULT_PARTITION: usize = 100;

/// Error types for minimal-period operations.
#[derive(Debug, thiserror::Error)]
pub enum PeriodError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("time mode mismatch: system is {system}, orbit is {orbit}")]
    TimeModeMismatch { system: TimeMode, orbit: TimeMode },

    #[error("dimension mismatch: system has dimension {expected}, state has {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Whether a system evolves by map iteration or by integrating a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMode {
    Discrete,
    Continuous,
}

impl std::fmt::Display for TimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeMode::Discrete => write!(f, "discrete"),
            TimeMode::Continuous => write!(f, "continuous"),
        }
    }
}

/// Period of an orbit: an iteration count for maps, a time span for flows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Period {
    Discrete(usize),
    Continuous(f64),
}

impl Period {
    /// Timing mode implied by the period's variant.
    pub fn time_mode(&self) -> TimeMode {
        match self {
            Period::Discrete(_) => TimeMode::Discrete,
            Period::Continuous(_) => TimeMode::Continuous,
        }
    }

    /// Period as a real number of time units (steps for discrete periods).
    pub fn as_f64(&self) -> f64 {
        match *self {
            Period::Discrete(n) => n as f64,
            Period::Continuous(t) => t,
        }
    }

    fn validate(&self) -> Result<(), PeriodError> {
        match *self {
            Period::Discrete(0) => Err(PeriodError::InvalidInput(
                "discrete period must be positive".to_string(),
            )),
            Period::Continuous(t) if !(t.is_finite() && t > 0.0) => Err(
                PeriodError::InvalidInput(format!("continuous period must be positive, got {t}")),
            ),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Discrete(n) => write!(f, "{n}"),
            Period::Continuous(t) => write!(f, "{t}"),
        }
    }
}

/// A periodic orbit as reported by an orbit detector.
///
/// `points[0]` is the reference point the period is measured from.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicOrbit {
    points: Vec<Vec<f64>>,
    period: Period,
    /// Stability flag, carried through untouched.
    pub stable: bool,
}

impl PeriodicOrbit {
    /// Create an orbit, checking that it has at least one point, that all
    /// points share a dimension, and that the period is positive.
    pub fn new(points: Vec<Vec<f64>>, period: Period, stable: bool) -> Result<Self, PeriodError> {
        let dim = match points.first() {
            Some(p) if !p.is_empty() => p.len(),
            Some(_) => {
                return Err(PeriodError::InvalidInput(
                    "orbit points must have at least one coordinate".to_string(),
                ))
            }
            None => {
                return Err(PeriodError::InvalidInput(
                    "orbit must contain at least one point".to_string(),
                ))
            }
        };
        if let Some(bad) = points.iter().find(|p| p.len() != dim) {
            return Err(PeriodError::DimensionMismatch {
                expected: dim,
                found: bad.len(),
            });
        }
        period.validate()?;
        Ok(Self {
            points,
            period,
            stable,
        })
    }

    /// Ordered points of the orbit.
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// Reference point the period is measured from.
    pub fn reference_point(&self) -> &[f64] {
        &self.points[0]
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn time_mode(&self) -> TimeMode {
        self.period.time_mode()
    }

    /// State space dimension.
    pub fn dim(&self) -> usize {
        self.points[0].len()
    }

    /// Number of sampled points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as a matrix (dim × n_points), one column per point.
    pub fn to_matrix(&self) -> Mat<f64> {
        let (n_dim, n_points) = (self.dim(), self.len());
        let mut m = Mat::<f64>::zeros(n_dim, n_points);
        for (j, p) in self.points.iter().enumerate() {
            for (i, &v) in p.iter().enumerate() {
                m[(i, j)] = v;
            }
        }
        m
    }

    /// Consume the orbit, returning its points.
    pub fn into_points(self) -> Vec<Vec<f64>> {
        self.points
    }
}

/// Configuration for minimal-period resolution.
#[derive(Debug, Clone)]
pub struct PeriodConfig {
    /// Recurrence distance threshold (Euclidean).
    pub atol: f64,
    /// Maximum number of section crossings scanned (continuous time only).
    pub maxiter: usize,
    /// Samples per period when a continuous orbit is regenerated.
    pub partition: usize,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            atol: 1e-4,
            maxiter: 40,
            partition: DEFAULT_PARTITION,
        }
    }
}

impl PeriodConfig {
    pub(crate) fn validate(&self) -> Result<(), PeriodError> {
        if !(self.atol.is_finite() && self.atol >= 0.0) {
            return Err(PeriodError::InvalidInput(format!(
                "atol must be finite and non-negative, got {}",
                self.atol
            )));
        }
        if self.partition == 0 {
            return Err(PeriodError::InvalidInput(
                "partition must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a single period search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodEstimate {
    /// Smallest period found, or the reported period on fallback.
    pub period: Period,
    /// False when the search ran out of budget and fell back.
    pub converged: bool,
}

/// Result of minimal-period resolution.
#[derive(Debug, Clone)]
pub struct MinimalPeriod {
    /// The orbit at its minimal period. This is the input orbit itself when
    /// the period was not reduced.
    pub orbit: PeriodicOrbit,
    /// False when the continuous search was inconclusive.
    pub converged: bool,
    /// Whether the period was reduced and the orbit regenerated.
    pub reduced: bool,
}

impl MinimalPeriod {
    pub fn period(&self) -> Period {
        self.orbit.period()
    }
}
