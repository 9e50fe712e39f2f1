//! # prime-period
//!
//! Minimal (prime) period resolution for periodic orbits.
//!
//! Orbit detectors often converge to a harmonic of a periodic orbit and report
//! a period `T` that is a multiple of the true one. This library finds the
//! smallest period under which the orbit returns to its reference point and
//! regenerates the orbit at that period:
//!
//! - **Maps** ([`discrete_minimal_period`]): smallest divisor of `T` under
//!   which iterating returns within `atol`
//! - **Flows** ([`continuous_minimal_period`]): first return to a hyperplane
//!   transversal to the flow at the reference point, via a [`SectionMap`]
//! - **Reconstruction** ([`complete_orbit`]): resample one full period
//! - **Entry point** ([`minimal_period()`]): validation, dispatch and
//!   reconstruction; [`minimal_periods`] runs many orbits in parallel
//! - **Built-in systems**: [`IteratedMap`] over [`MapFn`] (standard, Hénon,
//!   logistic maps) and RK4-integrated [`FlowSystem`] over [`VectorField`]
//!
//! ## Quick Start
//!
//! ```rust
//! use prime_period::{
//!     complete_orbit, minimal_period, IteratedMap, Period, PeriodConfig, PeriodicOrbit,
//!     StandardMap,
//! };
//!
//! // With epsilon = 0 the point (0.1, 0.5) has period 2
//! let mut system = IteratedMap::new(StandardMap { epsilon: 0.0 }, &[0.0, 0.0]).unwrap();
//! let points = complete_orbit(&mut system, &[0.1, 0.5], Period::Discrete(6), 1.0).unwrap();
//! let orbit = PeriodicOrbit::new(points, Period::Discrete(6), true).unwrap();
//!
//! let result = minimal_period(&mut system, orbit, &PeriodConfig::default()).unwrap();
//! assert_eq!(result.period(), Period::Discrete(2));
//! ```
//!
//! Progress is reported through the [`log`] facade. A continuous search that
//! runs out of crossings logs a warning and reports `converged = false`.

pub mod types;

pub mod batch;
pub mod flows;
pub mod maps;
pub mod orbit;
pub mod period;
pub mod recurrence;
pub mod section;
pub mod system;

pub use batch::minimal_periods;
pub use flows::{ClosureField, DampedOscillator, FlowSystem, HarmonicOscillator, VectorField};
pub use maps::{ClosureMap, HenonMap, IteratedMap, LogisticMap, MapFn, StandardMap};
pub use orbit::complete_orbit;
pub use period::{
    continuous_minimal_period, discrete_minimal_period, estimate_period, minimal_period,
};
pub use recurrence::{euclidean_distance, recurs};
pub use section::{Hyperplane, SectionMap};
pub use system::{DynamicalSystem, Probe};
pub use types::{
    MinimalPeriod, Period, PeriodConfig, PeriodError, PeriodEstimate, PeriodicOrbit, TimeMode,
    DEFAULT_PARTITION,
};
