//! Edge case and property tests for minimal-period resolution.

use approx::assert_abs_diff_eq;
use prime_period::*;
use std::f64::consts::PI;

/// Wraps a system and counts every call that moves or resets it.
struct Counting<S> {
    inner: S,
    calls: usize,
}

impl<S: DynamicalSystem> Counting<S> {
    fn new(inner: S) -> Self {
        Self { inner, calls: 0 }
    }
}

impl<S: DynamicalSystem> DynamicalSystem for Counting<S> {
    fn reinit(&mut self, state: &[f64]) {
        self.calls += 1;
        self.inner.reinit(state)
    }
    fn step(&mut self) {
        self.calls += 1;
        self.inner.step()
    }
    fn advance(&mut self, span: f64) {
        self.calls += 1;
        self.inner.advance(span)
    }
    fn state(&self) -> &[f64] {
        self.inner.state()
    }
    fn time(&self) -> f64 {
        self.inner.time()
    }
    fn time_mode(&self) -> TimeMode {
        self.inner.time_mode()
    }
    fn dim(&self) -> usize {
        self.inner.dim()
    }
}

/// y-coordinate giving minimal period `m` under the ε = 0 standard map.
fn rotation_number(m: usize) -> f64 {
    if m == 1 {
        0.0
    } else {
        1.0 / m as f64
    }
}

fn rotation() -> IteratedMap<StandardMap> {
    IteratedMap::new(StandardMap { epsilon: 0.0 }, &[0.0, 0.0]).unwrap()
}

fn oscillator() -> FlowSystem<HarmonicOscillator> {
    FlowSystem::new(HarmonicOscillator::default(), &[0.0, 0.0], 0.01).unwrap()
}

fn sampled_orbit<S: DynamicalSystem>(
    system: &mut S,
    u0: &[f64],
    period: Period,
    interval: f64,
) -> PeriodicOrbit {
    let points = complete_orbit(system, u0, period, interval).unwrap();
    PeriodicOrbit::new(points, period, false).unwrap()
}

// ============================================================================
// Discrete time: harmonics reduce to the fundamental
// ============================================================================

#[test]
fn discrete_harmonics_reduce_to_fundamental() {
    let mut sys = rotation();
    for m in 1..=5usize {
        for k in 1..=4usize {
            let u0 = [0.1, rotation_number(m)];
            let orbit = sampled_orbit(&mut sys, &u0, Period::Discrete(k * m), 1.0);
            let result = minimal_period(&mut sys, orbit, &PeriodConfig::default()).unwrap();
            assert_eq!(
                result.period(),
                Period::Discrete(m),
                "reported {} for true period {m}",
                k * m
            );
        }
    }
}

#[test]
fn discrete_period_always_divides_input() {
    let mut sys = IteratedMap::new(HenonMap::default(), &[0.0, 0.0]).unwrap();
    for t in 1..=24usize {
        let orbit = PeriodicOrbit::new(vec![vec![0.1, 0.1]], Period::Discrete(t), false).unwrap();
        let result = minimal_period(&mut sys, orbit, &PeriodConfig::default()).unwrap();
        let Period::Discrete(n) = result.period() else {
            panic!("discrete orbit came back continuous");
        };
        assert_eq!(t % n, 0, "{n} does not divide {t}");
    }
}

#[test]
fn discrete_reduced_orbit_samples_every_iteration() {
    let map = LogisticMap { r: 3.2 };
    let [a, b] = map.period_two_cycle().unwrap();
    let mut sys = IteratedMap::new(map, &[0.3]).unwrap();
    let orbit = PeriodicOrbit::new([vec![a], vec![b]].iter().cycle().take(8).cloned().collect(), Period::Discrete(8), true).unwrap();

    let result = minimal_period(&mut sys, orbit, &PeriodConfig::default()).unwrap();
    assert!(result.reduced);
    assert_eq!(result.period(), Period::Discrete(2));
    assert_eq!(result.orbit.len(), 2);
    assert_eq!(result.orbit.points()[0], vec![a]);
    assert_abs_diff_eq!(result.orbit.points()[1][0], b, epsilon = 1e-12);
    assert!(result.orbit.stable);
}

#[test]
fn closure_map_cycle_reduces() {
    // cyclic shift of coordinates: every generic point has period 3
    let shift = ClosureMap::new(|u: &[f64]| vec![u[1], u[2], u[0]], 3, "shift");
    let mut sys = IteratedMap::new(shift, &[0.0; 3]).unwrap();
    let u0 = [0.2, -1.0, 3.5];
    let orbit = sampled_orbit(&mut sys, &u0, Period::Discrete(12), 1.0);

    let result = minimal_period(&mut sys, orbit, &PeriodConfig::default()).unwrap();
    assert_eq!(result.period(), Period::Discrete(3));
    assert_eq!(result.orbit.points()[1], vec![-1.0, 3.5, 0.2]);
    assert_eq!(result.orbit.points()[2], vec![3.5, 0.2, -1.0]);
}

// ============================================================================
// Unchanged orbits come back as-is
// ============================================================================

#[test]
fn unchanged_orbit_is_identical() {
    let mut sys = rotation();
    let orbit = sampled_orbit(&mut sys, &[0.1, 0.25], Period::Discrete(4), 1.0);
    let copy = orbit.clone();

    let result = minimal_period(&mut sys, orbit, &PeriodConfig::default()).unwrap();
    assert!(!result.reduced);
    assert_eq!(result.orbit, copy);
}

#[test]
fn unchanged_orbit_keeps_caller_points() {
    // Points that are not a real orbit sampling are still handed back verbatim
    let mut sys = rotation();
    let points = vec![vec![0.1, 0.25], vec![9.0, 9.0], vec![-3.0, 0.5]];
    let orbit = PeriodicOrbit::new(points.clone(), Period::Discrete(4), false).unwrap();
    let result = minimal_period(&mut sys, orbit, &PeriodConfig::default()).unwrap();
    assert_eq!(result.orbit.into_points(), points);
}

#[test]
fn discrete_idempotent() {
    let mut sys = rotation();
    let orbit = sampled_orbit(&mut sys, &[0.1, 0.2], Period::Discrete(15), 1.0);
    let config = PeriodConfig::default();

    let once = minimal_period(&mut sys, orbit, &config).unwrap();
    let twice = minimal_period(&mut sys, once.orbit.clone(), &config).unwrap();
    assert_eq!(once.period(), Period::Discrete(5));
    assert!(!twice.reduced);
    assert_eq!(twice.orbit, once.orbit);
}

// ============================================================================
// Continuous time: section crossings
// ============================================================================

#[test]
fn continuous_double_period_halves() {
    let mut sys = oscillator();
    let p = HarmonicOscillator::default().period();
    let orbit = sampled_orbit(&mut sys, &[1.0, 0.0], Period::Continuous(2.0 * p), 0.05);

    let config = PeriodConfig::default();
    let result = minimal_period(&mut sys, orbit, &config).unwrap();
    assert!(result.converged);
    assert!(result.reduced);
    assert_abs_diff_eq!(result.period().as_f64(), p, epsilon = config.atol);
    assert_eq!(result.orbit.len(), config.partition);
    assert_eq!(result.orbit.reference_point(), &[1.0, 0.0]);
}

#[test]
fn continuous_partition_controls_density() {
    let osc = HarmonicOscillator { omega: 2.0 };
    let p = osc.period();
    let mut sys = FlowSystem::new(osc, &[0.0, 0.0], 0.005).unwrap();
    let orbit = PeriodicOrbit::new(vec![vec![0.0, 1.5]], Period::Continuous(3.0 * p), false)
        .unwrap();
    let config = PeriodConfig {
        partition: 40,
        ..Default::default()
    };

    let result = minimal_period(&mut sys, orbit, &config).unwrap();
    assert_abs_diff_eq!(result.period().as_f64(), p, epsilon = 1e-4);
    assert_eq!(result.orbit.len(), 40);
    // every sample lies on the energy level of the reference point
    for u in result.orbit.points() {
        let energy = 4.0 * u[0] * u[0] + u[1] * u[1];
        assert_abs_diff_eq!(energy, 2.25, epsilon = 1e-6);
    }
}

#[test]
fn continuous_idempotent() {
    let mut sys = oscillator();
    let orbit = PeriodicOrbit::new(vec![vec![0.5, 0.5]], Period::Continuous(4.0 * PI), false)
        .unwrap();
    let config = PeriodConfig::default();

    let once = minimal_period(&mut sys, orbit, &config).unwrap();
    let twice = minimal_period(&mut sys, once.orbit.clone(), &config).unwrap();
    assert!(once.reduced);
    assert!(!twice.reduced);
    assert_eq!(twice.orbit, once.orbit);
}

#[test]
fn continuous_spiral_falls_back() {
    let field = DampedOscillator {
        omega: 1.0,
        zeta: 0.01,
    };
    let mut sys = FlowSystem::new(field, &[0.0, 0.0], 0.01).unwrap();
    let orbit = PeriodicOrbit::new(vec![vec![1.0, 0.0]], Period::Continuous(4.0 * PI), false)
        .unwrap();
    let copy = orbit.clone();

    let result = minimal_period(&mut sys, orbit, &PeriodConfig::default()).unwrap();
    assert!(!result.converged);
    assert!(!result.reduced);
    assert_eq!(result.orbit, copy);
}

#[test]
fn continuous_budget_too_small_falls_back() {
    // closing the orbit takes one crossing, and none are allowed
    let mut sys = oscillator();
    let p = HarmonicOscillator::default().period();
    let orbit = PeriodicOrbit::new(vec![vec![1.0, 0.0]], Period::Continuous(3.0 * p), false)
        .unwrap();
    let config = PeriodConfig {
        maxiter: 0,
        ..Default::default()
    };
    let est = estimate_period(&mut sys, &orbit, &config).unwrap();
    assert!(!est.converged);
    assert_eq!(est.period, Period::Continuous(3.0 * p));
}

// ============================================================================
// Validation happens before any stepping
// ============================================================================

#[test]
fn mismatched_modes_do_not_step() {
    let mut discrete = Counting::new(rotation());
    let orbit = PeriodicOrbit::new(vec![vec![0.1, 0.5]], Period::Continuous(2.0), false).unwrap();
    let err = minimal_period(&mut discrete, orbit, &PeriodConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        PeriodError::TimeModeMismatch {
            system: TimeMode::Discrete,
            orbit: TimeMode::Continuous
        }
    ));
    assert_eq!(discrete.calls, 0);

    let mut continuous = Counting::new(oscillator());
    let orbit = PeriodicOrbit::new(vec![vec![1.0, 0.0]], Period::Discrete(2), false).unwrap();
    let err = minimal_period(&mut continuous, orbit, &PeriodConfig::default()).unwrap_err();
    assert!(matches!(err, PeriodError::TimeModeMismatch { .. }));
    assert_eq!(continuous.calls, 0);
}

#[test]
fn invalid_config_does_not_step() {
    let mut sys = Counting::new(rotation());
    let orbit = PeriodicOrbit::new(vec![vec![0.1, 0.5]], Period::Discrete(4), false).unwrap();
    let config = PeriodConfig {
        atol: -1.0,
        ..Default::default()
    };
    assert!(minimal_period(&mut sys, orbit, &config).is_err());
    assert_eq!(sys.calls, 0);
}

#[test]
fn period_one_needs_no_search() {
    let mut sys = Counting::new(rotation());
    let orbit = PeriodicOrbit::new(vec![vec![0.1, 0.0]], Period::Discrete(1), false).unwrap();
    let result = minimal_period(&mut sys, orbit, &PeriodConfig::default()).unwrap();
    assert_eq!(result.period(), Period::Discrete(1));
    assert_eq!(sys.calls, 0);
}

// ============================================================================
// Parallel batches
// ============================================================================

#[test]
fn batch_resolves_mixed_harmonics() {
    let orbits: Vec<PeriodicOrbit> = (1..=6)
        .map(|m| {
            PeriodicOrbit::new(
                vec![vec![0.3, rotation_number(m)]],
                Period::Discrete(m * 4),
                false,
            )
            .unwrap()
        })
        .collect();
    let results = minimal_periods(rotation, orbits, &PeriodConfig::default());
    for (m, result) in (1..=6).zip(results) {
        assert_eq!(result.unwrap().period(), Period::Discrete(m));
    }
}
