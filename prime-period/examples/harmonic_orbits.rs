//! Reduce orbits reported at a multiple of their period.

use std::f64::consts::PI;

use prime_period::{
    complete_orbit, minimal_period, DampedOscillator, FlowSystem, HarmonicOscillator,
    IteratedMap, LogisticMap, Period, PeriodConfig, PeriodicOrbit,
};

fn main() {
    let config = PeriodConfig::default();

    // Logistic map: the 2-cycle at r = 3.2, reported as period 6
    let map = LogisticMap { r: 3.2 };
    let [a, _] = map.period_two_cycle().unwrap();
    let mut system = IteratedMap::new(map, &[a]).unwrap();
    let points = complete_orbit(&mut system, &[a], Period::Discrete(6), 1.0).unwrap();
    let orbit = PeriodicOrbit::new(points, Period::Discrete(6), true).unwrap();
    let result = minimal_period(&mut system, orbit, &config).unwrap();
    println!("Logistic 2-cycle:");
    println!("  Reported period: 6");
    println!("  Minimal period: {}", result.period());
    println!("  Points: {:?}", result.orbit.points());

    // Harmonic oscillator: closed orbit of period 2π, reported as 4π
    let mut system = FlowSystem::new(HarmonicOscillator::default(), &[1.0, 0.0], 0.01).unwrap();
    let orbit = PeriodicOrbit::new(vec![vec![1.0, 0.0]], Period::Continuous(4.0 * PI), false)
        .unwrap();
    let result = minimal_period(&mut system, orbit, &config).unwrap();
    println!("\nHarmonic oscillator:");
    println!("  Reported period: {:.6}", 4.0 * PI);
    println!("  Minimal period: {:.6} (2π = {:.6})", result.period().as_f64(), 2.0 * PI);
    println!("  Samples: {}", result.orbit.len());

    // Damped oscillator: never closes, so the search gives up
    let field = DampedOscillator {
        omega: 1.0,
        zeta: 0.01,
    };
    let mut system = FlowSystem::new(field, &[1.0, 0.0], 0.01).unwrap();
    let orbit = PeriodicOrbit::new(vec![vec![1.0, 0.0]], Period::Continuous(4.0 * PI), false)
        .unwrap();
    let result = minimal_period(&mut system, orbit, &config).unwrap();
    println!("\nDamped oscillator:");
    println!("  Converged: {}", result.converged);
    println!("  Period kept: {:.6}", result.period().as_f64());
}
