use rayon::prelude::*;

use crate::period::minimal_period;
use crate::system::DynamicalSystem;
use crate::types::{MinimalPeriod, PeriodConfig, PeriodError, PeriodicOrbit};

/// Resolve the minimal period of many orbits in parallel.
///
/// A system is stepped by one search at a time, so every rayon worker builds
/// its own instance with `make_system` and reuses it for the orbits it
/// handles. Results come back in input order.
pub fn minimal_periods<S, F>(
    make_system: F,
    orbits: Vec<PeriodicOrbit>,
    config: &PeriodConfig,
) -> Vec<Result<MinimalPeriod, PeriodError>>
where
    S: DynamicalSystem,
    F: Fn() -> S + Send + Sync,
{
    orbits
        .into_par_iter()
        .map_init(&make_system, |system, orbit| {
            minimal_period(system, orbit, config)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::{IteratedMap, StandardMap};
    use crate::types::Period;

    #[test]
    fn test_batch_matches_sequential() {
        let make = || IteratedMap::new(StandardMap { epsilon: 0.0 }, &[0.0, 0.0]).unwrap();
        let orbits: Vec<PeriodicOrbit> = [(0.5, 4), (0.25, 8), (0.2, 10), (0.25, 7)]
            .iter()
            .map(|&(y, t)| PeriodicOrbit::new(vec![vec![0.1, y]], Period::Discrete(t), false))
            .collect::<Result<_, _>>()
            .unwrap();

        let config = PeriodConfig::default();
        let parallel = minimal_periods(make, orbits.clone(), &config);

        let mut sys = make();
        for (orbit, par) in orbits.into_iter().zip(parallel) {
            let seq = minimal_period(&mut sys, orbit, &config).unwrap();
            assert_eq!(par.unwrap().period(), seq.period());
        }
    }

    #[test]
    fn test_batch_keeps_errors_per_orbit() {
        let make = || IteratedMap::new(StandardMap { epsilon: 0.0 }, &[0.0, 0.0]).unwrap();
        let orbits = vec![
            PeriodicOrbit::new(vec![vec![0.1, 0.5]], Period::Discrete(4), false).unwrap(),
            PeriodicOrbit::new(vec![vec![0.1, 0.5]], Period::Continuous(4.0), false).unwrap(),
        ];
        let results = minimal_periods(make, orbits, &PeriodConfig::default());
        assert_eq!(results[0].as_ref().unwrap().period(), Period::Discrete(2));
        assert!(results[1].is_err());
    }
}
