use crate::orbit::complete_orbit;
use crate::recurrence::recurs;
use crate::section::{Hyperplane, SectionMap};
use crate::system::{check_dim, DynamicalSystem, Probe};
use crate::types::{
    MinimalPeriod, Period, PeriodConfig, PeriodError, PeriodEstimate, PeriodicOrbit,
};

/// Smallest divisor `n` of `period` such that `n` iterations from `u0`
/// return within `atol` of `u0`, or `period` itself if none does.
///
/// Candidates are tried in increasing order, so the first hit is minimal.
pub fn discrete_minimal_period<S: DynamicalSystem + ?Sized>(
    system: &mut S,
    u0: &[f64],
    period: usize,
    atol: f64,
) -> usize {
    (1..period)
        .filter(|n| period % n == 0)
        .find(|&n| {
            let hit = recurs(Probe::start(system, u0).run(n), u0, atol);
            log::debug!("candidate period {n} of {period}: recurs = {hit}");
            hit
        })
        .unwrap_or(period)
}

/// First return time of the flow through `u0` to a neighbourhood of `u0`,
/// measured on a section transversal to the flow at `u0`.
///
/// The section is the hyperplane through `u0` whose normal is the
/// displacement after one nominal integration step. Up to `maxiter`
/// crossings are scanned, stopping early once a crossing lies beyond
/// `period + atol`. If none recurs within `atol` the reported `period` is
/// returned with `converged = false`, so a converged estimate never exceeds
/// it by more than `atol`.
pub fn continuous_minimal_period<S: DynamicalSystem + ?Sized>(
    system: &mut S,
    u0: &[f64],
    period: f64,
    atol: f64,
    maxiter: usize,
) -> PeriodEstimate {
    let fallback = PeriodEstimate {
        period: Period::Continuous(period),
        converged: false,
    };
    let u0 = u0.to_vec();

    let u1 = Probe::start(system, &u0).run(1);
    let normal: Vec<f64> = u1.iter().zip(&u0).map(|(a, b)| a - b).collect();
    if normal.iter().all(|&v| v == 0.0) || normal.iter().any(|v| !v.is_finite()) {
        log::warn!("no flow direction at the reference point; keeping period {period}");
        return fallback;
    }

    let plane = Hyperplane::through(&u0, normal);
    let mut section = match SectionMap::new(system, plane, &u0) {
        Ok(section) => section,
        Err(e) => {
            log::warn!("could not build a section at the reference point ({e}); keeping period {period}");
            return fallback;
        }
    };
    let t0 = section.time();

    for i in 0..maxiter {
        let Some(t) = section.next_crossing() else {
            log::debug!("section not crossed again after {i} crossings");
            break;
        };
        if t - t0 > period + atol {
            log::warn!(
                "no return to the reference point within period {period} \
                 (next crossing at {}); keeping period {period}",
                t - t0
            );
            return fallback;
        }
        if recurs(section.state(), &u0, atol) {
            log::debug!("returned to the reference point at crossing {}", i + 1);
            return PeriodEstimate {
                period: Period::Continuous(t - t0),
                converged: true,
            };
        }
    }

    log::warn!(
        "minimal period search did not converge within {maxiter} section crossings; \
         keeping period {period}"
    );
    fallback
}

fn check_time_mode<S: DynamicalSystem + ?Sized>(
    system: &S,
    orbit: &PeriodicOrbit,
) -> Result<(), PeriodError> {
    if system.time_mode() != orbit.time_mode() {
        return Err(PeriodError::TimeModeMismatch {
            system: system.time_mode(),
            orbit: orbit.time_mode(),
        });
    }
    Ok(())
}

/// Search for the minimal period of `orbit` without regenerating it.
pub fn estimate_period<S: DynamicalSystem + ?Sized>(
    system: &mut S,
    orbit: &PeriodicOrbit,
    config: &PeriodConfig,
) -> Result<PeriodEstimate, PeriodError> {
    config.validate()?;
    check_time_mode(system, orbit)?;
    check_dim(system, orbit.reference_point())?;

    let u0 = orbit.reference_point();
    Ok(match orbit.period() {
        Period::Discrete(t) => PeriodEstimate {
            period: Period::Discrete(discrete_minimal_period(system, u0, t, config.atol)),
            converged: true,
        },
        Period::Continuous(t) => {
            continuous_minimal_period(system, u0, t, config.atol, config.maxiter)
        }
    })
}

/// Reduce `orbit` to its minimal period.
///
/// When the period is not reduced the input orbit is handed back as-is.
/// Otherwise the orbit is regenerated from its reference point, one point per
/// iteration for maps and `partition` points per period for flows.
///
/// # Errors
/// [`PeriodError::TimeModeMismatch`] if the system and orbit disagree on
/// discrete/continuous time. Nothing is stepped in that case.
pub fn minimal_period<S: DynamicalSystem + ?Sized>(
    system: &mut S,
    orbit: PeriodicOrbit,
    config: &PeriodConfig,
) -> Result<MinimalPeriod, PeriodError> {
    let estimate = estimate_period(system, &orbit, config)?;

    let unchanged = match (estimate.period, orbit.period()) {
        (Period::Discrete(n), Period::Discrete(t)) => n == t,
        (Period::Continuous(p), Period::Continuous(t)) => (p - t).abs() <= config.atol,
        _ => true,
    };
    if unchanged {
        return Ok(MinimalPeriod {
            orbit,
            converged: estimate.converged,
            reduced: false,
        });
    }

    let interval = match estimate.period {
        Period::Discrete(_) => 1.0,
        Period::Continuous(p) => p / config.partition as f64,
    };
    log::debug!(
        "reducing period {} to {}",
        orbit.period(),
        estimate.period
    );
    let points = complete_orbit(system, orbit.reference_point(), estimate.period, interval)?;
    Ok(MinimalPeriod {
        orbit: PeriodicOrbit::new(points, estimate.period, orbit.stable)?,
        converged: estimate.converged,
        reduced: true,
    })
}
