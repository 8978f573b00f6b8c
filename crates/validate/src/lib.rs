//! Stateless validity checks shared by the solver crates.
//!
//! Each check fails with its own error kind so callers can distinguish
//! physical impossibility from numerical non-convergence. Checks that are
//! advisory by design return their finding as data instead of failing.

use lunar_orbits::{OrbitalElements, circular_speed, escape_speed, orbital_period};
use thiserror::Error;

/// Default iteration budget for iterative solvers that do not set their own.
pub const DEFAULT_ITERATION_BUDGET: usize = 100;

/// Hard delta-v ceiling (km/s); nothing in the Earth-Moon envelope needs more.
pub const DELTA_V_HARD_LIMIT_KM_S: f64 = 15.0;
/// Delta-v level above which a warning is attached (km/s).
pub const DELTA_V_WARN_LIMIT_KM_S: f64 = 10.0;

/// Velocity plausibility band relative to the local circular/escape speeds.
const MAX_ESCAPE_FACTOR: f64 = 1.5;
const MIN_CIRCULAR_FACTOR: f64 = 0.1;

/// Transfer-time plausibility band relative to the arc's orbital period.
const MIN_PERIOD_FRACTION: f64 = 0.01;
const MAX_PERIOD_FRACTION: f64 = 4.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("orbital element {name} = {value} is not finite")]
    NonFiniteElement { name: &'static str, value: f64 },
    #[error("periapsis {periapsis_km} km is below the body surface at {surface_km} km")]
    SubSurfacePeriapsis { periapsis_km: f64, surface_km: f64 },
    #[error("eccentricity {0} outside the closed-orbit range [0, 1)")]
    EccentricityOutOfRange(f64),
    #[error("angle {name} = {value} deg outside [{min}, {max}]")]
    AngleOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("speed {speed_km_s} km/s implausible at r = {radius_km} km (circular {circular_km_s}, escape {escape_km_s})")]
    ImplausibleVelocity {
        speed_km_s: f64,
        radius_km: f64,
        circular_km_s: f64,
        escape_km_s: f64,
    },
    #[error("transfer time {tof_s} s outside plausible band for a period of {period_s} s")]
    TransferTimeOutOfBounds { tof_s: f64, period_s: f64 },
    #[error("solver used {iterations}/{budget} iterations with residual {residual:e} above tolerance {tolerance:e}")]
    NonConvergence {
        iterations: usize,
        budget: usize,
        residual: f64,
        tolerance: f64,
    },
    #[error("delta-v {0} km/s outside the hard range [0, 15]")]
    DeltaVOutOfBounds(f64),
    #[error("energy imbalance: relative error {relative_error:e} above tolerance {tolerance:e}")]
    EnergyImbalance { relative_error: f64, tolerance: f64 },
}

/// Validate a set of orbital elements against a central body surface radius.
pub fn check_orbital_elements(
    elements: &OrbitalElements,
    surface_radius_km: f64,
) -> Result<(), ValidationError> {
    let a = elements.semi_major_axis_km;
    if !a.is_finite() {
        return Err(ValidationError::NonFiniteElement {
            name: "semi_major_axis_km",
            value: a,
        });
    }
    let e = elements.eccentricity;
    if !e.is_finite() || !(0.0..1.0).contains(&e) {
        return Err(ValidationError::EccentricityOutOfRange(e));
    }
    let periapsis = elements.periapsis_km();
    if periapsis <= surface_radius_km {
        return Err(ValidationError::SubSurfacePeriapsis {
            periapsis_km: periapsis,
            surface_km: surface_radius_km,
        });
    }
    check_angle("inclination_deg", elements.inclination_deg, 0.0, 180.0)?;
    check_half_open_angle("raan_deg", elements.raan_deg)?;
    check_half_open_angle("arg_periapsis_deg", elements.arg_periapsis_deg)?;
    check_half_open_angle("true_anomaly_deg", elements.true_anomaly_deg)?;
    Ok(())
}

fn check_angle(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::AngleOutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

fn check_half_open_angle(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..360.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::AngleOutOfRange {
            name,
            value,
            min: 0.0,
            max: 360.0,
        })
    }
}

/// Check that a speed is plausible for its radius: below 1.5x the local
/// escape speed and above a tenth of the local circular speed.
pub fn check_velocity(
    speed_km_s: f64,
    radius_km: f64,
    mu_km3_s2: f64,
) -> Result<(), ValidationError> {
    let circular = circular_speed(mu_km3_s2, radius_km);
    let escape = escape_speed(mu_km3_s2, radius_km);
    if !speed_km_s.is_finite()
        || speed_km_s > MAX_ESCAPE_FACTOR * escape
        || speed_km_s < MIN_CIRCULAR_FACTOR * circular
    {
        return Err(ValidationError::ImplausibleVelocity {
            speed_km_s,
            radius_km,
            circular_km_s: circular,
            escape_km_s: escape,
        });
    }
    Ok(())
}

/// Check a transfer time against the Keplerian period of its arc.
pub fn check_transfer_time(
    tof_s: f64,
    semi_major_axis_km: f64,
    mu_km3_s2: f64,
) -> Result<(), ValidationError> {
    let period = orbital_period(mu_km3_s2, semi_major_axis_km);
    if !tof_s.is_finite()
        || tof_s < MIN_PERIOD_FRACTION * period
        || tof_s > MAX_PERIOD_FRACTION * period
    {
        return Err(ValidationError::TransferTimeOutOfBounds {
            tof_s,
            period_s: period,
        });
    }
    Ok(())
}

/// Check iteration diagnostics from an iterative solver.
pub fn check_convergence(
    iterations: usize,
    budget: usize,
    residual: f64,
    tolerance: f64,
) -> Result<(), ValidationError> {
    if iterations > budget || !residual.is_finite() || residual.abs() > tolerance {
        return Err(ValidationError::NonConvergence {
            iterations,
            budget,
            residual,
            tolerance,
        });
    }
    Ok(())
}

/// Check a delta-v magnitude against the hard mission envelope. Returns an
/// advisory note above the warning threshold; the note is data, not an error.
pub fn check_delta_v(delta_v_km_s: f64) -> Result<Option<String>, ValidationError> {
    if !delta_v_km_s.is_finite() || !(0.0..=DELTA_V_HARD_LIMIT_KM_S).contains(&delta_v_km_s) {
        return Err(ValidationError::DeltaVOutOfBounds(delta_v_km_s));
    }
    if delta_v_km_s > DELTA_V_WARN_LIMIT_KM_S {
        Ok(Some(format!(
            "delta-v {delta_v_km_s:.2} km/s is above the {DELTA_V_WARN_LIMIT_KM_S} km/s advisory level"
        )))
    } else {
        Ok(None)
    }
}

/// Compare two specific orbital energies at a relative tolerance.
pub fn check_energy_balance(
    energy_a: f64,
    energy_b: f64,
    tolerance: f64,
) -> Result<(), ValidationError> {
    let scale = energy_a.abs().max(energy_b.abs()).max(f64::MIN_POSITIVE);
    let relative_error = (energy_a - energy_b).abs() / scale;
    if relative_error > tolerance {
        return Err(ValidationError::EnergyImbalance {
            relative_error,
            tolerance,
        });
    }
    Ok(())
}
