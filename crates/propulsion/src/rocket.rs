//! Tsiolkovsky propellant sizing with a finite-burn gravity-loss correction.
//!
//! The one place in the workspace that works in m/s: the rocket equation
//! takes Isp·g0 in SI while every orbital quantity stays in km/s.

use lunar_core::constants::G0;
use lunar_core::units::{self, UnitError};
use serde::Serialize;
use thiserror::Error;

/// Gravity-loss stretch applied to the ideal burn time: +1% per minute of
/// burn, capped at +20%. Only engaged for thrust-to-weight above 0.5 and
/// burns of a minute or longer.
const GRAVITY_LOSS_PER_SECOND: f64 = 0.01 / 60.0;
const GRAVITY_LOSS_CAP: f64 = 0.20;
const GRAVITY_LOSS_MIN_TWR: f64 = 0.5;
const GRAVITY_LOSS_MIN_BURN_S: f64 = 60.0;

/// Propellant-to-dry-mass ratio above which the advisory warning fires.
const PROPELLANT_RATIO_WARNING: f64 = 10.0;

/// Sizing failures. `InvalidMassRatio` marks a physically meaningless
/// Tsiolkovsky result rather than bad caller input.
#[derive(Debug, Error, PartialEq)]
pub enum PropulsionError {
    #[error(transparent)]
    InvalidDeltaV(#[from] UnitError),
    #[error("invalid parameter: {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("mass ratio {ratio} is not physically meaningful")]
    InvalidMassRatio { ratio: f64 },
}

/// Output of one propellant-sizing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelOptimization {
    /// Initial over final mass, ≥ 1.
    pub mass_ratio: f64,
    pub propellant_mass_kg: f64,
    pub isp_seconds: f64,
    /// Constant-thrust burn duration including the gravity-loss stretch.
    pub burn_time_s: f64,
    /// Advisory propellant-ratio note; never a failure.
    pub warning: Option<String>,
}

/// Size the propellant load for a manoeuvre of `delta_v_km_s` on a vehicle
/// of `dry_mass_kg` with the given specific impulse and initial
/// thrust-to-weight ratio.
pub fn optimize_burn(
    delta_v_km_s: f64,
    dry_mass_kg: f64,
    isp_seconds: f64,
    thrust_to_weight: f64,
) -> Result<FuelOptimization, PropulsionError> {
    let delta_v_km_s = units::validate_delta_v(delta_v_km_s)?;
    if !dry_mass_kg.is_finite() || dry_mass_kg <= 0.0 {
        return Err(PropulsionError::InvalidParameter {
            name: "dry_mass_kg",
            value: dry_mass_kg,
        });
    }
    if !isp_seconds.is_finite() || isp_seconds <= 0.0 {
        return Err(PropulsionError::InvalidParameter {
            name: "isp_seconds",
            value: isp_seconds,
        });
    }
    if !thrust_to_weight.is_finite() || thrust_to_weight <= 0.0 || thrust_to_weight > 2.0 {
        return Err(PropulsionError::InvalidParameter {
            name: "thrust_to_weight",
            value: thrust_to_weight,
        });
    }

    let delta_v_m_s = delta_v_km_s * 1_000.0;
    let exhaust_velocity = isp_seconds * G0;
    let mass_ratio = (delta_v_m_s / exhaust_velocity).exp();
    if !mass_ratio.is_finite() || mass_ratio < 1.0 {
        return Err(PropulsionError::InvalidMassRatio { ratio: mass_ratio });
    }

    let propellant_mass = dry_mass_kg * (mass_ratio - 1.0);
    let initial_mass = dry_mass_kg + propellant_mass;

    // Constant thrust sized from the initial weight; mass flow follows from
    // F = mdot * Isp * g0.
    let thrust_newtons = thrust_to_weight * initial_mass * G0;
    let mass_flow_kg_s = thrust_newtons / exhaust_velocity;
    let mut burn_time = if propellant_mass > 0.0 {
        propellant_mass / mass_flow_kg_s
    } else {
        0.0
    };

    if thrust_to_weight > GRAVITY_LOSS_MIN_TWR && burn_time >= GRAVITY_LOSS_MIN_BURN_S {
        let stretch = (burn_time * GRAVITY_LOSS_PER_SECOND).min(GRAVITY_LOSS_CAP);
        burn_time *= 1.0 + stretch;
    }

    let warning = if propellant_mass > PROPELLANT_RATIO_WARNING * dry_mass_kg {
        Some(format!(
            "propellant mass {propellant_mass:.0} kg exceeds {PROPELLANT_RATIO_WARNING}x dry mass"
        ))
    } else {
        None
    };

    Ok(FuelOptimization {
        mass_ratio,
        propellant_mass_kg: propellant_mass,
        isp_seconds,
        burn_time_s: burn_time,
        warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delta_v_needs_no_propellant() {
        let sized = optimize_burn(0.0, 1_000.0, 320.0, 0.8).unwrap();
        assert!((sized.mass_ratio - 1.0).abs() < 1e-15);
        assert_eq!(sized.propellant_mass_kg, 0.0);
        assert_eq!(sized.burn_time_s, 0.0);
        assert!(sized.warning.is_none());
    }

    #[test]
    fn translunar_burn_sizes_to_plausible_propellant() {
        // 4 km/s on a 450 s engine: mass ratio ~ exp(4000/4414) ~ 2.47.
        let sized = optimize_burn(4.0, 10_000.0, 450.0, 0.8).unwrap();
        assert!((sized.mass_ratio - 2.47).abs() < 0.02, "ratio = {}", sized.mass_ratio);
        assert!(sized.propellant_mass_kg > 14_000.0);
        assert!(sized.burn_time_s > 0.0);
    }

    #[test]
    fn gravity_loss_stretch_is_capped() {
        // Low thrust-to-weight on a heavy burn produces a long burn; the
        // stretch must never exceed 20%.
        let slow = optimize_burn(4.0, 10_000.0, 450.0, 0.6).unwrap();
        let ideal = {
            let exhaust = 450.0 * G0;
            let ratio = (4_000.0f64 / exhaust).exp();
            let propellant = 10_000.0 * (ratio - 1.0);
            let thrust = 0.6 * (10_000.0 + propellant) * G0;
            propellant / (thrust / exhaust)
        };
        assert!(slow.burn_time_s <= ideal * 1.2 + 1e-9);
        assert!(slow.burn_time_s > ideal);
    }

    #[test]
    fn short_or_gentle_burns_skip_the_correction() {
        // twr below the gate: burn time must equal the ideal value.
        let sized = optimize_burn(0.05, 500.0, 450.0, 0.3).unwrap();
        let exhaust = 450.0 * G0;
        let ratio = (50.0f64 / exhaust).exp();
        let propellant = 500.0 * (ratio - 1.0);
        let ideal = propellant / ((0.3 * (500.0 + propellant) * G0) / exhaust);
        assert!((sized.burn_time_s - ideal).abs() < 1e-9);
    }

    #[test]
    fn parameter_guards_reject_bad_inputs() {
        assert!(matches!(
            optimize_burn(3.0, 0.0, 450.0, 0.8),
            Err(PropulsionError::InvalidParameter { name: "dry_mass_kg", .. })
        ));
        assert!(matches!(
            optimize_burn(3.0, 1_000.0, -1.0, 0.8),
            Err(PropulsionError::InvalidParameter { name: "isp_seconds", .. })
        ));
        assert!(matches!(
            optimize_burn(3.0, 1_000.0, 450.0, 2.5),
            Err(PropulsionError::InvalidParameter { name: "thrust_to_weight", .. })
        ));
        assert!(optimize_burn(25.0, 1_000.0, 450.0, 0.8).is_err());
    }

    #[test]
    fn extreme_delta_v_raises_the_advisory_warning() {
        // 18 km/s on a 200 s engine: ratio ~ e^9.2, far past 10x dry mass.
        let sized = optimize_burn(18.0, 1_000.0, 200.0, 0.8).unwrap();
        assert!(sized.warning.is_some());
    }
}
