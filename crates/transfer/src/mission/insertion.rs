//! Lunar-orbit-insertion trade study.
//!
//! Compares a single direct circularization against a two-burn capture-orbit
//! strategy (deep periapsis burn, then circularization where the capture
//! ellipse crosses the target radius). Low-energy approaches whose capture
//! ellipse balloons past 100 lunar radii fall back to a coarse
//! weak-stability-boundary cost model.

use lunar_core::constants::Body;
use lunar_orbits::{
    OrbitalElements, capture_delta_v, circular_speed, orbital_period, vis_viva_speed,
};
use serde::Serialize;
use thiserror::Error;

/// Supported hyperbolic-excess window (km/s).
const MAX_V_INFINITY_KM_S: f64 = 5.0;
/// Target-radius ceiling in lunar radii.
const MAX_TARGET_RADII: f64 = 10.0;
/// Capture-ellipse apoapsis beyond this many lunar radii is treated as a
/// weak-stability regime rather than a bound two-burn capture.
const MAX_CAPTURE_APOAPSIS_RADII: f64 = 100.0;

/// Periapsis-altitude heuristic: base altitude plus a margin that grows with
/// approach energy, floored for terrain clearance.
const PERIAPSIS_BASE_ALTITUDE_KM: f64 = 30.0;
const PERIAPSIS_ALTITUDE_PER_KM_S: f64 = 40.0;
const PERIAPSIS_MIN_ALTITUDE_KM: f64 = 20.0;

/// Empirical weak-stability saving over a direct insertion, and how the
/// remaining cost splits between the capture and circularization burns.
const WSB_COST_FACTOR: f64 = 0.85;
const WSB_CAPTURE_SHARE: f64 = 0.4;
const WSB_COAST_HOURS: f64 = 96.0;

/// Feasibility envelope thresholds (km/s, km).
const PROPULSIVE_LIMIT_KM_S: f64 = 2.5;
const NAVIGATION_LIMIT_KM_S: f64 = 3.0;
const THERMAL_MIN_ALTITUDE_KM: f64 = 10.0;

/// Insertion approach selected by the trade study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InsertionStrategy {
    Direct,
    CaptureOrbit,
    WeakStabilityBoundary,
}

/// Engineering feasibility of the chosen insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeasibilityFlags {
    pub propulsive: bool,
    pub thermal: bool,
    pub navigation: bool,
}

/// Caller-supplied parameter outside the supported envelope.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InsertionError {
    #[error("{name} = {value} outside supported range [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Outcome of the insertion trade study.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoiResult {
    pub strategy: InsertionStrategy,
    pub total_dv_km_s: f64,
    /// First burn: arrest the hyperbolic approach.
    pub capture_dv_km_s: f64,
    /// Second burn: settle into the target circular orbit.
    pub insertion_dv_km_s: f64,
    /// Intermediate capture orbit (equals the final orbit for a direct burn).
    pub capture_orbit: OrbitalElements,
    pub final_orbit: OrbitalElements,
    pub total_time_hours: f64,
    /// Saving over the rejected alternative, in percent of the alternative.
    pub efficiency_percent: f64,
    pub feasibility: FeasibilityFlags,
}

struct Candidate {
    strategy: InsertionStrategy,
    capture_dv: f64,
    insertion_dv: f64,
    capture_orbit: OrbitalElements,
    time_hours: f64,
}

impl Candidate {
    fn total(&self) -> f64 {
        self.capture_dv + self.insertion_dv
    }
}

/// Evaluate insertion strategies for an approach with hyperbolic excess
/// `v_infinity_km_s` targeting a circular orbit of radius `r_target_km`.
/// `r_periapsis_km` overrides the capture-orbit periapsis heuristic.
pub fn plan_insertion(
    v_infinity_km_s: f64,
    r_target_km: f64,
    r_periapsis_km: Option<f64>,
    moon: &Body,
) -> Result<LoiResult, InsertionError> {
    if !v_infinity_km_s.is_finite()
        || v_infinity_km_s <= 0.0
        || v_infinity_km_s > MAX_V_INFINITY_KM_S
    {
        return Err(InsertionError::OutOfRange {
            name: "v_infinity_km_s",
            value: v_infinity_km_s,
            min: 0.0,
            max: MAX_V_INFINITY_KM_S,
        });
    }
    let max_target = MAX_TARGET_RADII * moon.radius_km;
    if !r_target_km.is_finite() || r_target_km < moon.radius_km || r_target_km > max_target {
        return Err(InsertionError::OutOfRange {
            name: "r_target_km",
            value: r_target_km,
            min: moon.radius_km,
            max: max_target,
        });
    }
    if let Some(rp) = r_periapsis_km {
        if !rp.is_finite() || rp < moon.radius_km + PERIAPSIS_MIN_ALTITUDE_KM || rp > r_target_km {
            return Err(InsertionError::OutOfRange {
                name: "r_periapsis_km",
                value: rp,
                min: moon.radius_km + PERIAPSIS_MIN_ALTITUDE_KM,
                max: r_target_km,
            });
        }
    }

    let mu = moon.mu_km3_s2;
    let direct = direct_candidate(v_infinity_km_s, r_target_km, mu);
    let alternative = capture_candidate(v_infinity_km_s, r_target_km, r_periapsis_km, moon)
        .unwrap_or_else(|| wsb_candidate(&direct, r_target_km, moon));

    let (chosen, other) = if alternative.total() < direct.total() {
        (alternative, direct)
    } else {
        (direct, alternative)
    };

    let total = chosen.total();
    let efficiency = if other.total() > 0.0 {
        ((other.total() - total) / other.total() * 100.0).max(0.0)
    } else {
        0.0
    };

    Ok(LoiResult {
        strategy: chosen.strategy,
        total_dv_km_s: total,
        capture_dv_km_s: chosen.capture_dv,
        insertion_dv_km_s: chosen.insertion_dv,
        capture_orbit: chosen.capture_orbit,
        final_orbit: OrbitalElements::circular(r_target_km),
        total_time_hours: chosen.time_hours,
        efficiency_percent: efficiency,
        feasibility: FeasibilityFlags {
            propulsive: total < PROPULSIVE_LIMIT_KM_S,
            thermal: r_target_km > moon.radius_km + THERMAL_MIN_ALTITUDE_KM,
            navigation: total < NAVIGATION_LIMIT_KM_S,
        },
    })
}

fn direct_candidate(v_inf: f64, r_target: f64, mu: f64) -> Candidate {
    Candidate {
        strategy: InsertionStrategy::Direct,
        capture_dv: capture_delta_v(mu, r_target, v_inf),
        insertion_dv: 0.0,
        capture_orbit: OrbitalElements::circular(r_target),
        time_hours: 0.0,
    }
}

/// Two-burn capture: arrest at a deep periapsis into an ellipse bound at
/// half the approach energy, then circularize where the ellipse crosses the
/// target radius. Returns `None` when the ellipse apoapsis is unrealistic
/// and the weak-stability model should take over.
fn capture_candidate(
    v_inf: f64,
    r_target: f64,
    r_periapsis: Option<f64>,
    moon: &Body,
) -> Option<Candidate> {
    let mu = moon.mu_km3_s2;
    let default_altitude = (PERIAPSIS_BASE_ALTITUDE_KM + PERIAPSIS_ALTITUDE_PER_KM_S * v_inf)
        .max(PERIAPSIS_MIN_ALTITUDE_KM);
    let r_p = r_periapsis
        .unwrap_or(moon.radius_km + default_altitude)
        .min(r_target);

    // Bound orbit at half the approach specific energy; the apoapsis must at
    // least reach the target radius for the circularization crossing.
    let loose_apoapsis = 4.0 * mu / (v_inf * v_inf) - r_p;
    let r_a = loose_apoapsis.max(r_target);
    if r_a > MAX_CAPTURE_APOAPSIS_RADII * moon.radius_km {
        return None;
    }

    let a = 0.5 * (r_p + r_a);
    let v_hyperbolic = (v_inf * v_inf + 2.0 * mu / r_p).sqrt();
    let capture_dv = v_hyperbolic - vis_viva_speed(mu, r_p, a);
    let insertion_dv = (vis_viva_speed(mu, r_target, a) - circular_speed(mu, r_target)).abs();

    let eccentricity = (r_a - r_p) / (r_a + r_p);
    Some(Candidate {
        strategy: InsertionStrategy::CaptureOrbit,
        capture_dv,
        insertion_dv,
        capture_orbit: OrbitalElements::planar(a, eccentricity),
        time_hours: 0.5 * orbital_period(mu, a) / 3_600.0,
    })
}

/// High-energy three-burn-equivalent stand-in for ballistic capture through
/// the weak-stability region. Coarse by design.
fn wsb_candidate(direct: &Candidate, r_target: f64, moon: &Body) -> Candidate {
    let total = WSB_COST_FACTOR * direct.total();
    let boundary_apoapsis = MAX_CAPTURE_APOAPSIS_RADII * moon.radius_km;
    let a = 0.5 * (r_target + boundary_apoapsis);
    Candidate {
        strategy: InsertionStrategy::WeakStabilityBoundary,
        capture_dv: WSB_CAPTURE_SHARE * total,
        insertion_dv: (1.0 - WSB_CAPTURE_SHARE) * total,
        capture_orbit: OrbitalElements::planar(
            a,
            (boundary_apoapsis - r_target) / (boundary_apoapsis + r_target),
        ),
        time_hours: WSB_COAST_HOURS,
    }
}
