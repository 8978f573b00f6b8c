//! Mission orchestrator: selects the transfer model, chains the solver
//! crates, and assembles one serializable trajectory record per call.

pub mod insertion;
pub mod sampling;

use chrono::{NaiveDate, NaiveDateTime};
use lunar_core::constants::EarthMoonSystem;
use lunar_core::units::{self, UnitError};
use lunar_core::vector::{self, Vector3};
use lunar_impulsive::{TranslunarTransfer, earth_moon_transfer, hohmann};
use lunar_lambert::{self as lambert, LambertError};
use lunar_orbits::{OrbitalElements, circular_speed};
use lunar_propulsion::{FuelOptimization, PropulsionError, optimize_burn};
use lunar_validate::{self as validate, ValidationError};
use serde::Serialize;
use std::f64::consts::PI;

use self::insertion::{InsertionError, LoiResult, plan_insertion};

/// Transfer model used for the translunar leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferKind {
    Hohmann,
    Lambert,
}

/// Inputs to one trajectory generation call, in user-facing units.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryRequest {
    /// Launch epoch, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
    pub launch_epoch: String,
    pub transfer: TransferKind,
    /// Requested flight time (hours). The Hohmann path recomputes it from
    /// the patched-conic geometry; the Lambert path honours it.
    pub flight_time_hours: f64,
    pub dry_mass_kg: f64,
    pub isp_seconds: f64,
    pub thrust_to_weight: f64,
    /// Waypoint count for the sampled trajectory.
    pub samples: usize,
}

impl Default for TrajectoryRequest {
    fn default() -> Self {
        Self {
            launch_epoch: "2026-01-01".to_string(),
            transfer: TransferKind::Hohmann,
            flight_time_hours: 96.0,
            dry_mass_kg: 15_000.0,
            isp_seconds: 450.0,
            thrust_to_weight: 0.8,
            samples: 64,
        }
    }
}

/// Compact record of the Lambert leg kept in the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LambertSummary {
    pub v1_km_s: Vector3,
    pub v2_km_s: Vector3,
    pub transfer_angle_rad: f64,
    pub iterations: usize,
    pub residual: f64,
}

/// One complete trajectory plan. Pure function of the request and system:
/// identical inputs reproduce identical values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryResult {
    pub launch_epoch: String,
    pub transfer: TransferKind,
    pub total_delta_v_km_s: f64,
    pub flight_time_hours: f64,
    pub fuel_mass_kg: f64,
    /// Theoretical minimum Hohmann delta-v over the achieved delta-v, in
    /// percent, clamped to [0, 100].
    pub efficiency_percent: f64,
    pub points: Vec<Vector3>,
    pub elements: Vec<OrbitalElements>,
    pub risk_factors: Vec<String>,
    pub translunar: Option<TranslunarTransfer>,
    pub lambert: Option<LambertSummary>,
    pub insertion: LoiResult,
    pub fuel: FuelOptimization,
}

/// Orchestrator failure: every component error propagates typed.
#[derive(Debug, thiserror::Error)]
pub enum TrajectoryError {
    #[error("launch epoch '{0}' is not a recognized date")]
    InvalidLaunchEpoch(String),
    #[error("unit validation failed: {0}")]
    Unit(#[from] UnitError),
    #[error("lambert solver failed: {0}")]
    Lambert(#[from] LambertError),
    #[error("lunar insertion planning failed: {0}")]
    Insertion(#[from] InsertionError),
    #[error("propellant sizing failed: {0}")]
    Propulsion(#[from] PropulsionError),
    #[error("physical validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Risk-annotation thresholds.
const DELTA_V_RISK_KM_S: f64 = 4.5;
const FLIGHT_TIME_RISK_HOURS: f64 = 120.0;

/// Lambert arrival-angle band, clear of the collinear singularities.
const MIN_ARRIVAL_ANGLE_RAD: f64 = 0.15;
const MAX_ARRIVAL_ANGLE_RAD: f64 = 2.9;

/// Residual ceiling accepted from the Lambert solver diagnostics.
const CONVERGENCE_RESIDUAL_CEILING: f64 = 1e-12;

/// Plan a full Earth→Moon trajectory for the request against the given
/// system geometry.
pub fn generate_earth_moon_trajectory(
    request: &TrajectoryRequest,
    system: &EarthMoonSystem,
) -> Result<TrajectoryResult, TrajectoryError> {
    let flight_hours = units::validate_mission_time(request.flight_time_hours)?;
    parse_launch_epoch(&request.launch_epoch)?;

    let leg = match request.transfer {
        TransferKind::Hohmann => plan_hohmann_leg(system)?,
        TransferKind::Lambert => plan_lambert_leg(system, flight_hours, request.samples)?,
    };

    let mut risk_factors = assess_risks(
        request.transfer,
        leg.total_dv_km_s,
        leg.flight_time_hours,
        leg.energy_balance_ok,
    );
    if let Some(note) = validate::check_delta_v(leg.total_dv_km_s)? {
        risk_factors.push(note);
    }
    risk_factors.extend(leg.advisories.iter().cloned());

    let fuel = optimize_burn(
        leg.total_dv_km_s,
        request.dry_mass_kg,
        request.isp_seconds,
        request.thrust_to_weight,
    )?;
    if let Some(note) = &fuel.warning {
        risk_factors.push(note.clone());
    }

    // Theoretical floor: coplanar Hohmann between the parking orbit and the
    // lunar distance about Earth alone.
    let floor = hohmann(
        system.leo_radius_km(),
        system.separation_km,
        system.earth.mu_km3_s2,
    )
    .dv_total_km_s;
    let efficiency = (floor / leg.total_dv_km_s * 100.0).clamp(0.0, 100.0);

    Ok(TrajectoryResult {
        launch_epoch: request.launch_epoch.clone(),
        transfer: request.transfer,
        total_delta_v_km_s: leg.total_dv_km_s,
        flight_time_hours: leg.flight_time_hours,
        fuel_mass_kg: fuel.propellant_mass_kg,
        efficiency_percent: efficiency,
        points: leg.points,
        elements: leg.elements,
        risk_factors,
        translunar: leg.translunar,
        lambert: leg.lambert,
        insertion: leg.insertion,
        fuel,
    })
}

/// Intermediate per-leg bundle before the shared assembly steps.
struct PlannedLeg {
    total_dv_km_s: f64,
    flight_time_hours: f64,
    points: Vec<Vector3>,
    elements: Vec<OrbitalElements>,
    translunar: Option<TranslunarTransfer>,
    lambert: Option<LambertSummary>,
    insertion: LoiResult,
    energy_balance_ok: bool,
    advisories: Vec<String>,
}

fn plan_hohmann_leg(system: &EarthMoonSystem) -> Result<PlannedLeg, TrajectoryError> {
    let transfer = earth_moon_transfer(system);
    validate::check_orbital_elements(&transfer.transfer_orbit, system.earth.radius_km)?;

    let injection_speed = circular_speed(system.earth.mu_km3_s2, system.leo_radius_km())
        + transfer.departure_dv_km_s;
    validate::check_velocity(injection_speed, system.leo_radius_km(), system.earth.mu_km3_s2)?;

    let insertion = plan_insertion(
        transfer.details.v_infinity_km_s,
        system.lunar_parking_radius_km(),
        None,
        &system.moon,
    )?;

    let total_dv = transfer.departure_dv_km_s + insertion.total_dv_km_s;
    // Flight time comes from the geometry, not from the request.
    let flight_hours = transfer.tof_seconds / 3_600.0 + insertion.total_time_hours;

    let points = sampling::patched_conic_points(system, &transfer, 64);
    let elements = vec![
        OrbitalElements::circular(system.leo_radius_km()),
        transfer.transfer_orbit,
        insertion.capture_orbit,
        insertion.final_orbit,
    ];

    Ok(PlannedLeg {
        total_dv_km_s: total_dv,
        flight_time_hours: flight_hours,
        points,
        elements,
        energy_balance_ok: transfer.details.energy_balance_ok,
        translunar: Some(transfer),
        lambert: None,
        insertion,
        advisories: Vec::new(),
    })
}

fn plan_lambert_leg(
    system: &EarthMoonSystem,
    flight_hours: f64,
    samples: usize,
) -> Result<PlannedLeg, TrajectoryError> {
    let tof_s = units::hours_to_seconds(flight_hours)?;
    let mu_earth = system.earth.mu_km3_s2;
    let separation = system.separation_km;

    // Boundary geometry: depart the parking orbit on the +x axis and meet
    // the Moon at the bearing it reaches after one flight time, held inside
    // a band clear of the 0/pi singularities.
    let moon_rate = (mu_earth / separation.powi(3)).sqrt();
    let arrival_angle =
        (PI - moon_rate * tof_s).rem_euclid(2.0 * PI).clamp(MIN_ARRIVAL_ANGLE_RAD, MAX_ARRIVAL_ANGLE_RAD);

    let r1 = [system.leo_radius_km(), 0.0, 0.0];
    let r2 = [
        separation * arrival_angle.cos(),
        separation * arrival_angle.sin(),
        0.0,
    ];

    let solution = lambert::solve(&r1, &r2, tof_s, mu_earth, lambert::Direction::Prograde, 0)?;
    validate::check_convergence(
        solution.iterations,
        lambert::MAX_ITERATIONS,
        solution.residual,
        CONVERGENCE_RESIDUAL_CEILING,
    )?;

    let injection_speed = vector::norm(&solution.v1);
    validate::check_velocity(injection_speed, vector::norm(&r1), mu_earth)?;
    let departure_dv = (injection_speed - circular_speed(mu_earth, vector::norm(&r1))).abs();

    // Frame-match the arrival velocity against the Moon's circular motion.
    let moon_speed = circular_speed(mu_earth, separation);
    let moon_velocity = [
        -moon_speed * arrival_angle.sin(),
        moon_speed * arrival_angle.cos(),
        0.0,
    ];
    let v_infinity = vector::norm(&vector::sub(&solution.v2, &moon_velocity));

    let insertion = plan_insertion(
        v_infinity,
        system.lunar_parking_radius_km(),
        None,
        &system.moon,
    )?;

    let total_dv = departure_dv + insertion.total_dv_km_s;
    let points = sampling::lambert_points(&r1, &r2, samples);
    let elements = vec![
        OrbitalElements::circular(system.leo_radius_km()),
        insertion.capture_orbit,
        insertion.final_orbit,
    ];

    let advisories = solution.warning.iter().cloned().collect();
    let lambert_summary = LambertSummary {
        v1_km_s: solution.v1,
        v2_km_s: solution.v2,
        transfer_angle_rad: solution.transfer_angle_rad,
        iterations: solution.iterations,
        residual: solution.residual,
    };

    Ok(PlannedLeg {
        total_dv_km_s: total_dv,
        flight_time_hours: flight_hours,
        points,
        elements,
        translunar: None,
        lambert: Some(lambert_summary),
        insertion,
        energy_balance_ok: true,
        advisories,
    })
}

fn parse_launch_epoch(epoch: &str) -> Result<(), TrajectoryError> {
    if NaiveDate::parse_from_str(epoch, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(epoch, "%Y-%m-%dT%H:%M:%S").is_ok()
    {
        Ok(())
    } else {
        Err(TrajectoryError::InvalidLaunchEpoch(epoch.to_string()))
    }
}

/// Qualitative mission notes attached to every result.
fn assess_risks(
    transfer: TransferKind,
    total_dv_km_s: f64,
    flight_time_hours: f64,
    energy_balance_ok: bool,
) -> Vec<String> {
    let mut risks = Vec::new();
    if total_dv_km_s > DELTA_V_RISK_KM_S {
        risks.push(format!(
            "total delta-v {total_dv_km_s:.2} km/s exceeds the {DELTA_V_RISK_KM_S} km/s planning margin"
        ));
    }
    if flight_time_hours > FLIGHT_TIME_RISK_HOURS {
        risks.push(format!(
            "flight time {flight_time_hours:.0} h extends radiation and consumables exposure"
        ));
    }
    match transfer {
        TransferKind::Hohmann => risks.push(
            "patched-conic model neglects third-body perturbations during the crossing".to_string(),
        ),
        TransferKind::Lambert => risks.push(
            "single-revolution Lambert arc leaves no margin for mid-course corrections".to_string(),
        ),
    }
    if !energy_balance_ok {
        risks.push("energy continuity check failed at the sphere-of-influence patch".to_string());
    }
    risks
}

/// Weights for the multi-criteria strategy comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriteriaWeights {
    pub fuel: f64,
    pub time: f64,
    pub safety: f64,
}

impl Default for CriteriaWeights {
    fn default() -> Self {
        Self {
            fuel: 0.4,
            time: 0.3,
            safety: 0.3,
        }
    }
}

/// One scored alternative from the strategy comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTrajectory {
    pub transfer: TransferKind,
    pub score: f64,
    pub trajectory: TrajectoryResult,
}

/// Outcome of comparing both transfer models for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyComparison {
    pub best: TransferKind,
    pub alternatives: Vec<ScoredTrajectory>,
}

/// Generate both transfer models for the request and rank them by the
/// weighted fuel/time/safety criteria.
pub fn compare_transfer_strategies(
    request: &TrajectoryRequest,
    system: &EarthMoonSystem,
    weights: &CriteriaWeights,
) -> Result<StrategyComparison, TrajectoryError> {
    let mut alternatives = Vec::with_capacity(2);
    for transfer in [TransferKind::Hohmann, TransferKind::Lambert] {
        let candidate = TrajectoryRequest {
            transfer,
            ..request.clone()
        };
        let trajectory = generate_earth_moon_trajectory(&candidate, system)?;
        let assessment = assess_trajectory(&trajectory);

        let fuel_score = trajectory.efficiency_percent / 100.0;
        let time_score = (1.0 - trajectory.flight_time_hours / (7.0 * 24.0)).max(0.0);
        let safety_score = assessment.safety_score / 100.0;
        let score =
            weights.fuel * fuel_score + weights.time * time_score + weights.safety * safety_score;

        alternatives.push(ScoredTrajectory {
            transfer,
            score,
            trajectory,
        });
    }

    let best = alternatives
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|s| s.transfer)
        .unwrap_or(TransferKind::Hohmann);

    Ok(StrategyComparison { best, alternatives })
}

/// Post-hoc safety assessment of a planned trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryAssessment {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub safety_score: f64,
}

/// Score a trajectory against the mission safety heuristics: delta-v load,
/// duration, and fuel efficiency each chip away at a 100-point budget.
pub fn assess_trajectory(trajectory: &TrajectoryResult) -> TrajectoryAssessment {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();
    let mut safety_score: f64 = 100.0;

    if trajectory.total_delta_v_km_s > 5.0 {
        issues.push("excessive delta-v requirement".to_string());
        recommendations.push("consider an alternative trajectory with lower fuel cost".to_string());
        safety_score -= 30.0;
    }
    if trajectory.flight_time_hours > 240.0 {
        issues.push("extended transfer time increases risk".to_string());
        recommendations.push("optimize for a shorter transfer".to_string());
        safety_score -= 20.0;
    }
    if trajectory.efficiency_percent < 50.0 {
        issues.push("low fuel efficiency".to_string());
        recommendations.push("improve the transfer geometry".to_string());
        safety_score -= 25.0;
    }

    let safety_score = safety_score.max(0.0);
    TrajectoryAssessment {
        is_valid: safety_score >= 50.0,
        issues,
        recommendations,
        safety_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hohmann_request_recomputes_flight_time_from_geometry() {
        let request = TrajectoryRequest {
            flight_time_hours: 500.0,
            ..TrajectoryRequest::default()
        };
        let result =
            generate_earth_moon_trajectory(&request, &EarthMoonSystem::default()).unwrap();
        // The patched conic decides, not the request.
        assert!(result.flight_time_hours < 400.0);
        assert!(result.flight_time_hours > 48.0);
    }

    #[test]
    fn bad_launch_epoch_is_rejected() {
        let request = TrajectoryRequest {
            launch_epoch: "next tuesday".to_string(),
            ..TrajectoryRequest::default()
        };
        let err = generate_earth_moon_trajectory(&request, &EarthMoonSystem::default());
        assert!(matches!(err, Err(TrajectoryError::InvalidLaunchEpoch(_))));
    }

    #[test]
    fn out_of_window_flight_time_is_rejected() {
        let request = TrajectoryRequest {
            flight_time_hours: 0.05,
            ..TrajectoryRequest::default()
        };
        assert!(matches!(
            generate_earth_moon_trajectory(&request, &EarthMoonSystem::default()),
            Err(TrajectoryError::Unit(_))
        ));
    }

    #[test]
    fn lambert_request_honours_the_requested_flight_time() {
        let request = TrajectoryRequest {
            transfer: TransferKind::Lambert,
            flight_time_hours: 72.0,
            ..TrajectoryRequest::default()
        };
        let result =
            generate_earth_moon_trajectory(&request, &EarthMoonSystem::default()).unwrap();
        assert_eq!(result.flight_time_hours, 72.0);
        let lambert = result.lambert.expect("lambert summary");
        assert!(lambert.iterations <= lunar_lambert::MAX_ITERATIONS);
        assert!(result.translunar.is_none());
    }

    #[test]
    fn assessment_penalizes_heavy_missions() {
        let request = TrajectoryRequest::default();
        let mut result =
            generate_earth_moon_trajectory(&request, &EarthMoonSystem::default()).unwrap();
        let healthy = assess_trajectory(&result);
        assert!(healthy.is_valid);

        result.total_delta_v_km_s = 8.0;
        result.flight_time_hours = 400.0;
        result.efficiency_percent = 30.0;
        let degraded = assess_trajectory(&result);
        assert!(!degraded.is_valid);
        assert_eq!(degraded.issues.len(), 3);
    }

    #[test]
    fn strategy_comparison_scores_both_models() {
        let comparison = compare_transfer_strategies(
            &TrajectoryRequest::default(),
            &EarthMoonSystem::default(),
            &CriteriaWeights::default(),
        )
        .unwrap();
        assert_eq!(comparison.alternatives.len(), 2);
        assert!(comparison.alternatives.iter().all(|alt| alt.score > 0.0));
    }
}
