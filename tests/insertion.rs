use lunar_transfer_calculator::constants::EarthMoonSystem;
use lunar_transfer_calculator::orbits::capture_delta_v;
use lunar_transfer_calculator::transfer::{InsertionError, InsertionStrategy, plan_insertion};

fn moon() -> lunar_transfer_calculator::constants::Body {
    EarthMoonSystem::default().moon
}

#[test]
fn excess_speed_outside_the_envelope_fails() {
    let err = plan_insertion(6.0, 2_000.0, None, &moon()).unwrap_err();
    assert!(matches!(err, InsertionError::OutOfRange { .. }));
    assert!(plan_insertion(0.0, 2_000.0, None, &moon()).is_err());
    assert!(plan_insertion(5.0, 2_000.0, None, &moon()).is_ok());
}

#[test]
fn chosen_strategy_never_costs_more_than_direct() {
    let direct_reference = |v_inf: f64, r: f64| capture_delta_v(moon().mu_km3_s2, r, v_inf);
    for v_inf in [0.3, 0.8, 1.5, 2.5, 4.0] {
        for r_target in [1_837.0, 2_737.0, 5_000.0] {
            let result = plan_insertion(v_inf, r_target, None, &moon()).unwrap();
            let direct = direct_reference(v_inf, r_target);
            assert!(
                result.total_dv_km_s <= direct + 1e-12,
                "v_inf = {v_inf}, r = {r_target}: {} > {direct}",
                result.total_dv_km_s
            );
        }
    }
}

#[test]
fn efficiency_reports_the_saving_over_the_alternative() {
    let result = plan_insertion(2.0, 3_737.0, None, &moon()).unwrap();
    assert_eq!(result.strategy, InsertionStrategy::CaptureOrbit);
    assert!(result.efficiency_percent > 0.0 && result.efficiency_percent < 50.0);
}

#[test]
fn ballooning_capture_ellipse_switches_to_weak_stability() {
    let result = plan_insertion(0.15, 1_837.0, None, &moon()).unwrap();
    assert_eq!(result.strategy, InsertionStrategy::WeakStabilityBoundary);
    // The coarse model claims the published saving over a direct burn.
    let direct = capture_delta_v(moon().mu_km3_s2, 1_837.0, 0.15);
    assert!((result.total_dv_km_s - 0.85 * direct).abs() < 1e-9);
}

#[test]
fn feasibility_flags_follow_the_thresholds() {
    let easy = plan_insertion(0.8, 1_837.0, None, &moon()).unwrap();
    assert!(easy.feasibility.propulsive);
    assert!(easy.feasibility.thermal);
    assert!(easy.feasibility.navigation);

    // A 5 km/s approach into a low orbit blows the propulsive budget.
    let hot = plan_insertion(5.0, 1_787.0, None, &moon()).unwrap();
    assert!(!hot.feasibility.propulsive);
}

#[test]
fn caller_periapsis_override_is_respected() {
    let result = plan_insertion(1.5, 3_000.0, Some(1_800.0), &moon()).unwrap();
    if result.strategy == InsertionStrategy::CaptureOrbit {
        assert!((result.capture_orbit.periapsis_km() - 1_800.0).abs() < 1e-9);
    }
    // Below terrain clearance or above the target radius: rejected.
    assert!(plan_insertion(1.5, 3_000.0, Some(1_745.0), &moon()).is_err());
    assert!(plan_insertion(1.5, 3_000.0, Some(3_500.0), &moon()).is_err());
}
