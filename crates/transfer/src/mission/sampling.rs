//! Deterministic waypoint generation along the planned transfer geometry.
//!
//! Points are recomputed from the inputs on every call; nothing is cached or
//! persisted. The patched-conic path is sampled piecewise: the geocentric
//! escape ellipse in true anomaly, then an interpolated capture arc bending
//! around the Moon. The Lambert path keeps the straight-line placeholder of
//! the original system.

use lunar_core::constants::EarthMoonSystem;
use lunar_core::vector::Vector3;
use lunar_impulsive::TranslunarTransfer;
use std::f64::consts::PI;

/// Share of the sample budget spent on the geocentric escape leg.
const ESCAPE_LEG_FRACTION: f64 = 0.7;

/// Sample the patched-conic transfer: departure parking orbit at
/// `[-r_leo, 0, 0]`, Earth at the origin, Moon at `[d, 0, 0]`.
pub fn patched_conic_points(
    system: &EarthMoonSystem,
    transfer: &TranslunarTransfer,
    samples: usize,
) -> Vec<Vector3> {
    let samples = samples.max(4);
    let escape_samples = ((samples as f64 * ESCAPE_LEG_FRACTION) as usize).max(2);
    let capture_samples = samples - escape_samples;

    let a = transfer.transfer_orbit.semi_major_axis_km;
    let e = transfer.transfer_orbit.eccentricity;
    let semi_latus = a * (1.0 - e * e);

    let mut points = Vec::with_capacity(samples + 1);

    // Escape ellipse from periapsis (true anomaly 0) to apoapsis (pi), with
    // the apse line pointing at the Moon.
    for i in 0..=escape_samples {
        let nu = PI * i as f64 / escape_samples as f64;
        let r = semi_latus / (1.0 + e * nu.cos());
        points.push([-r * nu.cos(), r * nu.sin(), 0.0]);
    }

    // Capture arc: spiral the remaining samples from the patch point down to
    // the lunar parking radius, bending a quarter turn around the Moon.
    let moon_centre = [system.separation_km, 0.0, 0.0];
    let soi_radius = transfer.details.soi_radius_km;
    let parking_radius = system.lunar_parking_radius_km();
    for i in 1..=capture_samples {
        let t = i as f64 / capture_samples as f64;
        let radius = soi_radius + (parking_radius - soi_radius) * t;
        let angle = PI + 0.5 * PI * t;
        points.push([
            moon_centre[0] + radius * angle.cos(),
            moon_centre[1] + radius * angle.sin(),
            0.0,
        ]);
    }

    points
}

/// Straight-line placeholder between the Lambert boundary positions.
pub fn lambert_points(r1: &Vector3, r2: &Vector3, samples: usize) -> Vec<Vector3> {
    let samples = samples.max(2);
    (0..=samples)
        .map(|i| {
            let t = i as f64 / samples as f64;
            [
                r1[0] + (r2[0] - r1[0]) * t,
                r1[1] + (r2[1] - r1[1]) * t,
                r1[2] + (r2[2] - r1[2]) * t,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunar_core::vector::{norm, sub};
    use lunar_impulsive::earth_moon_transfer;

    #[test]
    fn patched_conic_points_start_at_leo_and_end_at_the_moon() {
        let system = EarthMoonSystem::default();
        let transfer = earth_moon_transfer(&system);
        let points = patched_conic_points(&system, &transfer, 60);

        let first = points.first().unwrap();
        assert!((norm(first) - system.leo_radius_km()).abs() < 1.0);

        let last = points.last().unwrap();
        let lunar_distance = norm(&sub(last, &[system.separation_km, 0.0, 0.0]));
        assert!(
            (lunar_distance - system.lunar_parking_radius_km()).abs() < 1.0,
            "final lunar distance = {lunar_distance}"
        );
    }

    #[test]
    fn patched_conic_points_are_finite_and_repeatable() {
        let system = EarthMoonSystem::default();
        let transfer = earth_moon_transfer(&system);
        let a = patched_conic_points(&system, &transfer, 50);
        let b = patched_conic_points(&system, &transfer, 50);
        assert_eq!(a, b);
        assert!(a.iter().all(lunar_core::vector::is_finite));
    }

    #[test]
    fn lambert_points_interpolate_linearly() {
        let pts = lambert_points(&[0.0, 0.0, 0.0], &[10.0, 20.0, 0.0], 10);
        assert_eq!(pts.len(), 11);
        assert_eq!(pts[5], [5.0, 10.0, 0.0]);
    }
}
