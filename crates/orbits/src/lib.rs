//! Orbital elements and two-body helpers for patched-conic escape/capture estimates.

use serde::Serialize;
use std::f64::consts::PI;

/// Classical Keplerian elements for a conic about one central body.
///
/// Angles are kept in degrees to match the catalog/report convention; all
/// distances in km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitalElements {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub arg_periapsis_deg: f64,
    pub true_anomaly_deg: f64,
}

impl OrbitalElements {
    /// Planar orbit with the remaining angles zeroed, the common case for
    /// coplanar transfer estimates.
    pub fn planar(semi_major_axis_km: f64, eccentricity: f64) -> Self {
        Self {
            semi_major_axis_km,
            eccentricity,
            inclination_deg: 0.0,
            raan_deg: 0.0,
            arg_periapsis_deg: 0.0,
            true_anomaly_deg: 0.0,
        }
    }

    /// Circular orbit of the given radius.
    pub fn circular(radius_km: f64) -> Self {
        Self::planar(radius_km, 0.0)
    }

    /// Periapsis radius a·(1 − e) (km).
    pub fn periapsis_km(&self) -> f64 {
        self.semi_major_axis_km * (1.0 - self.eccentricity)
    }

    /// Apoapsis radius a·(1 + e) (km).
    pub fn apoapsis_km(&self) -> f64 {
        self.semi_major_axis_km * (1.0 + self.eccentricity)
    }
}

/// Circular orbital speed at radius r (km/s).
pub fn circular_speed(mu_km3_s2: f64, r_km: f64) -> f64 {
    (mu_km3_s2 / r_km).sqrt()
}

/// Local escape speed at radius r (km/s).
pub fn escape_speed(mu_km3_s2: f64, r_km: f64) -> f64 {
    (2.0 * mu_km3_s2 / r_km).sqrt()
}

/// Vis-viva speed at radius r on an orbit of semi-major axis a (km/s).
pub fn vis_viva_speed(mu_km3_s2: f64, r_km: f64, a_km: f64) -> f64 {
    (mu_km3_s2 * (2.0 / r_km - 1.0 / a_km)).sqrt()
}

/// Specific orbital energy v²/2 − μ/r (km²/s²).
pub fn specific_orbital_energy(mu_km3_s2: f64, r_km: f64, v_km_s: f64) -> f64 {
    0.5 * v_km_s * v_km_s - mu_km3_s2 / r_km
}

/// Keplerian period of an elliptical orbit (seconds).
pub fn orbital_period(mu_km3_s2: f64, a_km: f64) -> f64 {
    2.0 * PI * (a_km.powi(3) / mu_km3_s2).sqrt()
}

/// Patched-conic escape delta-v from a circular parking orbit onto a
/// hyperbolic leg with the given excess speed.
pub fn escape_delta_v(mu_km3_s2: f64, parking_radius_km: f64, vinf_km_s: f64) -> f64 {
    let circular = circular_speed(mu_km3_s2, parking_radius_km);
    let hyperbolic = (vinf_km_s * vinf_km_s + 2.0 * mu_km3_s2 / parking_radius_km).sqrt();
    (hyperbolic - circular).max(0.0)
}

/// Patched-conic capture delta-v from a hyperbolic approach into a circular
/// parking orbit.
pub fn capture_delta_v(mu_km3_s2: f64, parking_radius_km: f64, vinf_km_s: f64) -> f64 {
    let circular = circular_speed(mu_km3_s2, parking_radius_km);
    let hyperbolic = (vinf_km_s * vinf_km_s + 2.0 * mu_km3_s2 / parking_radius_km).sqrt();
    (hyperbolic - circular).max(0.0)
}

/// Hill-sphere radius of the minor body: d·(μ_minor/μ_major)^(2/5) (km).
pub fn hill_sphere_radius(separation_km: f64, mu_minor: f64, mu_major: f64) -> f64 {
    separation_km * (mu_minor / mu_major).powf(0.4)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MU_EARTH: f64 = 398_600.4418;

    #[test]
    fn vis_viva_reduces_to_circular_speed() {
        let r = 6_571.0;
        let v = vis_viva_speed(MU_EARTH, r, r);
        assert!((v - circular_speed(MU_EARTH, r)).abs() < 1e-12);
    }

    #[test]
    fn escape_speed_is_sqrt2_times_circular() {
        let r = 6_571.0;
        let ratio = escape_speed(MU_EARTH, r) / circular_speed(MU_EARTH, r);
        assert!((ratio - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn escape_delta_v_with_zero_excess_is_escape_minus_circular() {
        let r = 6_571.0;
        let dv = escape_delta_v(MU_EARTH, r, 0.0);
        let expected = escape_speed(MU_EARTH, r) - circular_speed(MU_EARTH, r);
        assert!((dv - expected).abs() < 1e-12);
    }

    #[test]
    fn apsides_bracket_the_semi_major_axis() {
        let el = OrbitalElements::planar(10_000.0, 0.3);
        assert!((el.periapsis_km() - 7_000.0).abs() < 1e-9);
        assert!((el.apoapsis_km() - 13_000.0).abs() < 1e-9);
    }

    #[test]
    fn leo_period_is_about_ninety_minutes() {
        let period = orbital_period(MU_EARTH, 6_771.0);
        assert!((period / 60.0 - 92.0).abs() < 2.0, "minutes = {}", period / 60.0);
    }
}
