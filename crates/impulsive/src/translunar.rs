//! Earth→Moon patched-conic composition.
//!
//! Two phases stitched at the lunar sphere of influence: a geocentric
//! transfer ellipse from the departure parking orbit to the SOI boundary,
//! then a selenocentric hyperbolic capture against the parking orbit at the
//! Moon. Energy continuity across the patch point is checked, not enforced:
//! the caller decides strictness.

use lunar_core::constants::EarthMoonSystem;
use lunar_orbits::{
    OrbitalElements, capture_delta_v, circular_speed, orbital_period, specific_orbital_energy,
    vis_viva_speed,
};
use serde::Serialize;

/// Relative tolerance for the departure/SOI-boundary energy comparison.
const ENERGY_BALANCE_TOLERANCE: f64 = 1e-6;

/// Frame-matching details at the sphere-of-influence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatchedConicDetails {
    /// Lunar SOI radius from the Hill approximation (km).
    pub soi_radius_km: f64,
    /// Hyperbolic excess speed relative to the Moon (km/s).
    pub v_infinity_km_s: f64,
    /// Geocentric speed at the SOI boundary (km/s).
    pub soi_velocity_earth_frame_km_s: f64,
    /// Selenocentric speed at the SOI boundary (km/s).
    pub soi_velocity_moon_frame_km_s: f64,
    /// Moon's circular orbital speed about Earth (km/s).
    pub moon_orbital_velocity_km_s: f64,
    /// Whether specific orbital energy is conserved between the departure
    /// and SOI-boundary states within tolerance.
    pub energy_balance_ok: bool,
}

/// Full Earth→Moon transfer estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TranslunarTransfer {
    /// Trans-lunar injection burn out of the departure parking orbit (km/s).
    pub departure_dv_km_s: f64,
    /// Capture and circularization burn at the lunar parking radius (km/s).
    pub capture_dv_km_s: f64,
    pub total_dv_km_s: f64,
    /// Half-period of the geocentric transfer ellipse (seconds).
    pub tof_seconds: f64,
    /// Geocentric transfer-ellipse elements.
    pub transfer_orbit: OrbitalElements,
    pub details: PatchedConicDetails,
}

/// Compose the two-phase patched-conic Earth→Moon transfer for the given
/// system geometry.
pub fn earth_moon_transfer(system: &EarthMoonSystem) -> TranslunarTransfer {
    let mu_earth = system.earth.mu_km3_s2;
    let mu_moon = system.moon.mu_km3_s2;
    let r_leo = system.leo_radius_km();
    let soi_radius = system.lunar_soi_radius_km();

    // Phase a: geocentric ellipse from the parking orbit to the SOI boundary
    // along the Earth-Moon line.
    let r_patch = system.separation_km - soi_radius;
    let a_transfer = 0.5 * (r_leo + r_patch);
    let transfer_energy = -mu_earth / (2.0 * a_transfer);

    let v_departure = (2.0 * (transfer_energy + mu_earth / r_leo)).sqrt();
    let v_parking = circular_speed(mu_earth, r_leo);
    let departure_dv = v_departure - v_parking;

    let v_soi_earth = (2.0 * (transfer_energy + mu_earth / r_patch)).sqrt();

    // Phase b: match frames at the patch point against the Moon's circular
    // motion, then capture at the lunar parking radius.
    let moon_orbital_velocity = circular_speed(mu_earth, system.separation_km);
    let v_infinity = (v_soi_earth - moon_orbital_velocity).abs();
    let v_soi_moon = (v_infinity * v_infinity + 2.0 * mu_moon / soi_radius).sqrt();

    let r_lunar_parking = system.lunar_parking_radius_km();
    let capture_dv = capture_delta_v(mu_moon, r_lunar_parking, v_infinity);

    // Energy continuity along the geocentric leg, vis-viva at both ends.
    let departure_energy = specific_orbital_energy(mu_earth, r_leo, v_departure);
    let patch_energy = specific_orbital_energy(
        mu_earth,
        r_patch,
        vis_viva_speed(mu_earth, r_patch, a_transfer),
    );
    let relative_error = ((departure_energy - patch_energy) / departure_energy).abs();

    let eccentricity = (r_patch - r_leo) / (r_patch + r_leo);
    TranslunarTransfer {
        departure_dv_km_s: departure_dv,
        capture_dv_km_s: capture_dv,
        total_dv_km_s: departure_dv + capture_dv,
        tof_seconds: 0.5 * orbital_period(mu_earth, a_transfer),
        transfer_orbit: OrbitalElements::planar(a_transfer, eccentricity),
        details: PatchedConicDetails {
            soi_radius_km: soi_radius,
            v_infinity_km_s: v_infinity,
            soi_velocity_earth_frame_km_s: v_soi_earth,
            soi_velocity_moon_frame_km_s: v_soi_moon,
            moon_orbital_velocity_km_s: moon_orbital_velocity,
            energy_balance_ok: relative_error < ENERGY_BALANCE_TOLERANCE,
        },
    }
}
