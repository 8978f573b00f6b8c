//! Propulsion mode descriptors, vehicle mass properties, and propellant sizing.

pub mod rocket;

pub use rocket::{FuelOptimization, PropulsionError, optimize_burn};

/// Simple propulsion mode enumeration. Additional parameters can be layered on per mode.
#[derive(Debug, Clone)]
pub enum PropulsionMode {
    /// Instantaneous impulsive burn (e.g., chemical engine, upper stage).
    Impulsive {
        max_delta_v_km_s: f64,
        isp_seconds: f64,
        thrust_to_weight: f64,
    },
}

/// Basic vehicle definition used to size the propellant load for a mission.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub name: String,
    pub dry_mass_kg: f64,
    pub propellant_mass_kg: f64,
    pub propulsion: PropulsionMode,
}

impl Vehicle {
    /// Convenience accessor for total initial mass.
    pub fn initial_mass_kg(&self) -> f64 {
        self.dry_mass_kg + self.propellant_mass_kg
    }
}
