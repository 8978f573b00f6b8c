//! Earth-Moon transfer planning library.
//!
//! The computation lives in the workspace member crates; this façade stitches
//! them together so front-ends (CLI, services) depend on a single crate.

pub use lunar_core::{constants, units, vector};

pub use lunar_config as config;
pub use lunar_export as export;
pub use lunar_impulsive as impulsive;
pub use lunar_lambert as lambert;
pub use lunar_orbits as orbits;
pub use lunar_propulsion as propulsion;
pub use lunar_transfer as transfer;
pub use lunar_validate as validate;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
