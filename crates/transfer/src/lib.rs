//! Transfer façade crate consolidating mission planning and exposing supporting crates.

pub mod mission;

pub use facade::*;
pub use lunar_impulsive as impulsive;
pub use lunar_lambert as lambert;
pub use lunar_propulsion as propulsion;

mod facade;
