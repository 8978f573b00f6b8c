//! Impulsive transfer estimators: classical coplanar approximations and the
//! Earth-Moon patched-conic composition.

pub mod translunar;
pub mod transfers;

pub use translunar::{PatchedConicDetails, TranslunarTransfer, earth_moon_transfer};
pub use transfers::{BiEllipticResult, HohmannResult, bi_elliptic, hohmann};
