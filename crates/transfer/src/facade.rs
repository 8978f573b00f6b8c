//! Re-exported APIs for consumers of the transfer crate.

pub use crate::mission::insertion::{
    FeasibilityFlags, InsertionError, InsertionStrategy, LoiResult, plan_insertion,
};
pub use crate::mission::{
    CriteriaWeights, LambertSummary, ScoredTrajectory, StrategyComparison, TrajectoryAssessment,
    TrajectoryError, TrajectoryRequest, TrajectoryResult, TransferKind, assess_trajectory,
    compare_transfer_strategies, generate_earth_moon_trajectory,
};
pub use lunar_propulsion::{PropulsionMode, Vehicle};
