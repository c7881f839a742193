//! This module reimports commonly used types.

pub use crate::solver::Solver;

pub use crate::models::common::{Amount, Cost, Duration, Location, TimeWindow, Timestamp};
pub use crate::models::matrix::CostMatrix;
pub use crate::models::problem::{Break, Job, JobType, Problem, Vehicle};
pub use crate::models::solution::Solution;

pub use crate::utils::Environment;
pub use crate::utils::InfoLogger;
pub use crate::utils::Quota;
pub use crate::utils::{SolverError, SolverResult};
