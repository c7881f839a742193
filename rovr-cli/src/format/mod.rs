//! A json problem and solution format shaped after the external interface contract.

pub mod problem;
pub mod solution;

use rovr_core::prelude::{CostMatrix, SolverResult};

/// A seam for external travel cost providers. The solver itself consumes an already
/// materialized matrix; implementations of this trait live outside this build.
pub trait TravelMatrixProvider {
    /// Materializes the travel cost matrix over given coordinates.
    fn travel_matrix(&self, coordinates: &[[f64; 2]]) -> SolverResult<CostMatrix>;

    /// Fetches the route geometry over given coordinates as an encoded polyline.
    fn geometry(&self, coordinates: &[[f64; 2]]) -> SolverResult<String>;
}
