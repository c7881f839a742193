//! This module contains the neighborhood operators applied by the local search.

use crate::models::common::{Cost, Location};
use crate::models::problem::{JobType, Problem};
use crate::models::solution::{RawRoute, RouteMut};
use crate::solver::state::{link_cost, location_before, SolutionState};
use hashbrown::HashSet;

mod relocate;
pub use self::relocate::*;

mod exchange;
pub use self::exchange::*;

mod cross_exchange;
pub use self::cross_exchange::*;

mod or_opt;
pub use self::or_opt::*;

mod two_opt;
pub use self::two_opt::*;

/// A read only view over the current solution used to evaluate moves.
pub struct SearchContext<'a, R> {
    /// The problem definition.
    pub problem: &'a Problem,
    /// Current routes, one per vehicle.
    pub routes: &'a [R],
    /// Derived solution state.
    pub state: &'a SolutionState,
}

/// Identifies a move by its source and target positions, used as deterministic tie break.
pub type MoveKey = (usize, usize, usize, usize);

/// Specifies behavior of a neighborhood operator: a short-lived value constructed per
/// candidate move. Infeasibility is reported via `is_valid`, never raised.
pub trait LocalOperator<R: RouteMut> {
    /// Returns the travel cost delta of the move, positive meaning improvement. Pure
    /// over the current solution and idempotent, so the driver can cache it.
    fn compute_gain(&self, ctx: &SearchContext<R>) -> Cost;

    /// Checks skills, capacity and schedule feasibility of the move.
    fn is_valid(&self, ctx: &SearchContext<R>) -> bool;

    /// Mutates the routes. The caller refreshes derived state for touched vehicles.
    fn apply(&self, problem: &Problem, routes: &mut [R]);

    /// Returns the (source vehicle, source rank, target vehicle, target rank) tuple.
    fn key(&self) -> MoveKey;

    /// Returns vehicles whose derived state is invalidated by `apply`.
    fn touched(&self) -> (usize, usize);
}

/// Returns the travel cost delta of inserting a node at given position.
pub(crate) fn add_cost_node(problem: &Problem, route: &RawRoute, location: Location, rank: usize) -> Cost {
    let previous = location_before(problem, route, rank);
    let next = if rank < route.jobs.len() {
        Some(problem.jobs[route.jobs[rank]].location)
    } else {
        problem.vehicles[route.vehicle].end
    };

    link_cost(problem, previous, Some(location)) + link_cost(problem, Some(location), next)
        - link_cost(problem, previous, next)
}

/// Returns the travel cost delta of inserting an edge (two consecutive nodes) at given
/// position, excluding the edge's internal cost which travels with it.
pub(crate) fn add_cost_edge(
    problem: &Problem,
    route: &RawRoute,
    first: Location,
    second: Location,
    rank: usize,
) -> Cost {
    let previous = location_before(problem, route, rank);
    let next = if rank < route.jobs.len() {
        Some(problem.jobs[route.jobs[rank]].location)
    } else {
        problem.vehicles[route.vehicle].end
    };

    link_cost(problem, previous, Some(first)) + link_cost(problem, Some(second), next)
        - link_cost(problem, previous, next)
}

/// Checks whether a contiguous slice is closed under pickup-delivery pairing: every
/// pair member brings its partner along.
pub(crate) fn is_pair_closed(problem: &Problem, ranks: &[usize]) -> bool {
    ranks.iter().all(|&rank| match problem.jobs[rank].job_type {
        JobType::Single => true,
        _ => problem.paired_rank(rank).map_or(false, |partner| ranks.contains(&partner)),
    })
}

/// Checks whether all jobs of a slice are independent singles.
pub(crate) fn is_all_single(problem: &Problem, ranks: &[usize]) -> bool {
    ranks.iter().all(|&rank| problem.jobs[rank].job_type == JobType::Single)
}

/// Checks whether every delivery of a resequenced span is still preceded by its pickup.
/// A pickup absent from the span sits before it: the span occupies a fixed index range,
/// so relative order against untouched positions cannot change.
pub(crate) fn is_order_preserved(problem: &Problem, ranks: &[usize]) -> bool {
    let mut seen = HashSet::new();

    ranks.iter().all(|&rank| {
        seen.insert(rank);
        match problem.jobs[rank].job_type {
            JobType::Delivery => problem
                .paired_rank(rank)
                .map_or(false, |pickup| seen.contains(&pickup) || !ranks.contains(&pickup)),
            _ => true,
        }
    })
}

/// Checks whether given vehicle provides skills for every job of a slice.
pub(crate) fn vehicle_ok_with_all(problem: &Problem, vehicle: usize, ranks: &[usize]) -> bool {
    ranks.iter().all(|&rank| problem.vehicle_ok_with_job(vehicle, rank))
}
