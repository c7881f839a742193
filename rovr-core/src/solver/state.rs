//! Derived per-solution data used by the local search to evaluate moves cheaply.

#[cfg(test)]
#[path = "../../tests/unit/solver/state_test.rs"]
mod state_test;

use crate::models::common::{Cost, Location, Skills};
use crate::models::problem::Problem;
use crate::models::solution::{RawRoute, RouteMut};

/// Derived per-solution data refreshed after every accepted move: removal gains, skill
/// prefix unions and route costs. Never authoritative: the raw routes are.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SolutionState {
    /// Travel cost saved by removing the single job at a position.
    pub node_gains: Vec<Vec<Cost>>,
    /// Travel cost saved by removing the edge (two consecutive jobs) anchored at a position.
    pub edge_gains: Vec<Vec<Cost>>,
    /// Union of required skills over positions `0..=rank`.
    pub fwd_skills: Vec<Vec<Skills>>,
    /// Union of required skills over positions `rank..`; has one extra empty entry.
    pub bwd_skills: Vec<Vec<Skills>>,
    /// Total travel cost per route.
    pub route_costs: Vec<Cost>,
}

impl SolutionState {
    /// Creates state for given routes.
    pub fn new<R: RouteMut>(problem: &Problem, routes: &[R]) -> Self {
        let mut state = Self {
            node_gains: vec![Vec::new(); routes.len()],
            edge_gains: vec![Vec::new(); routes.len()],
            fwd_skills: vec![Vec::new(); routes.len()],
            bwd_skills: vec![Vec::new(); routes.len()],
            route_costs: vec![0; routes.len()],
        };
        state.refresh(problem, routes, 0..routes.len());

        state
    }

    /// Recomputes derived arrays for touched vehicles from scratch.
    pub fn refresh<R: RouteMut>(
        &mut self,
        problem: &Problem,
        routes: &[R],
        touched: impl IntoIterator<Item = usize>,
    ) {
        for vehicle in touched {
            let route = routes[vehicle].raw();

            self.route_costs[vehicle] = route_cost(problem, route);
            self.node_gains[vehicle] =
                (0..route.jobs.len()).map(|rank| node_removal_gain(problem, route, rank)).collect();
            self.edge_gains[vehicle] = (0..route.jobs.len().saturating_sub(1))
                .map(|rank| edge_removal_gain(problem, route, rank))
                .collect();

            let mut union = Skills::default();
            self.fwd_skills[vehicle] = route
                .jobs
                .iter()
                .map(|&job| {
                    union.extend(problem.jobs[job].skills.iter().copied());
                    union.clone()
                })
                .collect();

            let mut union = Skills::default();
            let mut bwd: Vec<_> = route
                .jobs
                .iter()
                .rev()
                .map(|&job| {
                    union.extend(problem.jobs[job].skills.iter().copied());
                    union.clone()
                })
                .collect();
            bwd.reverse();
            bwd.push(Skills::default());
            self.bwd_skills[vehicle] = bwd;
        }
    }

    /// Returns total cost over all routes.
    pub fn total_cost(&self) -> Cost {
        self.route_costs.iter().sum()
    }
}

/// Returns location of the element right before job position `rank`.
pub(crate) fn location_before(problem: &Problem, route: &RawRoute, rank: usize) -> Option<Location> {
    if rank == 0 {
        problem.vehicles[route.vehicle].start
    } else {
        Some(problem.jobs[route.jobs[rank - 1]].location)
    }
}

/// Returns location of the element right after job position `rank`.
pub(crate) fn location_after(problem: &Problem, route: &RawRoute, rank: usize) -> Option<Location> {
    if rank + 1 >= route.jobs.len() {
        problem.vehicles[route.vehicle].end
    } else {
        Some(problem.jobs[route.jobs[rank + 1]].location)
    }
}

/// Returns travel cost between two optional locations, zero when either side is absent.
pub(crate) fn link_cost(problem: &Problem, from: Option<Location>, to: Option<Location>) -> Cost {
    match (from, to) {
        (Some(from), Some(to)) => problem.matrix.cost(from, to),
        _ => 0,
    }
}

/// Returns total travel cost of a route including depot edges.
pub fn route_cost(problem: &Problem, route: &RawRoute) -> Cost {
    let vehicle = &problem.vehicles[route.vehicle];

    sequence_cost(problem, vehicle.start, vehicle.end, route.jobs.iter().map(|&job| problem.jobs[job].location))
}

/// Returns total travel cost of an arbitrary location sequence between optional depots.
pub(crate) fn sequence_cost(
    problem: &Problem,
    start: Option<Location>,
    end: Option<Location>,
    locations: impl Iterator<Item = Location>,
) -> Cost {
    let mut cost = 0;
    let mut previous = start;
    let mut visited = false;

    for location in locations {
        cost += link_cost(problem, previous, Some(location));
        previous = Some(location);
        visited = true;
    }

    // an unused vehicle does not pay the start-end edge
    if visited {
        cost += link_cost(problem, previous, end);
    }

    cost
}

fn node_removal_gain(problem: &Problem, route: &RawRoute, rank: usize) -> Cost {
    let previous = location_before(problem, route, rank);
    let current = Some(problem.jobs[route.jobs[rank]].location);
    let next = location_after(problem, route, rank);

    link_cost(problem, previous, current) + link_cost(problem, current, next) - link_cost(problem, previous, next)
}

fn edge_removal_gain(problem: &Problem, route: &RawRoute, rank: usize) -> Cost {
    let previous = location_before(problem, route, rank);
    let first = Some(problem.jobs[route.jobs[rank]].location);
    let second = Some(problem.jobs[route.jobs[rank + 1]].location);
    let next = location_after(problem, route, rank + 1);

    link_cost(problem, previous, first) + link_cost(problem, second, next) - link_cost(problem, previous, next)
}
