//! Contains the solver facade which orchestrates construction and local search across
//! problem variants and assembles the final report.

#[cfg(test)]
#[path = "../../tests/unit/solver/solver_test.rs"]
mod solver_test;

pub mod search;
pub mod state;

use crate::algorithms::validation::{choose_eta, ValidationStep};
use crate::construction::heuristics::{RegretInsertion, SeedStrategy};
use crate::models::problem::Problem;
use crate::models::solution::{RawRoute, RouteMut, Solution, Summary, TwRoute, VehicleRoute};
use crate::solver::search::LocalSearch;
use crate::solver::state::SolutionState;
use crate::utils::{parallel_into_collect, Environment, SolverError, SolverResult};
use std::sync::Arc;

/// Solves capacitated and time window constrained vehicle routing problems: a pool of
/// construction seeds is improved independently by local search, the cheapest result is
/// validated and reported.
pub struct Solver {
    problem: Arc<Problem>,
    environment: Arc<Environment>,
}

impl Solver {
    /// Creates a new instance of `Solver`.
    pub fn new(problem: Arc<Problem>, environment: Arc<Environment>) -> Self {
        Self { problem, environment }
    }

    /// Runs the solve pipeline and returns the best found solution.
    pub fn solve(&self) -> SolverResult<Solution> {
        let variant = if self.problem.has_time_constraints() { "time window" } else { "capacitated" };
        (self.environment.logger)(&format!(
            "solving {variant} problem with {} jobs and {} vehicles",
            self.problem.jobs.len(),
            self.problem.vehicles.len()
        ));

        if self.problem.has_time_constraints() {
            self.solve_with::<TwRoute>()
        } else {
            self.solve_with::<RawRoute>()
        }
    }

    fn solve_with<R: RouteMut>(&self) -> SolverResult<Solution> {
        let problem = self.problem.as_ref();
        let quota = self.environment.quota.clone();

        let seeds: Vec<(u32, RegretInsertion)> = (1..=4_usize)
            .flat_map(|regret| [SeedStrategy::None, SeedStrategy::NearestFromStart].map(|seed| (regret, seed)))
            .enumerate()
            .map(|(tag, (regret, seed))| (tag as u32, RegretInsertion::new(regret, seed)))
            .collect();

        let results = parallel_into_collect(seeds, |(tag, heuristic)| {
            let (mut routes, unassigned) = heuristic.build::<R>(problem);
            let mut state = SolutionState::new(problem, &routes);

            LocalSearch::new().run(problem, &mut routes, &mut state, quota.as_deref());

            (tag, state.total_cost(), routes, unassigned)
        });

        let (tag, cost, routes, unassigned) = results
            .into_iter()
            .min_by_key(|(tag, cost, _, _)| (*cost, *tag))
            .ok_or_else(|| SolverError::internal("no solution candidates produced"))?;

        (self.environment.logger)(&format!("best seed {tag} with cost {cost}"));

        self.finalize(&routes, unassigned)
    }

    /// Passes every used route through the validation scheduler and aggregates the
    /// reportable solution.
    fn finalize<R: RouteMut>(&self, routes: &[R], unassigned: Vec<usize>) -> SolverResult<Solution> {
        let problem = self.problem.as_ref();
        let mut vehicle_routes: Vec<VehicleRoute> = Vec::new();

        for route in routes.iter().filter(|route| !route.raw().is_empty()) {
            let steps = build_validation_steps(route);
            vehicle_routes.push(choose_eta(problem, route.raw().vehicle, &steps)?);
        }

        let mut summary = Summary {
            routes: vehicle_routes.len(),
            unassigned: unassigned.len(),
            ..Summary::default()
        };
        for route in vehicle_routes.iter() {
            summary.cost += route.cost;
            summary.service += route.service;
            summary.duration += route.duration;
            summary.waiting_time += route.waiting_time;
            summary.violations.extend(route.violations.types.iter().copied());
        }

        let mut unassigned: Vec<u64> = unassigned.into_iter().map(|rank| problem.jobs[rank].id).collect();
        unassigned.sort_unstable();

        Ok(Solution { summary, routes: vehicle_routes, unassigned })
    }
}

fn build_validation_steps<R: RouteMut>(route: &R) -> Vec<ValidationStep> {
    let jobs = &route.raw().jobs;
    let mut steps = Vec::with_capacity(jobs.len() + 2);

    steps.push(ValidationStep::start());
    for (rank, &job) in jobs.iter().enumerate() {
        for planned in route.breaks_before(rank) {
            steps.push(ValidationStep::vehicle_break(planned.break_rank));
        }
        steps.push(ValidationStep::job(job));
    }
    for planned in route.breaks_before(jobs.len()) {
        steps.push(ValidationStep::vehicle_break(planned.break_rank));
    }
    steps.push(ValidationStep::end());

    steps
}
