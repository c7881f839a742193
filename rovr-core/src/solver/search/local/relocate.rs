#[cfg(test)]
#[path = "../../../../tests/unit/solver/search/local/relocate_test.rs"]
mod relocate_test;

use super::*;
use crate::solver::state::sequence_cost;

/// A local search operator which moves a single job to another route at a given rank.
pub struct Relocate {
    /// Source vehicle rank.
    pub s_vehicle: usize,
    /// Source job position.
    pub s_rank: usize,
    /// Target vehicle rank.
    pub t_vehicle: usize,
    /// Target insertion position.
    pub t_rank: usize,
}

impl<R: RouteMut> LocalOperator<R> for Relocate {
    fn compute_gain(&self, ctx: &SearchContext<R>) -> Cost {
        let source = ctx.routes[self.s_vehicle].raw();
        let target = ctx.routes[self.t_vehicle].raw();
        let location = ctx.problem.jobs[source.jobs[self.s_rank]].location;

        ctx.state.node_gains[self.s_vehicle][self.s_rank]
            - add_cost_node(ctx.problem, target, location, self.t_rank)
    }

    fn is_valid(&self, ctx: &SearchContext<R>) -> bool {
        let source = &ctx.routes[self.s_vehicle];
        let target = &ctx.routes[self.t_vehicle];
        let job_rank = source.raw().jobs[self.s_rank];
        let job = &ctx.problem.jobs[job_rank];

        job.job_type == JobType::Single
            && ctx.problem.vehicle_ok_with_job(self.t_vehicle, job_rank)
            && target.raw().is_valid_addition_for_capacity(ctx.problem, &job.pickup, &job.delivery, self.t_rank)
            && target.is_valid_replacement(ctx.problem, self.t_rank, self.t_rank, &[job_rank])
            && source.is_valid_replacement(ctx.problem, self.s_rank, self.s_rank + 1, &[])
    }

    fn apply(&self, problem: &Problem, routes: &mut [R]) {
        let job_rank = routes[self.s_vehicle].raw().jobs[self.s_rank];

        routes[self.s_vehicle].replace(problem, self.s_rank, self.s_rank + 1, &[]);
        routes[self.t_vehicle].replace(problem, self.t_rank, self.t_rank, &[job_rank]);
    }

    fn key(&self) -> MoveKey {
        (self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank)
    }

    fn touched(&self) -> (usize, usize) {
        (self.s_vehicle, self.t_vehicle)
    }
}

/// A local search operator which moves a single job within its route. The target rank
/// addresses the position after removal.
pub struct IntraRelocate {
    /// Vehicle rank.
    pub vehicle: usize,
    /// Source job position.
    pub s_rank: usize,
    /// Target position after removal.
    pub t_rank: usize,
}

impl IntraRelocate {
    fn new_sequence(&self, route: &RawRoute) -> Vec<usize> {
        let mut jobs = route.jobs.clone();
        let job = jobs.remove(self.s_rank);
        jobs.insert(self.t_rank, job);

        jobs
    }

    /// Positions outside `min(s, t)..max(s, t) + 1` are untouched by the move.
    fn affected_span(&self) -> (usize, usize) {
        (self.s_rank.min(self.t_rank), self.s_rank.max(self.t_rank) + 1)
    }
}

impl<R: RouteMut> LocalOperator<R> for IntraRelocate {
    fn compute_gain(&self, ctx: &SearchContext<R>) -> Cost {
        let route = ctx.routes[self.vehicle].raw();
        let vehicle = &ctx.problem.vehicles[self.vehicle];
        let jobs = self.new_sequence(route);

        ctx.state.route_costs[self.vehicle]
            - sequence_cost(
                ctx.problem,
                vehicle.start,
                vehicle.end,
                jobs.iter().map(|&job| ctx.problem.jobs[job].location),
            )
    }

    fn is_valid(&self, ctx: &SearchContext<R>) -> bool {
        let route = &ctx.routes[self.vehicle];
        let jobs = self.new_sequence(route.raw());
        let (first, last) = self.affected_span();
        let span = &jobs[first..last];

        is_order_preserved(ctx.problem, span)
            && route.raw().is_valid_range_content(ctx.problem, first, last, span)
            && route.is_valid_replacement(ctx.problem, first, last, span)
    }

    fn apply(&self, problem: &Problem, routes: &mut [R]) {
        let jobs = self.new_sequence(routes[self.vehicle].raw());
        let (first, last) = self.affected_span();

        routes[self.vehicle].replace(problem, first, last, &jobs[first..last]);
    }

    fn key(&self) -> MoveKey {
        (self.vehicle, self.s_rank, self.vehicle, self.t_rank)
    }

    fn touched(&self) -> (usize, usize) {
        (self.vehicle, self.vehicle)
    }
}
