#[cfg(test)]
#[path = "../../../../tests/unit/solver/search/local/exchange_test.rs"]
mod exchange_test;

use super::*;
use crate::solver::state::{location_after, sequence_cost};

/// A local search operator which swaps two single jobs between different routes.
pub struct Exchange {
    /// Source vehicle rank.
    pub s_vehicle: usize,
    /// Source job position.
    pub s_rank: usize,
    /// Target vehicle rank.
    pub t_vehicle: usize,
    /// Target job position.
    pub t_rank: usize,
}

impl<R: RouteMut> LocalOperator<R> for Exchange {
    fn compute_gain(&self, ctx: &SearchContext<R>) -> Cost {
        let problem = ctx.problem;
        let source = ctx.routes[self.s_vehicle].raw();
        let target = ctx.routes[self.t_vehicle].raw();

        let first = Some(problem.jobs[source.jobs[self.s_rank]].location);
        let second = Some(problem.jobs[target.jobs[self.t_rank]].location);

        let s_previous = location_before(problem, source, self.s_rank);
        let s_next = location_after(problem, source, self.s_rank);
        let t_previous = location_before(problem, target, self.t_rank);
        let t_next = location_after(problem, target, self.t_rank);

        let old_cost = link_cost(problem, s_previous, first)
            + link_cost(problem, first, s_next)
            + link_cost(problem, t_previous, second)
            + link_cost(problem, second, t_next);
        let new_cost = link_cost(problem, s_previous, second)
            + link_cost(problem, second, s_next)
            + link_cost(problem, t_previous, first)
            + link_cost(problem, first, t_next);

        old_cost - new_cost
    }

    fn is_valid(&self, ctx: &SearchContext<R>) -> bool {
        let source = &ctx.routes[self.s_vehicle];
        let target = &ctx.routes[self.t_vehicle];
        let s_job = source.raw().jobs[self.s_rank];
        let t_job = target.raw().jobs[self.t_rank];

        ctx.problem.jobs[s_job].job_type == JobType::Single
            && ctx.problem.jobs[t_job].job_type == JobType::Single
            && ctx.problem.vehicle_ok_with_job(self.t_vehicle, s_job)
            && ctx.problem.vehicle_ok_with_job(self.s_vehicle, t_job)
            && source.raw().is_valid_range_content(ctx.problem, self.s_rank, self.s_rank + 1, &[t_job])
            && target.raw().is_valid_range_content(ctx.problem, self.t_rank, self.t_rank + 1, &[s_job])
            && source.is_valid_replacement(ctx.problem, self.s_rank, self.s_rank + 1, &[t_job])
            && target.is_valid_replacement(ctx.problem, self.t_rank, self.t_rank + 1, &[s_job])
    }

    fn apply(&self, problem: &Problem, routes: &mut [R]) {
        let s_job = routes[self.s_vehicle].raw().jobs[self.s_rank];
        let t_job = routes[self.t_vehicle].raw().jobs[self.t_rank];

        routes[self.s_vehicle].replace(problem, self.s_rank, self.s_rank + 1, &[t_job]);
        routes[self.t_vehicle].replace(problem, self.t_rank, self.t_rank + 1, &[s_job]);
    }

    fn key(&self) -> MoveKey {
        (self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank)
    }

    fn touched(&self) -> (usize, usize) {
        (self.s_vehicle, self.t_vehicle)
    }
}

/// A local search operator which swaps two jobs within one route.
pub struct IntraExchange {
    /// Vehicle rank.
    pub vehicle: usize,
    /// First job position.
    pub s_rank: usize,
    /// Second job position, greater than the first one.
    pub t_rank: usize,
}

impl IntraExchange {
    fn new_sequence(&self, route: &RawRoute) -> Vec<usize> {
        let mut jobs = route.jobs.clone();
        jobs.swap(self.s_rank, self.t_rank);

        jobs
    }

    /// Positions outside `s..t + 1` are untouched by the swap.
    fn affected_span(&self) -> (usize, usize) {
        (self.s_rank, self.t_rank + 1)
    }
}

impl<R: RouteMut> LocalOperator<R> for IntraExchange {
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
