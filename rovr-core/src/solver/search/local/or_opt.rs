#[cfg(test)]
#[path = "../../../../tests/unit/solver/search/local/or_opt_test.rs"]
mod or_opt_test;

use super::*;
use crate::solver::state::sequence_cost;

/// A local search operator which moves an edge (two consecutive jobs) to another route
/// at a given rank. This is the move which carries a pickup-delivery pair across routes.
pub struct OrOpt {
    /// Source vehicle rank.
    pub s_vehicle: usize,
    /// Source edge position.
    pub s_rank: usize,
    /// Target vehicle rank.
    pub t_vehicle: usize,
    /// Target insertion position.
    pub t_rank: usize,
}

impl<R: RouteMut> LocalOperator<R> for OrOpt {
    fn compute_gain(&self, ctx: &SearchContext<R>) -> Cost {
        let problem = ctx.problem;
        let source = ctx.routes[self.s_vehicle].raw();
        let target = ctx.routes[self.t_vehicle].raw();

        let first = problem.jobs[source.jobs[self.s_rank]].location;
        let second = problem.jobs[source.jobs[self.s_rank + 1]].location;

        ctx.state.edge_gains[self.s_vehicle][self.s_rank]
            - add_cost_edge(problem, target, first, second, self.t_rank)
    }

    fn is_valid(&self, ctx: &SearchContext<R>) -> bool {
        let source = &ctx.routes[self.s_vehicle];
        let target = &ctx.routes[self.t_vehicle];
        let edge = [source.raw().jobs[self.s_rank], source.raw().jobs[self.s_rank + 1]];

        is_pair_closed(ctx.problem, &edge)
            && vehicle_ok_with_all(ctx.problem, self.t_vehicle, &edge)
            && target.raw().is_valid_range_content(ctx.problem, self.t_rank, self.t_rank, &edge)
            && target.is_valid_replacement(ctx.problem, self.t_rank, self.t_rank, &edge)
            && source.is_valid_replacement(ctx.problem, self.s_rank, self.s_rank + 2, &[])
    }

    fn apply(&self, problem: &Problem, routes: &mut [R]) {
        let edge = [
            routes[self.s_vehicle].raw().jobs[self.s_rank],
            routes[self.s_vehicle].raw().jobs[self.s_rank + 1],
        ];

        routes[self.s_vehicle].replace(problem, self.s_rank, self.s_rank + 2, &[]);
        routes[self.t_vehicle].replace(problem, self.t_rank, self.t_rank, &edge);
    }

    fn key(&self) -> MoveKey {
        (self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank)
    }

    fn touched(&self) -> (usize, usize) {
        (self.s_vehicle, self.t_vehicle)
    }
}

/// A local search operator which moves an edge within its route. The target rank
/// addresses the position after removal.
pub struct IntraOrOpt {
    /// Vehicle rank.
    pub vehicle: usize,
    /// Source edge position.
    pub s_rank: usize,
    /// Target position after removal.
    pub t_rank: usize,
}

impl IntraOrOpt {
    fn new_sequence(&self, route: &RawRoute) -> Vec<usize> {
        let mut jobs = route.jobs.clone();
        let second = jobs.remove(self.s_rank + 1);
        let first = jobs.remove(self.s_rank);
        jobs.insert(self.t_rank, second);
        jobs.insert(self.t_rank, first);

        jobs
    }

    /// Positions outside `min(s, t)..max(s, t) + 2` are untouched by the edge move.
    fn affected_span(&self) -> (usize, usize) {
        (self.s_rank.min(self.t_rank), self.s_rank.max(self.t_rank) + 2)
    }
}

impl<R: RouteMut> LocalOperator<R> for IntraOrOpt {
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
