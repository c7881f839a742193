#[cfg(test)]
#[path = "../../../../tests/unit/solver/search/local/cross_exchange_test.rs"]
mod cross_exchange_test;

use super::*;
use crate::solver::state::{location_after, sequence_cost};

/// A local search operator which swaps two edges (pairs of consecutive jobs) between
/// different routes.
pub struct CrossExchange {
    /// Source vehicle rank.
    pub s_vehicle: usize,
    /// Source edge position.
    pub s_rank: usize,
    /// Target vehicle rank.
    pub t_vehicle: usize,
    /// Target edge position.
    pub t_rank: usize,
}

impl CrossExchange {
    fn slices<'a, R: RouteMut>(&self, ctx: &SearchContext<'a, R>) -> ([usize; 2], [usize; 2]) {
        let source = ctx.routes[self.s_vehicle].raw();
        let target = ctx.routes[self.t_vehicle].raw();

        (
            [source.jobs[self.s_rank], source.jobs[self.s_rank + 1]],
            [target.jobs[self.t_rank], target.jobs[self.t_rank + 1]],
        )
    }
}

impl<R: RouteMut> LocalOperator<R> for CrossExchange {
    fn compute_gain(&self, ctx: &SearchContext<R>) -> Cost {
        let problem = ctx.problem;
        let source = ctx.routes[self.s_vehicle].raw();
        let target = ctx.routes[self.t_vehicle].raw();
        let (s_edge, t_edge) = self.slices(ctx);

        let edge_locations = |edge: &[usize; 2]| {
            (problem.jobs[edge[0]].location, problem.jobs[edge[1]].location)
        };
        let (a1, a2) = edge_locations(&s_edge);
        let (b1, b2) = edge_locations(&t_edge);

        let s_previous = location_before(problem, source, self.s_rank);
        let s_next = location_after(problem, source, self.s_rank + 1);
        let t_previous = location_before(problem, target, self.t_rank);
        let t_next = location_after(problem, target, self.t_rank + 1);

        let old_cost = link_cost(problem, s_previous, Some(a1))
            + problem.matrix.cost(a1, a2)
            + link_cost(problem, Some(a2), s_next)
            + link_cost(problem, t_previous, Some(b1))
            + problem.matrix.cost(b1, b2)
            + link_cost(problem, Some(b2), t_next);
        let new_cost = link_cost(problem, s_previous, Some(b1))
            + problem.matrix.cost(b1, b2)
            + link_cost(problem, Some(b2), s_next)
            + link_cost(problem, t_previous, Some(a1))
            + problem.matrix.cost(a1, a2)
            + link_cost(problem, Some(a2), t_next);

        old_cost - new_cost
    }

    fn is_valid(&self, ctx: &SearchContext<R>) -> bool {
        let source = &ctx.routes[self.s_vehicle];
        let target = &ctx.routes[self.t_vehicle];
        let (s_edge, t_edge) = self.slices(ctx);

        is_pair_closed(ctx.problem, &s_edge)
            && is_pair_closed(ctx.problem, &t_edge)
            && vehicle_ok_with_all(ctx.problem, self.t_vehicle, &s_edge)
            && vehicle_ok_with_all(ctx.problem, self.s_vehicle, &t_edge)
            && source.raw().is_valid_range_content(ctx.problem, self.s_rank, self.s_rank + 2, &t_edge)
            && target.raw().is_valid_range_content(ctx.problem, self.t_rank, self.t_rank + 2, &s_edge)
            && source.is_valid_replacement(ctx.problem, self.s_rank, self.s_rank + 2, &t_edge)
            && target.is_valid_replacement(ctx.problem, self.t_rank, self.t_rank + 2, &s_edge)
    }

    fn apply(&self, problem: &Problem, routes: &mut [R]) {
        let s_edge = [
            routes[self.s_vehicle].raw().jobs[self.s_rank],
            routes[self.s_vehicle].raw().jobs[self.s_rank + 1],
        ];
        let t_edge = [
            routes[self.t_vehicle].raw().jobs[self.t_rank],
            routes[self.t_vehicle].raw().jobs[self.t_rank + 1],
        ];

        routes[self.s_vehicle].replace(problem, self.s_rank, self.s_rank + 2, &t_edge);
        routes[self.t_vehicle].replace(problem, self.t_rank, self.t_rank + 2, &s_edge);
    }

    fn key(&self) -> MoveKey {
        (self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank)
    }

    fn touched(&self) -> (usize, usize) {
        (self.s_vehicle, self.t_vehicle)
    }
}

/// A local search operator which swaps two non-overlapping edges within one route.
pub struct IntraCrossExchange {
    /// Vehicle rank.
    pub vehicle: usize,
    /// First edge position.
    pub s_rank: usize,
    /// Second edge position, at least two positions apart.
    pub t_rank: usize,
}

impl IntraCrossExchange {
    fn new_sequence(&self, route: &RawRoute) -> Vec<usize> {
        let mut jobs = route.jobs.clone();
        jobs.swap(self.s_rank, self.t_rank);
        jobs.swap(self.s_rank + 1, self.t_rank + 1);

        jobs
    }

    /// Positions outside `s..t + 2` are untouched by the edge swap.
    fn affected_span(&self) -> (usize, usize) {
        (self.s_rank, self.t_rank + 2)
    }
}

impl<R: RouteMut> LocalOperator<R> for IntraCrossExchange {
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
