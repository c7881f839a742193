#[cfg(test)]
#[path = "../../../../tests/unit/solver/search/local/two_opt_test.rs"]
mod two_opt_test;

use super::*;
use crate::solver::state::sequence_cost;

fn tail_swap_gain<R: RouteMut>(
    ctx: &SearchContext<R>,
    s_vehicle: usize,
    s_rank: usize,
    t_vehicle: usize,
    t_rank: usize,
    reversed: bool,
) -> Cost {
    let problem = ctx.problem;
    let source = ctx.routes[s_vehicle].raw();
    let target = ctx.routes[t_vehicle].raw();

    let cost_of = |vehicle_rank: usize, head: &[usize], tail: &[usize]| {
        let vehicle = &problem.vehicles[vehicle_rank];
        let head = head.iter().map(|&job| problem.jobs[job].location);
        let tail = tail.iter().map(|&job| problem.jobs[job].location);

        if reversed {
            sequence_cost(problem, vehicle.start, vehicle.end, head.chain(tail.rev()))
        } else {
            sequence_cost(problem, vehicle.start, vehicle.end, head.chain(tail))
        }
    };

    let new_source = cost_of(s_vehicle, &source.jobs[..s_rank], &target.jobs[t_rank..]);
    let new_target = cost_of(t_vehicle, &target.jobs[..t_rank], &source.jobs[s_rank..]);

    ctx.state.route_costs[s_vehicle] + ctx.state.route_costs[t_vehicle] - new_source - new_target
}

fn tails<'a, R: RouteMut>(
    ctx: &SearchContext<'a, R>,
    s_vehicle: usize,
    s_rank: usize,
    t_vehicle: usize,
    t_rank: usize,
    reversed: bool,
) -> (Vec<usize>, Vec<usize>) {
    let mut s_tail = ctx.routes[s_vehicle].raw().jobs[s_rank..].to_vec();
    let mut t_tail = ctx.routes[t_vehicle].raw().jobs[t_rank..].to_vec();

    if reversed {
        s_tail.reverse();
        t_tail.reverse();
    }

    (s_tail, t_tail)
}

fn is_valid_tail_swap<R: RouteMut>(
    ctx: &SearchContext<R>,
    s_vehicle: usize,
    s_rank: usize,
    t_vehicle: usize,
    t_rank: usize,
    s_tail: &[usize],
    t_tail: &[usize],
) -> bool {
    let source = &ctx.routes[s_vehicle];
    let target = &ctx.routes[t_vehicle];
    let s_len = source.raw().jobs.len();
    let t_len = target.raw().jobs.len();

    ctx.state.bwd_skills[s_vehicle][s_rank].is_subset(&ctx.problem.vehicles[t_vehicle].skills)
        && ctx.state.bwd_skills[t_vehicle][t_rank].is_subset(&ctx.problem.vehicles[s_vehicle].skills)
        && source.raw().is_valid_range_content(ctx.problem, s_rank, s_len, t_tail)
        && target.raw().is_valid_range_content(ctx.problem, t_rank, t_len, s_tail)
        && source.is_valid_replacement(ctx.problem, s_rank, s_len, t_tail)
        && target.is_valid_replacement(ctx.problem, t_rank, t_len, s_tail)
}

fn apply_tail_swap<R: RouteMut>(
    problem: &Problem,
    routes: &mut [R],
    s_vehicle: usize,
    s_rank: usize,
    t_vehicle: usize,
    t_rank: usize,
    reversed: bool,
) {
    let mut s_tail = routes[s_vehicle].raw().jobs[s_rank..].to_vec();
    let mut t_tail = routes[t_vehicle].raw().jobs[t_rank..].to_vec();
    if reversed {
        s_tail.reverse();
        t_tail.reverse();
    }

    let s_len = routes[s_vehicle].raw().jobs.len();
    let t_len = routes[t_vehicle].raw().jobs.len();

    routes[s_vehicle].replace(problem, s_rank, s_len, &t_tail);
    routes[t_vehicle].replace(problem, t_rank, t_len, &s_tail);
}

/// A local search operator which exchanges route tails: everything from the source rank
/// in one route is swapped with everything from the target rank in another.
pub struct TwoOpt {
    /// Source vehicle rank.
    pub s_vehicle: usize,
    /// First position of the source tail.
    pub s_rank: usize,
    /// Target vehicle rank.
    pub t_vehicle: usize,
    /// First position of the target tail.
    pub t_rank: usize,
}

impl<R: RouteMut> LocalOperator<R> for TwoOpt {
    fn compute_gain(&self, ctx: &SearchContext<R>) -> Cost {
        tail_swap_gain(ctx, self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank, false)
    }

    fn is_valid(&self, ctx: &SearchContext<R>) -> bool {
        let (s_tail, t_tail) = tails(ctx, self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank, false);

        is_pair_closed(ctx.problem, &s_tail)
            && is_pair_closed(ctx.problem, &t_tail)
            && is_valid_tail_swap(ctx, self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank, &s_tail, &t_tail)
    }

    fn apply(&self, problem: &Problem, routes: &mut [R]) {
        apply_tail_swap(problem, routes, self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank, false);
    }

    fn key(&self) -> MoveKey {
        (self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank)
    }

    fn touched(&self) -> (usize, usize) {
        (self.s_vehicle, self.t_vehicle)
    }
}

/// A tail exchange with orientation reversal: each tail is appended to the other route
/// in reverse order. Restricted to tails of single jobs as reversal would break
/// pickup-delivery precedence.
pub struct ReverseTwoOpt {
    /// Source vehicle rank.
    pub s_vehicle: usize,
    /// First position of the source tail.
    pub s_rank: usize,
    /// Target vehicle rank.
    pub t_vehicle: usize,
    /// First position of the target tail.
    pub t_rank: usize,
}

impl<R: RouteMut> LocalOperator<R> for ReverseTwoOpt {
    fn compute_gain(&self, ctx: &SearchContext<R>) -> Cost {
        tail_swap_gain(ctx, self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank, true)
    }

    fn is_valid(&self, ctx: &SearchContext<R>) -> bool {
        let (s_tail, t_tail) = tails(ctx, self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank, true);

        is_all_single(ctx.problem, &s_tail)
            && is_all_single(ctx.problem, &t_tail)
            && is_valid_tail_swap(ctx, self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank, &s_tail, &t_tail)
    }

    fn apply(&self, problem: &Problem, routes: &mut [R]) {
        apply_tail_swap(problem, routes, self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank, true);
    }

    fn key(&self) -> MoveKey {
        (self.s_vehicle, self.s_rank, self.t_vehicle, self.t_rank)
    }

    fn touched(&self) -> (usize, usize) {
        (self.s_vehicle, self.t_vehicle)
    }
}

/// A local search operator which reverses a subsequence within one route.
pub struct IntraTwoOpt {
    /// Vehicle rank.
    pub vehicle: usize,
    /// First position of the reversed subsequence.
    pub s_rank: usize,
    /// Last position of the reversed subsequence.
    pub t_rank: usize,
}

impl IntraTwoOpt {
    fn new_sequence(&self, route: &RawRoute) -> Vec<usize> {
        let mut jobs = route.jobs.clone();
        jobs[self.s_rank..=self.t_rank].reverse();

        jobs
    }

    /// Positions outside `s..t + 1` are untouched by the reversal.
    fn affected_span(&self) -> (usize, usize) {
        (self.s_rank, self.t_rank + 1)
    }
}

impl<R: RouteMut> LocalOperator<R> for IntraTwoOpt {
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
