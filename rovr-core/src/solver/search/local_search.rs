#[cfg(test)]
#[path = "../../../tests/unit/solver/search/local_search_test.rs"]
mod local_search_test;

use crate::models::common::Cost;
use crate::models::problem::Problem;
use crate::models::solution::RouteMut;
use crate::solver::search::local::*;
use crate::solver::state::SolutionState;
use crate::utils::Quota;

struct Candidate<R> {
    gain: Cost,
    key: MoveKey,
    op_rank: u8,
    operator: Box<dyn LocalOperator<R>>,
}

/// A best-improvement local search over the operator catalogue. On each pass all
/// candidate moves with positive gain are collected, then tried for validity in
/// descending gain order; the first valid one is applied and the pass restarts.
/// Terminates when no positive-gain valid move exists.
#[derive(Default)]
pub struct LocalSearch {}

impl LocalSearch {
    /// Creates a new instance of `LocalSearch`.
    pub fn new() -> Self {
        Self {}
    }

    /// Improves routes in place until a local optimum or the quota is reached. Derived
    /// state is refreshed for touched vehicles after every accepted move and stays
    /// consistent with the routes on return.
    pub fn run<R: RouteMut>(
        &self,
        problem: &Problem,
        routes: &mut [R],
        state: &mut SolutionState,
        quota: Option<&(dyn Quota + Send + Sync)>,
    ) {
        loop {
            if quota.map_or(false, |quota| quota.is_reached()) {
                return;
            }

            let applied = {
                let ctx = SearchContext { problem, routes, state };
                let mut candidates = generate_candidates(&ctx);
                // higher gain first, then the lowest position tuple and operator rank
                candidates.sort_by(|left, right| {
                    right
                        .gain
                        .cmp(&left.gain)
                        .then(left.key.cmp(&right.key))
                        .then(left.op_rank.cmp(&right.op_rank))
                });

                candidates.into_iter().find(|candidate| candidate.operator.is_valid(&ctx))
            };

            match applied {
                Some(candidate) => {
                    candidate.operator.apply(problem, routes);
                    let (first, second) = candidate.operator.touched();
                    let touched = if first == second { vec![first] } else { vec![first, second] };
                    state.refresh(problem, routes, touched);
                }
                None => return,
            }
        }
    }
}

fn generate_candidates<R: RouteMut>(ctx: &SearchContext<R>) -> Vec<Candidate<R>> {
    let mut candidates = Vec::new();

    let mut push = |op_rank: u8, operator: Box<dyn LocalOperator<R>>| {
        let gain = operator.compute_gain(ctx);
        if gain > 0 {
            candidates.push(Candidate { gain, key: operator.key(), op_rank, operator });
        }
    };

    for s_vehicle in 0..ctx.routes.len() {
        let s_len = ctx.routes[s_vehicle].raw().jobs.len();

        for t_vehicle in 0..ctx.routes.len() {
            if s_vehicle == t_vehicle {
                continue;
            }
            let t_len = ctx.routes[t_vehicle].raw().jobs.len();

            for s_rank in 0..s_len {
                for t_rank in 0..=t_len {
                    push(0, Box::new(Relocate { s_vehicle, s_rank, t_vehicle, t_rank }));
                }
            }

            for s_rank in 0..s_len.saturating_sub(1) {
                for t_rank in 0..=t_len {
                    push(3, Box::new(OrOpt { s_vehicle, s_rank, t_vehicle, t_rank }));
                }
            }

            if s_vehicle < t_vehicle {
                for s_rank in 0..s_len {
                    for t_rank in 0..t_len {
                        push(1, Box::new(Exchange { s_vehicle, s_rank, t_vehicle, t_rank }));
                    }
                }

                for s_rank in 0..s_len.saturating_sub(1) {
                    for t_rank in 0..t_len.saturating_sub(1) {
                        push(2, Box::new(CrossExchange { s_vehicle, s_rank, t_vehicle, t_rank }));
                    }
                }

                for s_rank in 0..=s_len {
                    for t_rank in 0..=t_len {
                        if s_rank == s_len && t_rank == t_len {
                            continue;
                        }
                        push(4, Box::new(TwoOpt { s_vehicle, s_rank, t_vehicle, t_rank }));
                        push(5, Box::new(ReverseTwoOpt { s_vehicle, s_rank, t_vehicle, t_rank }));
                    }
                }
            }
        }

        for s_rank in 0..s_len {
            for t_rank in 0..s_len {
                if t_rank != s_rank {
                    push(6, Box::new(IntraRelocate { vehicle: s_vehicle, s_rank, t_rank }));
                }
            }
        }

        for s_rank in 0..s_len {
            for t_rank in s_rank + 1..s_len {
                push(7, Box::new(IntraExchange { vehicle: s_vehicle, s_rank, t_rank }));
                push(10, Box::new(IntraTwoOpt { vehicle: s_vehicle, s_rank, t_rank }));
            }
        }

        for s_rank in 0..s_len.saturating_sub(3) {
            for t_rank in s_rank + 2..s_len.saturating_sub(1) {
                push(8, Box::new(IntraCrossExchange { vehicle: s_vehicle, s_rank, t_rank }));
            }
        }

        for s_rank in 0..s_len.saturating_sub(1) {
            for t_rank in 0..s_len.saturating_sub(1) {
                if t_rank != s_rank {
                    push(9, Box::new(IntraOrOpt { vehicle: s_vehicle, s_rank, t_rank }));
                }
            }
        }
    }

    candidates
}
