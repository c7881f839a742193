use super::*;
use crate::helpers::models::*;
use crate::solver::state::{route_cost, SolutionState};

#[test]
fn gain_equals_exact_cost_delta() {
    let problem = create_asymmetric_problem();
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1, 2], &problem), RawRoute::new(1, &problem)];
    let state = SolutionState::new(&problem, &routes);

    for s_rank in 0..2 {
        let operator = OrOpt { s_vehicle: 0, s_rank, t_vehicle: 1, t_rank: 0 };

        let gain = {
            let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };
            LocalOperator::<RawRoute>::compute_gain(&operator, &ctx)
        };

        let mut changed = routes.clone();
        operator.apply(&problem, &mut changed);
        let old_cost: i64 = routes.iter().map(|route| route_cost(&problem, route)).sum();
        let new_cost: i64 = changed.iter().map(|route| route_cost(&problem, route)).sum();

        assert_eq!(gain, old_cost - new_cost, "inexact gain for edge at {s_rank}");
    }
}

#[test]
fn can_move_whole_pair_across_routes() {
    let [pickup, delivery] = create_pair(1, 1, 2, 5);
    let problem = create_problem(
        vec![create_vehicle(1, 10), create_vehicle(2, 10)],
        vec![pickup, delivery],
        3,
    );
    let mut routes = vec![RawRoute::with_jobs(0, vec![0, 1], &problem), RawRoute::new(1, &problem)];
    let state = SolutionState::new(&problem, &routes);

    let operator = OrOpt { s_vehicle: 0, s_rank: 0, t_vehicle: 1, t_rank: 0 };
    {
        let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };
        assert!(operator.is_valid(&ctx));
    }
    operator.apply(&problem, &mut routes);

    assert!(routes[0].jobs.is_empty());
    assert_eq!(routes[1].jobs, vec![0, 1]);
}

#[test]
fn cannot_move_half_of_a_pair() {
    let [pickup, delivery] = create_pair(1, 1, 2, 5);
    let problem = create_problem(
        vec![create_vehicle(1, 10), create_vehicle(2, 10)],
        vec![pickup, delivery, create_single(3, 1, 1)],
        3,
    );
    // edge covers the delivery and a trailing single, the pickup stays behind
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1, 2], &problem), RawRoute::new(1, &problem)];
    let state = SolutionState::new(&problem, &routes);
    let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };

    let operator = OrOpt { s_vehicle: 0, s_rank: 1, t_vehicle: 1, t_rank: 0 };

    assert!(!operator.is_valid(&ctx));
}

#[test]
fn intra_or_opt_gain_equals_exact_cost_delta() {
    let problem = create_asymmetric_problem();
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1, 2], &problem), RawRoute::new(1, &problem)];
    let state = SolutionState::new(&problem, &routes);

    for s_rank in 0..2 {
        for t_rank in (0..2).filter(|&t_rank| t_rank != s_rank) {
            let operator = IntraOrOpt { vehicle: 0, s_rank, t_rank };

            let gain = {
                let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };
                LocalOperator::<RawRoute>::compute_gain(&operator, &ctx)
            };

            let mut changed = routes.clone();
            operator.apply(&problem, &mut changed);
            let delta = route_cost(&problem, &routes[0]) - route_cost(&problem, &changed[0]);

            assert_eq!(gain, delta, "inexact gain for edge move {s_rank}->{t_rank}");
        }
    }
}
