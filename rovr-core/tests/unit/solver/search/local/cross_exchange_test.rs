use super::*;
use crate::helpers::models::*;
use crate::models::matrix::CostMatrix;
use crate::solver::state::{route_cost, SolutionState};

fn four_jobs_problem() -> Problem {
    let matrix = CostMatrix::new(
        5,
        vec![
            0, 2, 9, 10, 4, //
            1, 0, 6, 4, 8, //
            15, 7, 0, 8, 3, //
            6, 3, 12, 0, 5, //
            2, 11, 4, 7, 0,
        ],
    )
    .unwrap();

    Problem::new(
        vec![create_vehicle(1, 10), create_vehicle(2, 10)],
        vec![
            create_single(1, 1, 1),
            create_single(2, 2, 1),
            create_single(3, 3, 1),
            create_single(4, 4, 1),
        ],
        matrix,
    )
    .unwrap()
}

#[test]
fn gain_equals_exact_cost_delta() {
    let problem = four_jobs_problem();
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1], &problem), RawRoute::with_jobs(1, vec![2, 3], &problem)];
    let state = SolutionState::new(&problem, &routes);

    let operator = CrossExchange { s_vehicle: 0, s_rank: 0, t_vehicle: 1, t_rank: 0 };

    let gain = {
        let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };
        LocalOperator::<RawRoute>::compute_gain(&operator, &ctx)
    };

    let mut changed = routes.clone();
    operator.apply(&problem, &mut changed);
    let old_cost: i64 = routes.iter().map(|route| route_cost(&problem, route)).sum();
    let new_cost: i64 = changed.iter().map(|route| route_cost(&problem, route)).sum();

    assert_eq!(gain, old_cost - new_cost);
    assert_eq!(changed[0].jobs, vec![2, 3]);
    assert_eq!(changed[1].jobs, vec![0, 1]);
}

#[test]
fn can_swap_whole_pairs() {
    let [first_pickup, first_delivery] = create_pair(1, 1, 2, 5);
    let [second_pickup, second_delivery] = create_pair(3, 3, 4, 5);
    let problem = Problem::new(
        vec![create_vehicle(1, 10), create_vehicle(2, 10)],
        vec![first_pickup, first_delivery, second_pickup, second_delivery],
        create_matrix(5, 1),
    )
    .unwrap();
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1], &problem), RawRoute::with_jobs(1, vec![2, 3], &problem)];
    let state = SolutionState::new(&problem, &routes);
    let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };

    let operator = CrossExchange { s_vehicle: 0, s_rank: 0, t_vehicle: 1, t_rank: 0 };

    assert!(operator.is_valid(&ctx));
}

#[test]
fn cannot_swap_edge_splitting_a_pair() {
    let [pickup, delivery] = create_pair(1, 1, 2, 5);
    let problem = Problem::new(
        vec![create_vehicle(1, 10), create_vehicle(2, 10)],
        vec![pickup, delivery, create_single(3, 3, 1), create_single(4, 4, 1), create_single(5, 1, 1)],
        create_matrix(5, 1),
    )
    .unwrap();
    // source edge covers the pickup and its delivery shifted by one single
    let routes =
        vec![RawRoute::with_jobs(0, vec![4, 0, 1], &problem), RawRoute::with_jobs(1, vec![2, 3], &problem)];
    let state = SolutionState::new(&problem, &routes);
    let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };

    let operator = CrossExchange { s_vehicle: 0, s_rank: 0, t_vehicle: 1, t_rank: 0 };

    assert!(!operator.is_valid(&ctx));
}

#[test]
fn intra_cross_exchange_gain_equals_exact_cost_delta() {
    let problem = four_jobs_problem();
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1, 2, 3], &problem), RawRoute::new(1, &problem)];
    let state = SolutionState::new(&problem, &routes);

    let operator = IntraCrossExchange { vehicle: 0, s_rank: 0, t_rank: 2 };

    let gain = {
        let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };
        LocalOperator::<RawRoute>::compute_gain(&operator, &ctx)
    };

    let mut changed = routes.clone();
    operator.apply(&problem, &mut changed);
    let delta = route_cost(&problem, &routes[0]) - route_cost(&problem, &changed[0]);

    assert_eq!(gain, delta);
    assert_eq!(changed[0].jobs, vec![2, 3, 0, 1]);
}
