use super::*;
use crate::helpers::models::*;
use crate::solver::state::{route_cost, SolutionState};

fn create_routes(problem: &Problem) -> Vec<RawRoute> {
    vec![RawRoute::with_jobs(0, vec![0, 1], problem), RawRoute::with_jobs(1, vec![2], problem)]
}

#[test]
fn gain_equals_exact_cost_delta() {
    let problem = create_asymmetric_problem();
    let routes = create_routes(&problem);
    let state = SolutionState::new(&problem, &routes);

    for s_rank in 0..2 {
        for t_rank in 0..=1 {
            let operator = Relocate { s_vehicle: 0, s_rank, t_vehicle: 1, t_rank };

            let gain = {
                let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };
                LocalOperator::<RawRoute>::compute_gain(&operator, &ctx)
            };

            let mut changed = routes.clone();
            operator.apply(&problem, &mut changed);
            let old_cost: i64 = routes.iter().map(|route| route_cost(&problem, route)).sum();
            let new_cost: i64 = changed.iter().map(|route| route_cost(&problem, route)).sum();

            assert_eq!(gain, old_cost - new_cost, "inexact gain for move {s_rank}->{t_rank}");
        }
    }
}

#[test]
fn move_and_inverse_restore_solution_and_state() {
    let problem = create_asymmetric_problem();
    let mut routes = create_routes(&problem);
    let mut state = SolutionState::new(&problem, &routes);
    let original_jobs: Vec<_> = routes.iter().map(|route| route.jobs.clone()).collect();
    let original_state = state.clone();

    let forward = Relocate { s_vehicle: 0, s_rank: 1, t_vehicle: 1, t_rank: 0 };
    forward.apply(&problem, &mut routes);
    state.refresh(&problem, &routes, vec![0, 1]);

    let inverse = Relocate { s_vehicle: 1, s_rank: 0, t_vehicle: 0, t_rank: 1 };
    inverse.apply(&problem, &mut routes);
    state.refresh(&problem, &routes, vec![0, 1]);

    let jobs: Vec<_> = routes.iter().map(|route| route.jobs.clone()).collect();
    assert_eq!(jobs, original_jobs);
    assert_eq!(state, original_state);
}

#[test]
fn cannot_relocate_pair_members_alone() {
    let [pickup, delivery] = create_pair(1, 1, 2, 5);
    let problem = create_problem(
        vec![create_vehicle(1, 10), create_vehicle(2, 10)],
        vec![pickup, delivery],
        3,
    );
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1], &problem), RawRoute::new(1, &problem)];
    let state = SolutionState::new(&problem, &routes);
    let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };

    let operator = Relocate { s_vehicle: 0, s_rank: 0, t_vehicle: 1, t_rank: 0 };

    assert!(!operator.is_valid(&ctx));
}

#[test]
fn cannot_relocate_over_capacity() {
    let problem = create_problem(
        vec![create_vehicle(1, 10), create_vehicle(2, 1)],
        vec![create_single(1, 1, 5), create_single(2, 2, 1)],
        3,
    );
    let routes = vec![RawRoute::with_jobs(0, vec![0], &problem), RawRoute::with_jobs(1, vec![1], &problem)];
    let state = SolutionState::new(&problem, &routes);
    let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };

    let operator = Relocate { s_vehicle: 0, s_rank: 0, t_vehicle: 1, t_rank: 0 };

    assert!(!operator.is_valid(&ctx));
}

#[test]
fn intra_relocate_gain_equals_exact_cost_delta() {
    let problem = create_asymmetric_problem();
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1, 2], &problem), RawRoute::new(1, &problem)];
    let state = SolutionState::new(&problem, &routes);

    for s_rank in 0..3 {
        for t_rank in (0..3).filter(|&t_rank| t_rank != s_rank) {
            let operator = IntraRelocate { vehicle: 0, s_rank, t_rank };

            let gain = {
                let ctx = SearchContext { problem: &problem, routes: &routes, state: &state };
                LocalOperator::<RawRoute>::compute_gain(&operator, &ctx)
            };

            let mut changed = routes.clone();
            operator.apply(&problem, &mut changed);
            let delta = route_cost(&problem, &routes[0]) - route_cost(&problem, &changed[0]);

            assert_eq!(gain, delta, "inexact gain for move {s_rank}->{t_rank}");
        }
    }
}
