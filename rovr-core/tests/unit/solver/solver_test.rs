use super::*;
use crate::helpers::models::*;
use crate::models::common::TimeWindow;
use crate::models::solution::StepType;
use std::sync::Arc;

fn quiet_environment() -> Arc<Environment> {
    Arc::new(Environment::new(None, Default::default(), Arc::new(|_| {})))
}

#[test]
fn can_solve_single_vehicle_capacitated_problem() {
    let problem = create_problem(
        vec![create_vehicle(1, 10)],
        vec![
            create_single(1, 1, 2),
            create_single(2, 2, 2),
            create_single(3, 3, 2),
            create_single(4, 4, 2),
        ],
        5,
    );

    let solution = Solver::new(Arc::new(problem), quiet_environment()).solve().unwrap();

    assert!(solution.unassigned.is_empty());
    assert_eq!(solution.summary.routes, 1);
    assert_eq!(solution.summary.cost, 5);
    assert!(solution.summary.violations.is_empty());
    assert_eq!(solution.routes[0].steps.len(), 6);
    assert_eq!(solution.routes[0].steps.first().unwrap().step_type, StepType::Start);
    assert_eq!(solution.routes[0].steps.last().unwrap().step_type, StepType::End);
}

#[test]
fn can_solve_time_window_problem() {
    let mut vehicle = create_vehicle(1, 10);
    vehicle.time_window = TimeWindow::new(0, 100);
    let mut first = create_single(1, 1, 0);
    first.time_windows = vec![TimeWindow::new(10, 20)];
    first.service = 5;
    let mut second = create_single(2, 2, 0);
    second.time_windows = vec![TimeWindow::new(50, 60)];
    second.service = 5;
    let problem = create_problem(vec![vehicle], vec![first, second], 3);

    let solution = Solver::new(Arc::new(problem), quiet_environment()).solve().unwrap();

    assert!(solution.unassigned.is_empty());
    assert!(solution.summary.violations.is_empty());
    let ids: Vec<_> = solution.routes[0]
        .steps
        .iter()
        .filter(|step| step.step_type == StepType::Job)
        .map(|step| step.id.unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn reports_unassigned_jobs_with_ids() {
    let problem = create_problem(
        vec![create_vehicle(1, 10)],
        vec![create_single(7, 1, 20), create_single(8, 2, 2)],
        3,
    );

    let solution = Solver::new(Arc::new(problem), quiet_environment()).solve().unwrap();

    assert_eq!(solution.unassigned, vec![7]);
    assert_eq!(solution.summary.unassigned, 1);
}

#[test]
fn can_keep_pair_within_one_route() {
    let [pickup, delivery] = create_pair(1, 1, 2, 5);
    let problem = create_problem(
        vec![create_vehicle(1, 5), create_vehicle(2, 5)],
        vec![pickup, delivery, create_single(3, 3, 5)],
        4,
    );

    let solution = Solver::new(Arc::new(problem), quiet_environment()).solve().unwrap();

    assert!(solution.unassigned.is_empty());
    for route in solution.routes.iter() {
        let pickups = route.steps.iter().filter(|step| step.step_type == StepType::Pickup).count();
        let deliveries = route.steps.iter().filter(|step| step.step_type == StepType::Delivery).count();
        assert_eq!(pickups, deliveries, "pair split across routes");
    }
}

#[test]
fn identical_runs_produce_identical_solutions() {
    let solve = || {
        let problem = create_problem(
            vec![create_vehicle(1, 10), create_vehicle(2, 10)],
            vec![
                create_single(1, 1, 2),
                create_single(2, 2, 2),
                create_single(3, 3, 2),
                create_single(4, 4, 2),
            ],
            5,
        );
        Solver::new(Arc::new(problem), quiet_environment()).solve().unwrap()
    };

    let first = solve();
    let second = solve();

    assert_eq!(first.summary.cost, second.summary.cost);
    let job_orders = |solution: &Solution| {
        solution
            .routes
            .iter()
            .map(|route| route.steps.iter().filter_map(|step| step.id).collect::<Vec<_>>())
            .collect::<Vec<_>>()
    };
    assert_eq!(job_orders(&first), job_orders(&second));
    let arrivals = |solution: &Solution| {
        solution
            .routes
            .iter()
            .map(|route| route.steps.iter().map(|step| step.arrival).collect::<Vec<_>>())
            .collect::<Vec<_>>()
    };
    assert_eq!(arrivals(&first), arrivals(&second));
}
