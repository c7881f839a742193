use super::*;
use crate::helpers::models::*;
use crate::models::common::TimeWindow;
use crate::models::solution::StepType;
use crate::utils::ErrorKind;

fn two_window_problem() -> Problem {
    let mut vehicle = create_vehicle(1, 10);
    vehicle.time_window = TimeWindow::new(0, 100);

    let mut first = create_single(1, 1, 0);
    first.time_windows = vec![TimeWindow::new(10, 20)];
    first.service = 5;
    let mut second = create_single(2, 2, 0);
    second.time_windows = vec![TimeWindow::new(50, 60)];
    second.service = 5;

    create_problem(vec![vehicle], vec![first, second], 3)
}

fn job_route_steps(jobs: &[usize]) -> Vec<ValidationStep> {
    let mut steps = vec![ValidationStep::start()];
    steps.extend(jobs.iter().map(|&rank| ValidationStep::job(rank)));
    steps.push(ValidationStep::end());

    steps
}

#[test]
fn can_choose_earliest_start_times_within_minimal_makespan() {
    let problem = two_window_problem();

    let route = choose_eta(&problem, 0, &job_route_steps(&[0, 1])).unwrap();

    assert!(route.violations.is_empty());
    // the makespan optimum departs late and serves the first job at its window end
    assert_eq!(route.steps[0].service_start, 19);
    assert_eq!(route.steps[1].service_start, 20);
    assert_eq!(route.steps[2].service_start, 50);
    assert_eq!(route.steps[2].arrival, 26);
    assert_eq!(route.steps[2].waiting_time, 24);
    assert_eq!(route.steps[3].service_start, 56);
    assert_eq!(route.waiting_time, 24);
    assert_eq!(route.duration, 3);
    assert_eq!(route.cost, 3);
    assert_eq!(route.service, 10);
}

#[test]
fn scheduling_is_idempotent() {
    let problem = two_window_problem();
    let steps = job_route_steps(&[0, 1]);

    let first = choose_eta(&problem, 0, &steps).unwrap();
    let second = choose_eta(&problem, 0, &steps).unwrap();

    let arrivals = |route: &crate::models::solution::VehicleRoute| {
        route.steps.iter().map(|step| step.arrival).collect::<Vec<_>>()
    };
    assert_eq!(arrivals(&first), arrivals(&second));
}

#[test]
fn can_quantify_delay_when_route_exceeds_vehicle_window() {
    let mut vehicle = create_vehicle(1, 10);
    vehicle.time_window = TimeWindow::new(0, 10);
    let mut first = create_single(1, 1, 0);
    first.service = 20;
    let mut second = create_single(2, 2, 0);
    second.service = 20;
    let problem = create_problem(vec![vehicle], vec![first, second], 3);

    let route = choose_eta(&problem, 0, &job_route_steps(&[0, 1])).unwrap();

    let end_step = route.steps.last().unwrap();
    assert_eq!(end_step.step_type, StepType::End);
    assert!(end_step.violations.types.contains(&ViolationType::Delay));
    assert_eq!(route.violations.delay, 33);
    assert!(route.violations.types.contains(&ViolationType::Delay));
}

#[test]
fn can_report_missing_break() {
    let mut vehicle = create_vehicle(1, 10);
    vehicle.breaks.push(create_break(7, 0, 100, 5));
    let problem = create_problem(vec![vehicle], vec![create_single(1, 1, 0)], 2);

    let route = choose_eta(&problem, 0, &job_route_steps(&[0])).unwrap();

    assert!(route.violations.types.contains(&ViolationType::MissingBreak));
}

#[test]
fn can_schedule_break_between_jobs() {
    let mut vehicle = create_vehicle(1, 10);
    vehicle.time_window = TimeWindow::new(0, 100);
    vehicle.breaks.push(create_break(7, 0, 100, 5));
    let mut job = create_single(1, 1, 0);
    job.service = 5;
    let problem = create_problem(vec![vehicle], vec![job], 2);

    let mut steps = vec![ValidationStep::start(), ValidationStep::job(0)];
    steps.push(ValidationStep::vehicle_break(0));
    steps.push(ValidationStep::end());

    let route = choose_eta(&problem, 0, &steps).unwrap();

    assert!(route.violations.is_empty());
    assert_eq!(route.steps[2].step_type, StepType::Break);
    assert_eq!(route.steps[2].id, Some(7));
    assert_eq!(route.service, 10);
}

#[test]
fn can_reject_unschedulable_forced_services() {
    let problem = two_window_problem();
    let mut steps = job_route_steps(&[0, 1]);
    steps[1].forced_service.at = Some(15);
    steps[2].forced_service.before = Some(10);

    let result = choose_eta(&problem, 0, &steps);

    let error = result.err().unwrap();
    assert_eq!(error.kind(), ErrorKind::Input);
    assert!(error.message().contains("vehicle 1"));
}

#[test]
fn can_report_precedence_violation_for_misordered_pair() {
    let [pickup, delivery] = create_pair(1, 1, 2, 5);
    let problem = create_problem(vec![create_vehicle(1, 10)], vec![pickup, delivery], 3);

    // delivery first
    let route = choose_eta(&problem, 0, &job_route_steps(&[1, 0])).unwrap();

    assert!(route.violations.types.contains(&ViolationType::Precedence));
}
