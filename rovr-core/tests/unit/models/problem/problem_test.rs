use super::*;
use crate::helpers::models::*;
use crate::utils::ErrorKind;

#[test]
fn cannot_create_problem_without_vehicles() {
    let result = Problem::new(vec![], vec![create_single(1, 1, 1)], create_matrix(2, 1));

    assert_eq!(result.err().map(|error| error.kind()), Some(ErrorKind::Input));
}

#[test]
fn cannot_create_problem_with_job_outside_matrix() {
    let result = Problem::new(vec![create_vehicle(1, 10)], vec![create_single(1, 5, 1)], create_matrix(2, 1));

    assert!(result.is_err());
}

#[test]
fn cannot_create_problem_with_impossible_skills() {
    let mut job = create_single(1, 1, 1);
    job.skills.insert(7);
    let mut vehicle = create_vehicle(1, 10);
    vehicle.skills.extend([1, 2]);

    let result = Problem::new(vec![vehicle], vec![job], create_matrix(2, 1));

    let error = result.err().unwrap();
    assert_eq!(error.kind(), ErrorKind::Input);
    assert!(error.message().contains("skills"));
}

#[test]
fn cannot_create_problem_with_orphan_pair_members() {
    let [pickup, _] = create_pair(1, 1, 2, 5);

    let result = Problem::new(vec![create_vehicle(1, 10)], vec![pickup], create_matrix(3, 1));

    assert!(result.is_err());
}

#[test]
fn cannot_create_problem_with_mismatched_pair_amounts() {
    let [pickup, mut delivery] = create_pair(1, 1, 2, 5);
    delivery.delivery = Amount::new(vec![3]);

    let result = Problem::new(vec![create_vehicle(1, 10)], vec![pickup, delivery], create_matrix(3, 1));

    assert!(result.is_err());
}

#[test]
fn can_check_vehicle_job_compatibility() {
    let mut job = create_single(1, 1, 1);
    job.skills.insert(1);
    let mut capable = create_vehicle(1, 10);
    capable.skills.extend([1, 2]);
    let incapable = create_vehicle(2, 10);

    let problem = create_problem(vec![capable, incapable], vec![job], 2);

    assert!(problem.vehicle_ok_with_job(0, 0));
    assert!(!problem.vehicle_ok_with_job(1, 0));
}

#[test]
fn can_pad_amounts_to_common_dimension() {
    let mut vehicle = create_vehicle(1, 10);
    vehicle.capacity = Amount::new(vec![10, 5]);

    let problem = create_problem(vec![vehicle], vec![create_single(1, 1, 1)], 2);

    assert_eq!(problem.zero_amount(), Amount::zero(2));
    assert_eq!(problem.jobs[0].delivery, Amount::new(vec![1, 0]));
}

#[test]
fn can_detect_time_constraints() {
    let no_tw = create_problem(vec![create_vehicle(1, 10)], vec![create_single(1, 1, 1)], 2);
    assert!(!no_tw.has_time_constraints());

    let mut job = create_single(1, 1, 1);
    job.time_windows = vec![TimeWindow::new(0, 100)];
    let with_tw = create_problem(vec![create_vehicle(1, 10)], vec![job], 2);
    assert!(with_tw.has_time_constraints());

    let mut vehicle = create_vehicle(1, 10);
    vehicle.breaks.push(create_break(1, 0, 100, 10));
    let with_breaks = create_problem(vec![vehicle], vec![create_single(1, 1, 1)], 2);
    assert!(with_breaks.has_time_constraints());
}

#[test]
fn can_resolve_paired_ranks() {
    let [pickup, delivery] = create_pair(1, 1, 2, 5);
    let problem = create_problem(vec![create_vehicle(1, 10)], vec![pickup, delivery, create_single(3, 1, 1)], 3);

    assert_eq!(problem.paired_rank(0), Some(1));
    assert_eq!(problem.paired_rank(1), Some(0));
    assert_eq!(problem.paired_rank(2), None);
}
