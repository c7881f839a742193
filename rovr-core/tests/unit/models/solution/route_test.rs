use super::*;
use crate::helpers::models::*;
use crate::models::common::Amount;

fn delivery_problem() -> Problem {
    create_problem(
        vec![create_vehicle(1, 10)],
        vec![create_single(1, 1, 3), create_single(2, 2, 4)],
        3,
    )
}

#[test]
fn can_compute_startup_load_from_single_deliveries() {
    let problem = delivery_problem();

    let route = RawRoute::with_jobs(0, vec![0, 1], &problem);

    assert_eq!(*route.load_at(0), Amount::new(vec![7]));
    assert_eq!(*route.load_at(1), Amount::new(vec![4]));
    assert_eq!(*route.load_at(2), Amount::new(vec![0]));
}

#[test]
fn can_compute_load_peaks() {
    let problem = delivery_problem();

    let route = RawRoute::with_jobs(0, vec![0, 1], &problem);

    assert_eq!(*route.fwd_peak(0), Amount::new(vec![7]));
    assert_eq!(*route.fwd_peak(2), Amount::new(vec![7]));
    assert_eq!(*route.bwd_peak(0), Amount::new(vec![7]));
    assert_eq!(*route.bwd_peak(1), Amount::new(vec![4]));
    assert_eq!(*route.bwd_peak(2), Amount::new(vec![0]));
}

#[test]
fn can_check_single_addition_against_capacity() {
    let problem = delivery_problem();
    let route = RawRoute::with_jobs(0, vec![0, 1], &problem);

    let fitting = Amount::new(vec![3]);
    let too_big = Amount::new(vec![4]);
    let zero = Amount::new(vec![0]);

    assert!(route.is_valid_addition_for_capacity(&problem, &zero, &fitting, 0));
    assert!(!route.is_valid_addition_for_capacity(&problem, &zero, &too_big, 0));
    // a pickup rides until the route end, the tail peak is lower
    assert!(route.is_valid_addition_for_capacity(&problem, &too_big, &zero, 1));
}

#[test]
fn can_track_pair_loads_between_pickup_and_delivery() {
    let [pickup, delivery] = create_pair(1, 1, 2, 5);
    let problem = create_problem(vec![create_vehicle(1, 10)], vec![pickup, delivery], 3);

    let route = RawRoute::with_jobs(0, vec![0, 1], &problem);

    assert_eq!(*route.load_at(0), Amount::new(vec![0]));
    assert_eq!(*route.load_at(1), Amount::new(vec![5]));
    assert_eq!(*route.load_at(2), Amount::new(vec![0]));
}

#[test]
fn can_check_range_content_exactly() {
    let [pickup, delivery] = create_pair(1, 1, 2, 8);
    let problem =
        create_problem(vec![create_vehicle(1, 10)], vec![pickup, delivery, create_single(3, 1, 3)], 3);
    let route = RawRoute::with_jobs(0, vec![2], &problem);

    // startup load 3 plus the pair peak 8 exceeds capacity
    assert!(!route.is_valid_range_content(&problem, 0, 0, &[0, 1]));
    // after the delivery of job 2 the pair fits
    assert!(route.is_valid_range_content(&problem, 1, 1, &[0, 1]));
}

#[test]
fn can_replace_range_and_refresh_amounts() {
    let problem = delivery_problem();
    let mut route = RawRoute::with_jobs(0, vec![0, 1], &problem);

    route.replace(&problem, 0, 1, &[]);

    assert_eq!(route.jobs, vec![1]);
    assert_eq!(*route.load_at(0), Amount::new(vec![4]));
    assert_eq!(*route.load_at(1), Amount::new(vec![0]));
}
