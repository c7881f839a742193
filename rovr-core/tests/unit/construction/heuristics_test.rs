use super::*;
use crate::models::matrix::CostMatrix;
use crate::models::solution::RawRoute;
use crate::helpers::models::*;

#[test]
fn can_build_feasible_routes_for_singles() {
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

    let (routes, unassigned) = RegretInsertion::new(1, SeedStrategy::None).build::<RawRoute>(&problem);

    assert!(unassigned.is_empty());
    let mut assigned = routes[0].jobs.clone();
    assigned.sort_unstable();
    assert_eq!(assigned, vec![0, 1, 2, 3]);
}

#[test]
fn can_insert_pair_jointly_with_feasible_load_order() {
    let [pickup, delivery] = create_pair(1, 1, 2, 5);
    let problem = create_problem(
        vec![create_vehicle(1, 5)],
        vec![pickup, delivery, create_single(3, 3, 5)],
        4,
    );

    let (routes, unassigned) = RegretInsertion::new(1, SeedStrategy::None).build::<RawRoute>(&problem);

    assert!(unassigned.is_empty());
    // the single delivery must be served before the pickup fills the vehicle
    assert_eq!(routes[0].jobs, vec![2, 0, 1]);
    for rank in 0..=routes[0].jobs.len() {
        assert!(routes[0].load_at(rank).fits_within(&problem.vehicles[0].capacity));
    }
}

#[test]
fn can_assign_jobs_to_their_cheapest_routes() {
    let matrix = CostMatrix::new(
        4,
        vec![
            0, 9, 1, 5, //
            9, 0, 10, 5, //
            1, 10, 0, 7, //
            5, 5, 7, 0,
        ],
    )
    .unwrap();
    let mut far_vehicle = create_vehicle(2, 10);
    far_vehicle.start = Some(1);
    far_vehicle.end = Some(1);
    let problem = Problem::new(
        vec![create_vehicle(1, 10), far_vehicle],
        vec![create_single(1, 2, 1), create_single(2, 3, 1)],
        matrix,
    )
    .unwrap();

    let (routes, unassigned) = RegretInsertion::new(2, SeedStrategy::None).build::<RawRoute>(&problem);

    assert!(unassigned.is_empty());
    assert_eq!(routes[0].jobs, vec![0]);
    assert_eq!(routes[1].jobs, vec![1]);
}

#[test]
fn nearest_from_start_seeds_empty_routes() {
    let matrix = CostMatrix::new(
        4,
        vec![
            0, 9, 1, 5, //
            9, 0, 10, 5, //
            1, 10, 0, 7, //
            5, 5, 7, 0,
        ],
    )
    .unwrap();
    let mut far_vehicle = create_vehicle(2, 10);
    far_vehicle.start = Some(1);
    far_vehicle.end = Some(1);
    let problem = Problem::new(
        vec![create_vehicle(1, 10), far_vehicle],
        vec![create_single(1, 2, 1), create_single(2, 3, 1)],
        matrix,
    )
    .unwrap();

    let (routes, unassigned) =
        RegretInsertion::new(1, SeedStrategy::NearestFromStart).build::<RawRoute>(&problem);

    assert!(unassigned.is_empty());
    assert_eq!(routes[0].jobs, vec![0]);
    assert_eq!(routes[1].jobs, vec![1]);
}

#[test]
fn oversized_jobs_stay_unassigned() {
    let problem = create_problem(
        vec![create_vehicle(1, 10)],
        vec![create_single(1, 1, 20), create_single(2, 2, 2)],
        3,
    );

    let (routes, unassigned) = RegretInsertion::new(3, SeedStrategy::None).build::<RawRoute>(&problem);

    assert_eq!(unassigned, vec![0]);
    assert_eq!(routes[0].jobs, vec![1]);
}
