//! Shared builders for unit tests.

use crate::models::common::{Amount, TimeWindow};
use crate::models::matrix::CostMatrix;
use crate::models::problem::{Break, Job, JobType, Problem, Vehicle};

/// Creates a square matrix with given off-diagonal value and zero diagonal.
pub fn create_matrix(size: usize, value: u32) -> CostMatrix {
    let data = (0..size * size).map(|i| if i / size == i % size { 0 } else { value }).collect();

    CostMatrix::new(size, data).unwrap()
}

/// Creates a vehicle with start and end at index 0 and a single capacity dimension.
pub fn create_vehicle(id: u64, capacity: i64) -> Vehicle {
    Vehicle {
        id,
        start: Some(0),
        end: Some(0),
        capacity: Amount::new(vec![capacity]),
        skills: Default::default(),
        time_window: TimeWindow::max(),
        breaks: Vec::default(),
    }
}

/// Creates a single job with given delivery amount and no time constraints.
pub fn create_single(id: u64, location: usize, delivery: i64) -> Job {
    Job {
        id,
        location,
        job_type: JobType::Single,
        service: 0,
        pickup: Amount::new(vec![0]),
        delivery: Amount::new(vec![delivery]),
        skills: Default::default(),
        priority: 0,
        time_windows: vec![TimeWindow::max()],
    }
}

/// Creates a pickup-delivery pair carrying given amount.
pub fn create_pair(pickup_id: u64, pickup_location: usize, delivery_location: usize, amount: i64) -> [Job; 2] {
    let pickup = Job {
        id: pickup_id,
        location: pickup_location,
        job_type: JobType::Pickup,
        service: 0,
        pickup: Amount::new(vec![amount]),
        delivery: Amount::new(vec![0]),
        skills: Default::default(),
        priority: 0,
        time_windows: vec![TimeWindow::max()],
    };
    let delivery = Job {
        id: pickup_id + 1,
        location: delivery_location,
        job_type: JobType::Delivery,
        service: 0,
        pickup: Amount::new(vec![0]),
        delivery: Amount::new(vec![amount]),
        skills: Default::default(),
        priority: 0,
        time_windows: vec![TimeWindow::max()],
    };

    [pickup, delivery]
}

/// Creates a break with one time window.
pub fn create_break(id: u64, start: u64, end: u64, service: u64) -> Break {
    Break { id, time_windows: vec![TimeWindow::new(start, end)], service }
}

/// Creates a problem over a uniform matrix of given size.
pub fn create_problem(vehicles: Vec<Vehicle>, jobs: Vec<Job>, matrix_size: usize) -> Problem {
    Problem::new(vehicles, jobs, create_matrix(matrix_size, 1)).unwrap()
}

/// Creates two vehicles and three singles over a fixed asymmetric matrix.
pub fn create_asymmetric_problem() -> Problem {
    let matrix = CostMatrix::new(
        4,
        vec![
            0, 2, 9, 10, //
            1, 0, 6, 4, //
            15, 7, 0, 8, //
            6, 3, 12, 0,
        ],
    )
    .unwrap();

    Problem::new(
        vec![create_vehicle(1, 10), create_vehicle(2, 10)],
        vec![create_single(1, 1, 1), create_single(2, 2, 1), create_single(3, 3, 1)],
        matrix,
    )
    .unwrap()
}
