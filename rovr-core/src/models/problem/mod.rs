//! Problem definition models: vehicles, jobs, breaks and an immutable problem snapshot.

#[cfg(test)]
#[path = "../../../tests/unit/models/problem/problem_test.rs"]
mod problem_test;

use crate::models::common::{Amount, Duration, Location, Priority, Skills, TimeWindow};
use crate::models::matrix::CostMatrix;
use crate::utils::{SolverError, SolverResult};

/// A planned rest period which belongs to exactly one vehicle.
#[derive(Clone, Debug)]
pub struct Break {
    /// A break id.
    pub id: u64,
    /// Ordered list of time windows when the break can start.
    pub time_windows: Vec<TimeWindow>,
    /// A break duration.
    pub service: Duration,
}

/// A vehicle with its operating constraints.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// A vehicle id.
    pub id: u64,
    /// An optional start location.
    pub start: Option<Location>,
    /// An optional end location.
    pub end: Option<Location>,
    /// A multi-dimensional capacity.
    pub capacity: Amount,
    /// Skill tags provided by the vehicle.
    pub skills: Skills,
    /// A single working time window.
    pub time_window: TimeWindow,
    /// Ordered breaks to be scheduled within the route.
    pub breaks: Vec<Break>,
}

impl Vehicle {
    /// Checks whether vehicle has a start location.
    pub fn has_start(&self) -> bool {
        self.start.is_some()
    }

    /// Checks whether vehicle has an end location.
    pub fn has_end(&self) -> bool {
        self.end.is_some()
    }
}

/// Specifies the role of a job within the plan.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobType {
    /// An independent visit.
    Single,
    /// The first half of a pickup-delivery pair.
    Pickup,
    /// The second half of a pickup-delivery pair.
    Delivery,
}

/// A single service visit.
#[derive(Clone, Debug)]
pub struct Job {
    /// A job id.
    pub id: u64,
    /// A visit location.
    pub location: Location,
    /// A job role.
    pub job_type: JobType,
    /// A service duration at the location.
    pub service: Duration,
    /// An amount picked up at the location.
    pub pickup: Amount,
    /// An amount delivered to the location.
    pub delivery: Amount,
    /// Skill tags required from the serving vehicle.
    pub skills: Skills,
    /// A job priority.
    pub priority: Priority,
    /// Ordered non-overlapping time windows.
    pub time_windows: Vec<TimeWindow>,
}

/// An immutable problem snapshot with jobs, vehicles and a travel cost matrix.
#[derive(Debug)]
pub struct Problem {
    /// Indexed jobs.
    pub jobs: Vec<Job>,
    /// Indexed vehicles.
    pub vehicles: Vec<Vehicle>,
    /// A travel cost matrix over all job and depot locations.
    pub matrix: CostMatrix,
    amount_dimension: usize,
}

impl Problem {
    /// Creates a new instance of `Problem` validating feasibility by construction.
    pub fn new(vehicles: Vec<Vehicle>, jobs: Vec<Job>, matrix: CostMatrix) -> SolverResult<Self> {
        if vehicles.is_empty() {
            return Err(SolverError::input("at least one vehicle is required"));
        }

        let amount_dimension = vehicles
            .iter()
            .map(|vehicle| vehicle.capacity.dimension())
            .chain(jobs.iter().flat_map(|job| [job.pickup.dimension(), job.delivery.dimension()]))
            .max()
            .unwrap_or(0);

        let mut vehicles = vehicles;
        let mut jobs = jobs;
        vehicles.iter_mut().for_each(|vehicle| pad_amount(&mut vehicle.capacity, amount_dimension));
        jobs.iter_mut().for_each(|job| {
            pad_amount(&mut job.pickup, amount_dimension);
            pad_amount(&mut job.delivery, amount_dimension);
        });

        let problem = Self { jobs, vehicles, matrix, amount_dimension };
        problem.validate()?;

        Ok(problem)
    }

    fn validate(&self) -> SolverResult<()> {
        for vehicle in self.vehicles.iter() {
            for location in vehicle.start.iter().chain(vehicle.end.iter()) {
                if *location >= self.matrix.size() {
                    return Err(SolverError::input(format!(
                        "vehicle {} location index {location} exceeds matrix size {}",
                        vehicle.id,
                        self.matrix.size()
                    )));
                }
            }
            check_time_windows(&[vehicle.time_window], format!("vehicle {}", vehicle.id))?;
            for brk in vehicle.breaks.iter() {
                check_time_windows(&brk.time_windows, format!("break {} of vehicle {}", brk.id, vehicle.id))?;
            }
        }

        for (rank, job) in self.jobs.iter().enumerate() {
            if job.location >= self.matrix.size() {
                return Err(SolverError::input(format!(
                    "job {} location index {} exceeds matrix size {}",
                    job.id,
                    job.location,
                    self.matrix.size()
                )));
            }
            check_time_windows(&job.time_windows, format!("job {}", job.id))?;

            match job.job_type {
                JobType::Pickup => {
                    let delivery = self.jobs.get(rank + 1).filter(|next| next.job_type == JobType::Delivery);
                    match delivery {
                        Some(delivery) if delivery.delivery == job.pickup => {}
                        Some(delivery) => {
                            return Err(SolverError::input(format!(
                                "shipment amount mismatch between pickup {} and delivery {}",
                                job.id, delivery.id
                            )))
                        }
                        None => {
                            return Err(SolverError::input(format!(
                                "pickup {} is not directly followed by its delivery",
                                job.id
                            )))
                        }
                    }
                }
                JobType::Delivery => {
                    let valid = rank > 0 && self.jobs[rank - 1].job_type == JobType::Pickup;
                    if !valid {
                        return Err(SolverError::input(format!(
                            "delivery {} is not directly preceded by its pickup",
                            job.id
                        )));
                    }
                }
                JobType::Single => {}
            }

            let serviceable = (0..self.vehicles.len()).any(|vehicle| self.vehicle_ok_with_job(vehicle, rank));
            if !serviceable {
                return Err(SolverError::input(format!(
                    "skills required by job {} are not provided by any vehicle",
                    job.id
                )));
            }
        }

        Ok(())
    }

    /// Checks whether given vehicle can serve given job (skills subset).
    pub fn vehicle_ok_with_job(&self, vehicle: usize, job: usize) -> bool {
        self.jobs[job].skills.is_subset(&self.vehicles[vehicle].skills)
    }

    /// Checks whether given vehicle can serve both jobs of a range (used for pairs).
    pub fn vehicle_ok_with_jobs_range(&self, vehicle: usize, first: usize, last: usize) -> bool {
        (first..=last).all(|job| self.vehicle_ok_with_job(vehicle, job))
    }

    /// Returns an origin amount of the capacity's dimensionality.
    pub fn zero_amount(&self) -> Amount {
        Amount::zero(self.amount_dimension)
    }

    /// Returns the rank of the paired job for pickup/delivery jobs.
    pub fn paired_rank(&self, job: usize) -> Option<usize> {
        match self.jobs[job].job_type {
            JobType::Single => None,
            JobType::Pickup => Some(job + 1),
            JobType::Delivery => Some(job - 1),
        }
    }

    /// Checks whether the problem carries any time related constraint.
    pub fn has_time_constraints(&self) -> bool {
        self.vehicles.iter().any(|vehicle| !vehicle.time_window.is_default() || !vehicle.breaks.is_empty())
            || self.jobs.iter().any(|job| job.time_windows.iter().any(|tw| !tw.is_default()))
    }
}

fn pad_amount(amount: &mut Amount, dimension: usize) {
    if amount.dimension() < dimension {
        let mut components = amount.components().to_vec();
        components.resize(dimension, 0);
        *amount = Amount::new(components);
    }
}

fn check_time_windows(time_windows: &[TimeWindow], owner: String) -> SolverResult<()> {
    if time_windows.is_empty() {
        return Err(SolverError::input(format!("{owner} has an empty time window list")));
    }

    for window in time_windows.windows(2) {
        if window[1].start <= window[0].end {
            return Err(SolverError::input(format!("{owner} has unordered or overlapping time windows")));
        }
    }

    if time_windows.iter().any(|tw| tw.end < tw.start) {
        return Err(SolverError::input(format!("{owner} has a time window which ends before it starts")));
    }

    Ok(())
}
