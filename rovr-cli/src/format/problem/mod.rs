//! A json problem definition and its reader into the core model.


use crate::format::TravelMatrixProvider;
use rovr_core::models::common::{Amount, Skills, TimeWindow};
use rovr_core::models::matrix::CostMatrix;
use rovr_core::models::problem::{Break, Job, JobType, Problem, Vehicle};
use rovr_core::utils::{SolverError, SolverResult};
use serde::Deserialize;
use std::io::Read;

/// A vehicle break model.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiBreak {
    /// A break id.
    pub id: u64,
    /// A list of time windows.
    #[serde(default)]
    pub time_windows: Option<Vec<[u64; 2]>>,
    /// A break duration.
    #[serde(default)]
    pub service: Option<u64>,
}

/// A vehicle model.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiVehicle {
    /// A vehicle id.
    pub id: u64,
    /// A start coordinate pair.
    #[serde(default)]
    pub start: Option<[f64; 2]>,
    /// An end coordinate pair.
    #[serde(default)]
    pub end: Option<[f64; 2]>,
    /// A start index into the custom matrix, required when a matrix is supplied.
    #[serde(default)]
    pub start_index: Option<usize>,
    /// An end index into the custom matrix.
    #[serde(default)]
    pub end_index: Option<usize>,
    /// A multi-dimensional capacity.
    #[serde(default)]
    pub capacity: Option<Vec<i64>>,
    /// Skill tags provided by the vehicle.
    #[serde(default)]
    pub skills: Option<Vec<u32>>,
    /// A working time window.
    #[serde(default)]
    pub time_window: Option<[u64; 2]>,
    /// Vehicle breaks.
    #[serde(default)]
    pub breaks: Option<Vec<ApiBreak>>,
}

/// A job model.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiJob {
    /// A job id.
    pub id: u64,
    /// A location coordinate pair.
    #[serde(default)]
    pub location: Option<[f64; 2]>,
    /// A location index into the custom matrix.
    #[serde(default)]
    pub location_index: Option<usize>,
    /// A service duration.
    #[serde(default)]
    pub service: Option<u64>,
    /// A delivered amount.
    #[serde(default)]
    pub delivery: Option<Vec<i64>>,
    /// A picked up amount.
    #[serde(default)]
    pub pickup: Option<Vec<i64>>,
    /// Skill tags required from the serving vehicle.
    #[serde(default)]
    pub skills: Option<Vec<u32>>,
    /// A job priority.
    #[serde(default)]
    pub priority: Option<u32>,
    /// Ordered time windows.
    #[serde(default)]
    pub time_windows: Option<Vec<[u64; 2]>>,
}

/// One half of a shipment.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiShipmentTask {
    /// A task id.
    pub id: u64,
    /// A location coordinate pair.
    #[serde(default)]
    pub location: Option<[f64; 2]>,
    /// A location index into the custom matrix.
    #[serde(default)]
    pub location_index: Option<usize>,
    /// A service duration.
    #[serde(default)]
    pub service: Option<u64>,
    /// Ordered time windows.
    #[serde(default)]
    pub time_windows: Option<Vec<[u64; 2]>>,
}

/// A pickup-delivery pair model.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiShipment {
    /// A pickup task.
    pub pickup: ApiShipmentTask,
    /// A delivery task.
    pub delivery: ApiShipmentTask,
    /// A shipped amount.
    #[serde(default)]
    pub amount: Option<Vec<i64>>,
    /// Skill tags required from the serving vehicle.
    #[serde(default)]
    pub skills: Option<Vec<u32>>,
    /// A shipment priority.
    #[serde(default)]
    pub priority: Option<u32>,
}

/// Solver behavior switches.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiOptions {
    /// Requests full route geometry.
    #[serde(default, rename = "g")]
    pub geometry: bool,
}

/// A problem definition model.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiProblem {
    /// A non-empty list of vehicles.
    pub vehicles: Vec<ApiVehicle>,
    /// A list of jobs.
    pub jobs: Vec<ApiJob>,
    /// A list of pickup-delivery pairs.
    #[serde(default)]
    pub shipments: Option<Vec<ApiShipment>>,
    /// A custom square travel cost matrix.
    #[serde(default)]
    pub matrix: Option<Vec<Vec<u32>>>,
    /// Solver behavior switches.
    #[serde(default)]
    pub options: Option<ApiOptions>,
}

/// Deserializes a problem definition from a json stream.
pub fn deserialize_problem<R: Read>(reader: R) -> SolverResult<ApiProblem> {
    let problem: ApiProblem =
        serde_json::from_reader(reader).map_err(|error| SolverError::input(format!("malformed input: {error}")))?;

    if problem.vehicles.is_empty() {
        return Err(SolverError::input("at least one vehicle is required"));
    }

    Ok(problem)
}

/// Resolved matrix indices for every entity of the problem.
struct LocationResolution {
    matrix: CostMatrix,
    vehicles: Vec<(Option<usize>, Option<usize>)>,
    jobs: Vec<usize>,
    shipments: Vec<(usize, usize)>,
}

/// Builds a core problem from the api model. Without a custom matrix a travel matrix
/// provider is required; this build links none by default.
pub fn read_problem(
    api_problem: ApiProblem,
    provider: Option<&dyn TravelMatrixProvider>,
) -> SolverResult<Problem> {
    let resolution = resolve_locations(&api_problem, provider)?;

    let vehicles = api_problem
        .vehicles
        .iter()
        .zip(resolution.vehicles.iter())
        .map(|(vehicle, &(start, end))| read_vehicle(vehicle, start, end))
        .collect::<Vec<_>>();

    let mut jobs = api_problem
        .jobs
        .iter()
        .zip(resolution.jobs.iter())
        .map(|(job, &location)| read_job(job, location))
        .collect::<Vec<_>>();

    for (shipment, &(pickup_location, delivery_location)) in
        api_problem.shipments.iter().flatten().zip(resolution.shipments.iter())
    {
        let amount = Amount::new(shipment.amount.clone().unwrap_or_default());
        let skills: Skills = shipment.skills.iter().flatten().copied().collect();
        let priority = shipment.priority.unwrap_or(0);

        jobs.push(Job {
            id: shipment.pickup.id,
            location: pickup_location,
            job_type: JobType::Pickup,
            service: shipment.pickup.service.unwrap_or(0),
            pickup: amount.clone(),
            delivery: Amount::new(Vec::default()),
            skills: skills.clone(),
            priority,
            time_windows: read_time_windows(&shipment.pickup.time_windows),
        });
        jobs.push(Job {
            id: shipment.delivery.id,
            location: delivery_location,
            job_type: JobType::Delivery,
            service: shipment.delivery.service.unwrap_or(0),
            pickup: Amount::new(Vec::default()),
            delivery: amount,
            skills,
            priority,
            time_windows: read_time_windows(&shipment.delivery.time_windows),
        });
    }

    Problem::new(vehicles, jobs, resolution.matrix)
}

/// With a custom matrix entities must carry explicit indices; otherwise indices are
/// assigned in declaration order and the matrix comes from the routing backend.
fn resolve_locations(
    api_problem: &ApiProblem,
    provider: Option<&dyn TravelMatrixProvider>,
) -> SolverResult<LocationResolution> {
    if let Some(rows) = &api_problem.matrix {
        let matrix = CostMatrix::from_rows(rows.clone())?;

        let vehicles = api_problem
            .vehicles
            .iter()
            .map(|vehicle| {
                if vehicle.start.is_some() && vehicle.start_index.is_none() {
                    return Err(SolverError::input(format!(
                        "vehicle {} requires start_index when a custom matrix is used",
                        vehicle.id
                    )));
                }
                if vehicle.end.is_some() && vehicle.end_index.is_none() {
                    return Err(SolverError::input(format!(
                        "vehicle {} requires end_index when a custom matrix is used",
                        vehicle.id
                    )));
                }
                Ok((vehicle.start_index, vehicle.end_index))
            })
            .collect::<SolverResult<Vec<_>>>()?;

        let explicit_index = |index: Option<usize>, id: u64| {
            index.ok_or_else(|| {
                SolverError::input(format!("job {id} requires location_index when a custom matrix is used"))
            })
        };
        let jobs = api_problem
            .jobs
            .iter()
            .map(|job| explicit_index(job.location_index, job.id))
            .collect::<SolverResult<Vec<_>>>()?;
        let shipments = api_problem
            .shipments
            .iter()
            .flatten()
            .map(|shipment| {
                Ok((
                    explicit_index(shipment.pickup.location_index, shipment.pickup.id)?,
                    explicit_index(shipment.delivery.location_index, shipment.delivery.id)?,
                ))
            })
            .collect::<SolverResult<Vec<_>>>()?;

        return Ok(LocationResolution { matrix, vehicles, jobs, shipments });
    }

    let provider = provider.ok_or_else(|| {
        SolverError::routing("no custom matrix supplied and no routing backend is available")
    })?;

    let mut coordinates: Vec<[f64; 2]> = Vec::new();
    let mut next_index = |coordinate: Option<[f64; 2]>| {
        coordinate.map(|coordinate| {
            coordinates.push(coordinate);
            coordinates.len() - 1
        })
    };

    let vehicles: Vec<_> = api_problem
        .vehicles
        .iter()
        .map(|vehicle| (next_index(vehicle.start), next_index(vehicle.end)))
        .collect();

    let required = |coordinate: Option<[f64; 2]>, id: u64| {
        coordinate.ok_or_else(|| SolverError::input(format!("job {id} has no location")))
    };
    let mut jobs = Vec::with_capacity(api_problem.jobs.len());
    for job in api_problem.jobs.iter() {
        let coordinate = required(job.location, job.id)?;
        coordinates.push(coordinate);
        jobs.push(coordinates.len() - 1);
    }
    let mut shipments = Vec::new();
    for shipment in api_problem.shipments.iter().flatten() {
        let pickup = required(shipment.pickup.location, shipment.pickup.id)?;
        coordinates.push(pickup);
        let pickup_index = coordinates.len() - 1;
        let delivery = required(shipment.delivery.location, shipment.delivery.id)?;
        coordinates.push(delivery);
        shipments.push((pickup_index, coordinates.len() - 1));
    }

    let matrix = provider.travel_matrix(&coordinates)?;

    Ok(LocationResolution { matrix, vehicles, jobs, shipments })
}

fn read_vehicle(vehicle: &ApiVehicle, start: Option<usize>, end: Option<usize>) -> Vehicle {
    let breaks = vehicle
        .breaks
        .iter()
        .flatten()
        .map(|brk| Break {
            id: brk.id,
            time_windows: read_time_windows(&brk.time_windows),
            service: brk.service.unwrap_or(0),
        })
        .collect();

    Vehicle {
        id: vehicle.id,
        start,
        end,
        capacity: Amount::new(vehicle.capacity.clone().unwrap_or_default()),
        skills: vehicle.skills.iter().flatten().copied().collect(),
        time_window: vehicle
            .time_window
            .map_or_else(TimeWindow::max, |window| TimeWindow::new(window[0], window[1])),
        breaks,
    }
}

fn read_job(job: &ApiJob, location: usize) -> Job {
    Job {
        id: job.id,
        location,
        job_type: JobType::Single,
        service: job.service.unwrap_or(0),
        pickup: Amount::new(job.pickup.clone().unwrap_or_default()),
        delivery: Amount::new(job.delivery.clone().unwrap_or_default()),
        skills: job.skills.iter().flatten().copied().collect(),
        priority: job.priority.unwrap_or(0),
        time_windows: read_time_windows(&job.time_windows),
    }
}

fn read_time_windows(time_windows: &Option<Vec<[u64; 2]>>) -> Vec<TimeWindow> {
    match time_windows {
        Some(windows) if !windows.is_empty() => {
            windows.iter().map(|window| TimeWindow::new(window[0], window[1])).collect()
        }
        _ => vec![TimeWindow::max()],
    }
}
