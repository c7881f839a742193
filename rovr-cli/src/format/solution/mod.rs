//! A json solution model and its writer.

use rovr_core::models::solution::{Solution, Step, StepType, VehicleRoute, ViolationType, Violations};
use rovr_core::utils::{SolverError, SolverResult};
use serde::Serialize;
use std::io::Write;

/// Violations of a step or a route.
#[derive(Clone, Debug, Serialize)]
pub struct ApiViolations {
    /// Total lead time.
    pub lead_time: u64,
    /// Total delay.
    pub delay: u64,
    /// Violation kinds.
    pub types: Vec<String>,
}

/// One entry of a route's execution trace.
#[derive(Clone, Debug, Serialize)]
pub struct ApiStep {
    /// A step type.
    #[serde(rename = "type")]
    pub step_type: String,
    /// An id of the served job or break.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// A location index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_index: Option<usize>,
    /// Arrival time.
    pub arrival: u64,
    /// Travel duration accumulated up to the step.
    pub duration: u64,
    /// Service start time.
    pub service: u64,
    /// Waiting time before service.
    pub waiting_time: u64,
    /// Vehicle load after the step.
    pub load: Vec<i64>,
    /// Step violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<ApiViolations>,
}

/// A reportable route of one vehicle.
#[derive(Clone, Debug, Serialize)]
pub struct ApiRoute {
    /// A vehicle id.
    pub vehicle: u64,
    /// Total travel cost.
    pub cost: i64,
    /// An execution trace.
    pub steps: Vec<ApiStep>,
    /// Total service duration.
    pub service: u64,
    /// Total travel duration.
    pub duration: u64,
    /// Total waiting time.
    pub waiting_time: u64,
    /// Sum of served job priorities.
    pub priority: u32,
    /// Total delivered amount.
    pub delivery: Vec<i64>,
    /// Total picked up amount.
    pub pickup: Vec<i64>,
    /// An encoded polyline of the route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    /// Route violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<ApiViolations>,
}

/// Solution aggregates.
#[derive(Clone, Debug, Serialize)]
pub struct ApiSummary {
    /// Total travel cost.
    pub cost: i64,
    /// Amount of routes used.
    pub routes: usize,
    /// Amount of unassigned jobs.
    pub unassigned: usize,
    /// Total service duration.
    pub service: u64,
    /// Total travel duration.
    pub duration: u64,
    /// Total waiting time.
    pub waiting_time: u64,
    /// Violation kinds present anywhere in the solution.
    pub violations: Vec<String>,
}

/// An unassigned job reference.
#[derive(Clone, Debug, Serialize)]
pub struct ApiUnassigned {
    /// A job id.
    pub id: u64,
}

/// The top level solution model.
#[derive(Clone, Debug, Serialize)]
pub struct ApiSolution {
    /// Zero on success.
    pub code: i32,
    /// Solution aggregates.
    pub summary: ApiSummary,
    /// Unassigned jobs.
    pub unassigned: Vec<ApiUnassigned>,
    /// Vehicle routes.
    pub routes: Vec<ApiRoute>,
}

/// The top level error model.
#[derive(Clone, Debug, Serialize)]
pub struct ApiError {
    /// A non-zero error code.
    pub code: i32,
    /// A human readable error description.
    pub error: String,
}

fn violation_name(violation: ViolationType) -> &'static str {
    match violation {
        ViolationType::LeadTime => "lead_time",
        ViolationType::Delay => "delay",
        ViolationType::Load => "load",
        ViolationType::Skills => "skills",
        ViolationType::Precedence => "precedence",
        ViolationType::MissingBreak => "missing_break",
    }
}

fn map_violations(violations: &Violations) -> Option<ApiViolations> {
    if violations.is_empty() {
        return None;
    }

    let mut types: Vec<String> =
        violations.types.iter().map(|violation| violation_name(*violation).to_string()).collect();
    types.sort_unstable();

    Some(ApiViolations { lead_time: violations.lead_time, delay: violations.delay, types })
}

fn map_step(step: &Step) -> ApiStep {
    let step_type = match step.step_type {
        StepType::Start => "start",
        StepType::Job => "job",
        StepType::Pickup => "pickup",
        StepType::Delivery => "delivery",
        StepType::Break => "break",
        StepType::End => "end",
    };

    ApiStep {
        step_type: step_type.to_string(),
        id: step.id,
        location_index: step.location,
        arrival: step.arrival,
        duration: step.duration,
        service: step.service_start,
        waiting_time: step.waiting_time,
        load: step.load.components().to_vec(),
        violations: map_violations(&step.violations),
    }
}

fn map_route(route: &VehicleRoute) -> ApiRoute {
    ApiRoute {
        vehicle: route.vehicle_id,
        cost: route.cost,
        steps: route.steps.iter().map(map_step).collect(),
        service: route.service,
        duration: route.duration,
        waiting_time: route.waiting_time,
        priority: route.priority,
        delivery: route.delivery.components().to_vec(),
        pickup: route.pickup.components().to_vec(),
        geometry: None,
        violations: map_violations(&route.violations),
    }
}

/// Maps a core solution to the api model.
pub fn create_solution(solution: &Solution) -> ApiSolution {
    let mut violations: Vec<String> =
        solution.summary.violations.iter().map(|violation| violation_name(*violation).to_string()).collect();
    violations.sort_unstable();

    ApiSolution {
        code: 0,
        summary: ApiSummary {
            cost: solution.summary.cost,
            routes: solution.summary.routes,
            unassigned: solution.summary.unassigned,
            service: solution.summary.service,
            duration: solution.summary.duration,
            waiting_time: solution.summary.waiting_time,
            violations,
        },
        unassigned: solution.unassigned.iter().map(|&id| ApiUnassigned { id }).collect(),
        routes: solution.routes.iter().map(map_route).collect(),
    }
}

/// Serializes a solution as json into given writer.
pub fn write_solution<W: Write>(writer: W, solution: &Solution) -> SolverResult<()> {
    serde_json::to_writer_pretty(writer, &create_solution(solution))
        .map_err(|error| SolverError::internal(format!("cannot serialize solution: {error}")))
}

/// Serializes an error document as json into given writer.
pub fn write_error<W: Write>(writer: W, code: i32, error: &str) -> SolverResult<()> {
    serde_json::to_writer_pretty(writer, &ApiError { code, error: error.to_string() })
        .map_err(|error| SolverError::internal(format!("cannot serialize error: {error}")))
}
