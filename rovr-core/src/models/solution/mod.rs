//! Solution models: working route representations and the reportable solution.

mod route;
pub use self::route::RawRoute;

mod tw_route;
pub use self::tw_route::{PlannedBreak, TwRoute};

use crate::models::common::{Amount, Cost, Duration, Location, Priority, Timestamp};
use crate::models::problem::Problem;
use hashbrown::HashSet;

/// An abstraction over working route representations: raw job sequences for capacity
/// only problems and time window aware sequences. Operators are written once against
/// this trait; schedule bookkeeping differs per implementation.
pub trait RouteMut: Clone + Send + Sync + 'static {
    /// Creates an empty route for given vehicle.
    fn new_route(vehicle: usize, problem: &Problem) -> Self;

    /// Returns the underlying raw sequence with its load caches.
    fn raw(&self) -> &RawRoute;

    /// Checks whether replacing jobs in `first..last` with given ranks keeps the route
    /// schedulable. Capacity and skills are checked separately by the caller.
    fn is_valid_replacement(&self, problem: &Problem, first: usize, last: usize, ranks: &[usize]) -> bool;

    /// Replaces jobs in `first..last` with given ranks and refreshes caches.
    fn replace(&mut self, problem: &Problem, first: usize, last: usize, ranks: &[usize]);

    /// Returns breaks planned in the gap before step at given position; only time
    /// window aware routes schedule breaks.
    fn breaks_before(&self, _rank: usize) -> &[PlannedBreak] {
        &[]
    }
}

impl RouteMut for RawRoute {
    fn new_route(vehicle: usize, problem: &Problem) -> Self {
        RawRoute::new(vehicle, problem)
    }

    fn raw(&self) -> &RawRoute {
        self
    }

    fn is_valid_replacement(&self, _: &Problem, _: usize, _: usize, _: &[usize]) -> bool {
        true
    }

    fn replace(&mut self, problem: &Problem, first: usize, last: usize, ranks: &[usize]) {
        RawRoute::replace(self, problem, first, last, ranks)
    }
}

impl RouteMut for TwRoute {
    fn new_route(vehicle: usize, problem: &Problem) -> Self {
        TwRoute::new(vehicle, problem)
    }

    fn raw(&self) -> &RawRoute {
        &self.route
    }

    fn is_valid_replacement(&self, problem: &Problem, first: usize, last: usize, ranks: &[usize]) -> bool {
        TwRoute::is_valid_replacement(self, problem, first, last, ranks)
    }

    fn replace(&mut self, problem: &Problem, first: usize, last: usize, ranks: &[usize]) {
        TwRoute::replace(self, problem, first, last, ranks)
    }

    fn breaks_before(&self, rank: usize) -> &[PlannedBreak] {
        TwRoute::breaks_before(self, rank)
    }
}

/// Specifies the role of an entry in a route's execution trace.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepType {
    /// Departure from the vehicle start.
    Start,
    /// A single job visit.
    Job,
    /// A pickup visit of a pair.
    Pickup,
    /// A delivery visit of a pair.
    Delivery,
    /// A vehicle break.
    Break,
    /// Arrival at the vehicle end.
    End,
}

/// Specifies a quantified breach of a constraint reported instead of rejecting.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ViolationType {
    /// Service started before the time window opened.
    LeadTime,
    /// Service started after the time window closed.
    Delay,
    /// Load exceeds vehicle capacity.
    Load,
    /// Job skills are not provided by the vehicle.
    Skills,
    /// Pickup/delivery order is broken.
    Precedence,
    /// A vehicle break is absent from the route.
    MissingBreak,
}

/// Quantified violations of a step or a route.
#[derive(Clone, Debug, Default)]
pub struct Violations {
    /// Total time by which services started before their windows opened.
    pub lead_time: Duration,
    /// Total time by which services started after their windows closed.
    pub delay: Duration,
    /// Kinds of violations present.
    pub types: HashSet<ViolationType>,
}

impl Violations {
    /// Checks whether nothing is violated.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// One entry in a route's execution trace.
#[derive(Clone, Debug)]
pub struct Step {
    /// A step role.
    pub step_type: StepType,
    /// An id of the served job or break, if any.
    pub id: Option<u64>,
    /// A served location, if any.
    pub location: Option<Location>,
    /// Arrival time at the step.
    pub arrival: Timestamp,
    /// Travel duration accumulated up to the step.
    pub duration: Duration,
    /// Service start time.
    pub service_start: Timestamp,
    /// Waiting time before service.
    pub waiting_time: Duration,
    /// Vehicle load after the step.
    pub load: Amount,
    /// Violations attributed to the step.
    pub violations: Violations,
}

/// A reportable route of one vehicle.
#[derive(Clone, Debug)]
pub struct VehicleRoute {
    /// A vehicle id.
    pub vehicle_id: u64,
    /// An execution trace.
    pub steps: Vec<Step>,
    /// Total travel cost.
    pub cost: Cost,
    /// Total service duration.
    pub service: Duration,
    /// Total travel duration.
    pub duration: Duration,
    /// Total waiting time.
    pub waiting_time: Duration,
    /// Sum of served job priorities.
    pub priority: Priority,
    /// Total delivered amount.
    pub delivery: Amount,
    /// Total picked up amount.
    pub pickup: Amount,
    /// Violations aggregated over the route.
    pub violations: Violations,
}

/// Aggregates over the whole solution.
#[derive(Clone, Debug, Default)]
pub struct Summary {
    /// Total travel cost.
    pub cost: Cost,
    /// Amount of routes used.
    pub routes: usize,
    /// Amount of unassigned jobs.
    pub unassigned: usize,
    /// Total service duration.
    pub service: Duration,
    /// Total travel duration.
    pub duration: Duration,
    /// Total waiting time.
    pub waiting_time: Duration,
    /// Violation kinds present anywhere in the solution.
    pub violations: HashSet<ViolationType>,
}

/// A final solution assembled by the solver facade.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Solution aggregates.
    pub summary: Summary,
    /// Non-empty vehicle routes.
    pub routes: Vec<VehicleRoute>,
    /// Ids of jobs left unassigned.
    pub unassigned: Vec<u64>,
}
