//! Schedules a fixed step sequence for one vehicle and quantifies its violations.
//!
//! The earliest start times are chosen by a mixed integer program solved in two rounds
//! over the same constraint system: the first round minimizes time window violations
//! and makespan, the second pins both and pushes every service start as early as
//! possible. Violations (lead time, delay, load, skills, precedence, missing break)
//! are reported instead of rejecting the route; only a route which cannot be scheduled
//! at all is an input error.

#[cfg(test)]
#[path = "../../../tests/unit/algorithms/validation/validation_test.rs"]
mod validation_test;

use crate::models::common::{Cost, Duration, Location, TimeWindow, Timestamp};
use crate::models::problem::{JobType, Problem};
use crate::models::solution::{Step, StepType, VehicleRoute, ViolationType, Violations};
use crate::utils::{SolverError, SolverResult};
use good_lp::{default_solver, variable, variables, Expression, Solution, SolverModel, Variable};
use hashbrown::{HashMap, HashSet};
use std::sync::Mutex;

/// The MIP backend is treated as a process-wide resource: calls are serialized and the
/// model is owned by the call frame, so it is released on every exit path.
static MIP_LOCK: Mutex<()> = Mutex::new(());

/// Specifies the role of a validation input step.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationStepType {
    /// Route start.
    Start,
    /// A job visit, ranked within problem jobs.
    Job,
    /// A vehicle break, ranked within the vehicle's break list.
    Break,
    /// Route end.
    End,
}

/// A user pinned service time for a step.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForcedService {
    /// Service must start exactly at this time.
    pub at: Option<Timestamp>,
    /// Service must not start before this time.
    pub after: Option<Timestamp>,
    /// Service must not start after this time.
    pub before: Option<Timestamp>,
}

/// One entry of the fixed step sequence handed to the validator.
#[derive(Clone, Copy, Debug)]
pub struct ValidationStep {
    /// A step role.
    pub step_type: ValidationStepType,
    /// A job rank or break rank, unused for start and end.
    pub rank: usize,
    /// An optional service time pinning.
    pub forced_service: ForcedService,
}

impl ValidationStep {
    /// Creates a start step.
    pub fn start() -> Self {
        Self { step_type: ValidationStepType::Start, rank: 0, forced_service: ForcedService::default() }
    }

    /// Creates a job step.
    pub fn job(rank: usize) -> Self {
        Self { step_type: ValidationStepType::Job, rank, forced_service: ForcedService::default() }
    }

    /// Creates a break step.
    pub fn vehicle_break(rank: usize) -> Self {
        Self { step_type: ValidationStepType::Break, rank, forced_service: ForcedService::default() }
    }

    /// Creates an end step.
    pub fn end() -> Self {
        Self { step_type: ValidationStepType::End, rank: 0, forced_service: ForcedService::default() }
    }
}

struct MipTask {
    time_windows: Vec<TimeWindow>,
    service: Duration,
    first_relevant_tw: usize,
}

struct RoundOutput {
    t_values: Vec<Timestamp>,
    y_values: Vec<Duration>,
    delta_values: Vec<Duration>,
    tw_ranks: Vec<usize>,
}

/// Computes earliest service start times for a fixed step sequence and quantifies all
/// violations. Returns an input error naming the vehicle when no schedule is realizable.
pub fn choose_eta(problem: &Problem, vehicle_rank: usize, steps: &[ValidationStep]) -> SolverResult<VehicleRoute> {
    let vehicle = &problem.vehicles[vehicle_rank];
    if steps.len() < 3 {
        return Err(SolverError::internal("validation requires start, end and at least one task"));
    }
    let n = steps.len() - 2;

    let infeasible =
        || SolverError::input(format!("infeasible route for vehicle {}", vehicle.id));
    let overflow = infeasible;

    // Per non-break task: the amount of directly following breaks and the travel to the
    // next non-break task.
    let mut break_counts: Vec<usize> = Vec::new();
    let mut durations: Vec<Duration> = Vec::new();
    let mut horizon_start = Timestamp::MAX;
    let mut horizon_end: Timestamp = 0;
    if !vehicle.time_window.is_default() {
        horizon_start = horizon_start.min(vehicle.time_window.start);
        horizon_end = horizon_end.max(vehicle.time_window.end);
    }

    let mut last_location: Option<Location> = None;
    let mut service_sum: Duration = 0;
    let mut duration_sum: Duration = 0;

    for step in steps {
        match step.step_type {
            ValidationStepType::Start => {
                last_location = vehicle.start;
                break_counts.push(0);
            }
            ValidationStepType::Job => {
                let job = &problem.jobs[step.rank];
                break_counts.push(0);

                service_sum = service_sum.checked_add(job.service).ok_or_else(overflow)?;
                for tw in job.time_windows.iter().filter(|tw| !tw.is_default()) {
                    horizon_start = horizon_start.min(tw.start);
                    horizon_end = horizon_end.max(tw.end);
                }

                let travel = last_location.map_or(0, |location| problem.matrix.duration(location, job.location));
                durations.push(travel);
                duration_sum = duration_sum.checked_add(travel).ok_or_else(overflow)?;
                last_location = Some(job.location);
            }
            ValidationStepType::Break => {
                let brk = &vehicle.breaks[step.rank];
                *break_counts.last_mut().ok_or_else(|| SolverError::internal("break before start step"))? += 1;

                service_sum = service_sum.checked_add(brk.service).ok_or_else(overflow)?;
                for tw in brk.time_windows.iter().filter(|tw| !tw.is_default()) {
                    horizon_start = horizon_start.min(tw.start);
                    horizon_end = horizon_end.max(tw.end);
                }
            }
            ValidationStepType::End => {
                let travel = match (last_location, vehicle.end) {
                    (Some(from), Some(to)) => problem.matrix.duration(from, to),
                    _ => 0,
                };
                durations.push(travel);
                duration_sum = duration_sum.checked_add(travel).ok_or_else(overflow)?;
            }
        }
    }

    // Refine the planning horizon so that lead time at startup stays expressible.
    let mut makespan_estimate = duration_sum.checked_add(service_sum).ok_or_else(overflow)?;
    if horizon_start == Timestamp::MAX {
        horizon_start = 0;
        horizon_end = makespan_estimate.checked_mul(10).ok_or_else(overflow)?;
    } else {
        if makespan_estimate == 0 {
            makespan_estimate = horizon_end - horizon_start;
        }
        horizon_start = horizon_start.saturating_sub(makespan_estimate);
        horizon_end = horizon_end.checked_add(makespan_estimate).ok_or_else(overflow)?;
    }

    // Bounds for service start variables, tightened by forward propagation, plus the
    // first time window rank still worth considering per task.
    let mut t_lb: Vec<Timestamp> = Vec::with_capacity(steps.len());
    let mut t_ub: Vec<Timestamp> = Vec::with_capacity(steps.len());
    let mut tasks: Vec<MipTask> = Vec::with_capacity(n);
    let mut previous_lb = horizon_start;
    let mut previous_service: Duration = 0;
    let mut previous_travel = durations[0];
    let mut rank_in_tasks = 0;

    for step in steps {
        let mut lb = horizon_start;
        let mut ub = horizon_end;
        if let Some(at) = step.forced_service.at {
            horizon_start = horizon_start.min(at);
            horizon_end = horizon_end.max(at);
            lb = at;
            ub = at;
        }
        if let Some(after) = step.forced_service.after {
            horizon_start = horizon_start.min(after);
            horizon_end = horizon_end.max(after);
            lb = after;
        }
        if let Some(before) = step.forced_service.before {
            horizon_start = horizon_start.min(before);
            horizon_end = horizon_end.max(before);
            ub = before;
        }

        match step.step_type {
            ValidationStepType::Start => {
                previous_lb = lb;
                rank_in_tasks += 1;
            }
            ValidationStepType::Job => {
                let job = &problem.jobs[step.rank];
                lb = lb.max(
                    previous_lb
                        .checked_add(previous_service)
                        .and_then(|time| time.checked_add(previous_travel))
                        .ok_or_else(overflow)?,
                );
                previous_lb = lb;
                previous_service = job.service;
                previous_travel = durations[rank_in_tasks];
                rank_in_tasks += 1;
            }
            ValidationStepType::Break => {
                let brk = &vehicle.breaks[step.rank];
                lb = lb.max(previous_lb.checked_add(previous_service).ok_or_else(overflow)?);
                previous_lb = lb;
                previous_service = brk.service;
            }
            ValidationStepType::End => {
                lb = lb.max(
                    previous_lb
                        .checked_add(previous_service)
                        .and_then(|time| time.checked_add(previous_travel))
                        .ok_or_else(overflow)?,
                );
            }
        }
        if ub < lb {
            return Err(infeasible());
        }
        t_lb.push(lb);
        t_ub.push(ub);

        if matches!(step.step_type, ValidationStepType::Job | ValidationStepType::Break) {
            let (time_windows, service) = match step.step_type {
                ValidationStepType::Job => {
                    let job = &problem.jobs[step.rank];
                    (&job.time_windows, job.service)
                }
                _ => {
                    let brk = &vehicle.breaks[step.rank];
                    (&brk.time_windows, brk.service)
                }
            };
            // Clamp default windows to the horizon to keep the MIP scaled.
            let time_windows: Vec<TimeWindow> = time_windows
                .iter()
                .map(|tw| TimeWindow::new(tw.start.max(horizon_start), tw.end.min(horizon_end)))
                .collect();

            tasks.push(MipTask { first_relevant_tw: first_relevant_tw_rank(&time_windows, lb), time_windows, service });
        }
    }
    debug_assert_eq!(tasks.len(), n);

    let _guard = MIP_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let first = solve_round(
        vehicle.time_window,
        horizon_start,
        horizon_end,
        &t_lb,
        &t_ub,
        &tasks,
        &break_counts,
        &durations,
        makespan_estimate,
        None,
    )
    .map_err(|error| match error {
        good_lp::ResolutionError::Infeasible => infeasible(),
        other => SolverError::internal(format!("mip backend failure: {other:?}")),
    })?;

    let best_makespan = first.t_values[n + 1] - first.t_values[0];
    let best_sum_y: Duration = first.y_values.iter().sum();

    let second = solve_round(
        vehicle.time_window,
        horizon_start,
        horizon_end,
        &t_lb,
        &t_ub,
        &tasks,
        &break_counts,
        &durations,
        makespan_estimate,
        Some((best_makespan, best_sum_y)),
    )
    .map_err(|error| match error {
        good_lp::ResolutionError::Infeasible => infeasible(),
        other => SolverError::internal(format!("mip backend failure: {other:?}")),
    })?;

    drop(_guard);

    Ok(assemble_route(problem, vehicle_rank, steps, &second))
}

/// Finds the rank of the first time window still relevant for a task whose propagated
/// lower bound is `lb`: windows which can only produce a worse delay than the lead time
/// of the next window are discarded.
fn first_relevant_tw_rank(time_windows: &[TimeWindow], lb: Timestamp) -> usize {
    let last_started = time_windows.iter().rposition(|tw| tw.start <= lb);

    match last_started {
        None => 0,
        Some(rank) => {
            let tw = &time_windows[rank];
            if tw.end < lb && rank + 1 < time_windows.len() {
                let next = &time_windows[rank + 1];
                if next.start - lb < lb - tw.end {
                    return rank + 1;
                }
            }
            rank
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn solve_round(
    vehicle_tw: TimeWindow,
    horizon_start: Timestamp,
    horizon_end: Timestamp,
    t_lb: &[Timestamp],
    t_ub: &[Timestamp],
    tasks: &[MipTask],
    break_counts: &[usize],
    durations: &[Duration],
    makespan_estimate: Duration,
    pinned: Option<(Duration, Duration)>,
) -> Result<RoundOutput, good_lp::ResolutionError> {
    let n = tasks.len();
    let scale = |time: Timestamp| (time - horizon_start) as f64;

    let mut vars = variables!();
    let t: Vec<Variable> = (0..n + 2)
        .map(|i| vars.add(variable().min(scale(t_lb[i])).max(scale(t_ub[i]))))
        .collect();
    let y: Vec<Variable> = (0..n + 2).map(|_| vars.add(variable().min(0.))).collect();
    let x: Vec<Vec<Option<Variable>>> = tasks
        .iter()
        .map(|task| {
            (0..task.time_windows.len())
                .map(|k| if k < task.first_relevant_tw { None } else { Some(vars.add(variable().binary())) })
                .collect()
        })
        .collect();
    let delta: Vec<Variable> = (0..n + 1).map(|_| vars.add(variable().min(0.))).collect();

    let objective: Expression = match pinned {
        None => {
            let mut objective = Expression::from(t[n + 1]) - t[0];
            for &slack in y.iter() {
                objective = objective + makespan_estimate as f64 * slack;
            }
            objective
        }
        Some(_) => {
            let delta_majorant: Duration =
                break_counts.iter().zip(durations.iter()).map(|(&breaks, &travel)| breaks as Duration * travel).sum();
            let big_m = delta_majorant.max(1) as f64;

            let mut objective = Expression::from(0.0);
            for &service_start in t.iter().take(n + 1).skip(1) {
                objective = objective + big_m * service_start;
            }
            // tie break in favour of the shortest travel span before each break
            let mut offset = 0;
            for &breaks in break_counts.iter() {
                for weight in 1..=breaks {
                    objective = objective + weight as f64 * delta[offset + weight];
                }
                offset += 1 + breaks;
            }
            objective
        }
    };

    let mut model = vars.minimise(objective).using(default_solver);

    // precedence: service plus intervening travel separates consecutive steps
    for i in 0..=n {
        let service = if i == 0 { 0. } else { tasks[i - 1].service as f64 };
        model.add_constraint((Expression::from(t[i + 1]) - t[i] - delta[i]).geq(service));
    }

    // vehicle window violations at both route ends
    let start_bound = if vehicle_tw.is_default() { 0. } else { scale(vehicle_tw.start) };
    model.add_constraint((Expression::from(t[0]) + y[0]).geq(start_bound));
    model.add_constraint((Expression::from(t[n + 1]) - y[n + 1]).leq(scale(vehicle_tw.end.min(horizon_end))));

    // per task: one time window is chosen and bounds the service start through slack
    for (task_rank, task) in tasks.iter().enumerate() {
        let i = task_rank + 1;

        let mut lead = Expression::from(t[i]) + y[i];
        let mut delay = Expression::from(t[i]) - y[i];
        let mut choice = Expression::from(0.0);
        for (k, tw) in task.time_windows.iter().enumerate() {
            if let Some(var) = x[task_rank][k] {
                lead = lead - scale(tw.start) * var;
                delay = delay - scale(tw.end) * var;
                choice = choice + var;
            }
        }
        model.add_constraint(lead.geq(0.0));
        model.add_constraint(delay.leq(0.0));
        model.add_constraint(choice.eq(1.0));
    }

    // travel between consecutive non-break tasks decomposes over intervening breaks
    let mut offset = 0;
    for (&breaks, &travel) in break_counts.iter().zip(durations.iter()) {
        let mut split = Expression::from(0.0);
        for part in 0..=breaks {
            split = split + delta[offset + part];
        }
        model.add_constraint(split.eq(travel as f64));
        offset += 1 + breaks;
    }

    if let Some((makespan, sum_y)) = pinned {
        // equality up to rounding: the underlying values are integral
        let makespan = makespan as f64;
        model.add_constraint((Expression::from(t[n + 1]) - t[0]).geq(makespan - 0.5));
        model.add_constraint((Expression::from(t[n + 1]) - t[0]).leq(makespan + 0.5));

        let mut total_slack = Expression::from(0.0);
        for &slack in y.iter() {
            total_slack = total_slack + slack;
        }
        let sum_y = sum_y as f64;
        model.add_constraint(total_slack.clone().geq(sum_y - 0.5));
        model.add_constraint(total_slack.leq(sum_y + 0.5));
    }

    let solution = model.solve()?;

    let as_duration = |value: f64| value.round().max(0.) as Duration;
    let t_values = t.iter().map(|&var| horizon_start + as_duration(solution.value(var))).collect();
    let y_values = y.iter().map(|&var| as_duration(solution.value(var))).collect();
    let delta_values = delta.iter().map(|&var| as_duration(solution.value(var))).collect();
    let tw_ranks = x
        .iter()
        .map(|task_vars| {
            task_vars
                .iter()
                .enumerate()
                .find(|(_, var)| var.map_or(false, |var| solution.value(var) > 0.5))
                .map_or(0, |(k, _)| k)
        })
        .collect();

    Ok(RoundOutput { t_values, y_values, delta_values, tw_ranks })
}

/// Walks the scheduled sequence and produces the reportable route with per-step
/// arrival, waiting and violations, mirroring the output schema.
fn assemble_route(
    problem: &Problem,
    vehicle_rank: usize,
    steps: &[ValidationStep],
    output: &RoundOutput,
) -> VehicleRoute {
    let vehicle = &problem.vehicles[vehicle_rank];
    let n = steps.len() - 2;

    let v_start = output.t_values[0];
    let v_end = output.t_values[n + 1];
    let start_lead_time = output.y_values[0];
    let end_delay = output.y_values[n + 1];
    let start_travel = output.delta_values[0];

    let mut duration: Duration = 0;
    let mut service_total: Duration = 0;
    let mut forward_wt: Duration = 0;
    let mut priority = 0;
    let mut sum_pickups = problem.zero_amount();
    let mut sum_deliveries = problem.zero_amount();
    let mut lead_time_total: Duration = 0;
    let mut delay_total: Duration = 0;
    let mut violation_types: HashSet<ViolationType> = HashSet::new();

    // startup load is the sum of deliveries of single jobs
    let mut current_load = problem.zero_amount();
    for step in steps {
        if step.step_type == ValidationStepType::Job && problem.jobs[step.rank].job_type == JobType::Single {
            current_load += &problem.jobs[step.rank].delivery;
        }
    }
    let mut previous_over_capacity = !current_load.fits_within(&vehicle.capacity);

    let mut expected_delivery_ranks: HashSet<usize> = HashSet::new();
    let mut delivery_first_ranks: HashSet<usize> = HashSet::new();
    let mut delivery_to_pickup_step: HashMap<usize, usize> = HashMap::new();
    let mut break_ids: HashSet<u64> = vehicle.breaks.iter().map(|brk| brk.id).collect();

    let mut sol_steps: Vec<Step> = Vec::new();

    if vehicle.has_start() {
        let mut violations = Violations::default();
        if v_start < vehicle.time_window.start {
            violations.types.insert(ViolationType::LeadTime);
            violation_types.insert(ViolationType::LeadTime);
            violations.lead_time = vehicle.time_window.start - v_start;
            lead_time_total += violations.lead_time;
        }
        if previous_over_capacity {
            violations.types.insert(ViolationType::Load);
            violation_types.insert(ViolationType::Load);
        }
        sol_steps.push(Step {
            step_type: StepType::Start,
            id: None,
            location: vehicle.start,
            arrival: v_start,
            duration: 0,
            service_start: v_start,
            waiting_time: 0,
            load: current_load.clone(),
            violations,
        });
    } else {
        // no start step to attach the startup window violation to
        lead_time_total += start_lead_time;
    }

    let mut previous_start = v_start;
    let mut previous_service: Duration = 0;
    let mut previous_travel = start_travel;
    let mut task_rank = 0;

    for step in steps {
        match step.step_type {
            ValidationStepType::Start => {}
            ValidationStepType::Job => {
                let job = &problem.jobs[step.rank];

                service_total += job.service;
                priority += job.priority;
                current_load += &job.pickup;
                current_load -= &job.delivery;
                sum_pickups += &job.pickup;
                sum_deliveries += &job.delivery;

                duration += previous_travel;
                let arrival = previous_start + previous_service + previous_travel;
                let service_start = output.t_values[task_rank + 1];
                let waiting_time = service_start.saturating_sub(arrival);
                forward_wt += waiting_time;

                let mut violations = Violations::default();
                let tw = &job.time_windows[output.tw_ranks[task_rank]];
                if service_start < tw.start {
                    violations.types.insert(ViolationType::LeadTime);
                    violation_types.insert(ViolationType::LeadTime);
                    violations.lead_time = tw.start - service_start;
                    lead_time_total += violations.lead_time;
                }
                if tw.end < service_start {
                    violations.types.insert(ViolationType::Delay);
                    violation_types.insert(ViolationType::Delay);
                    violations.delay = service_start - tw.end;
                    delay_total += violations.delay;
                }
                let over_capacity = !current_load.fits_within(&vehicle.capacity);
                if previous_over_capacity || over_capacity {
                    violations.types.insert(ViolationType::Load);
                    violation_types.insert(ViolationType::Load);
                }
                previous_over_capacity = over_capacity;
                if !problem.vehicle_ok_with_job(vehicle_rank, step.rank) {
                    violations.types.insert(ViolationType::Skills);
                    violation_types.insert(ViolationType::Skills);
                }

                let step_type = match job.job_type {
                    JobType::Single => StepType::Job,
                    JobType::Pickup => StepType::Pickup,
                    JobType::Delivery => StepType::Delivery,
                };
                match job.job_type {
                    JobType::Single => {}
                    JobType::Pickup => {
                        if delivery_first_ranks.contains(&(step.rank + 1)) {
                            violations.types.insert(ViolationType::Precedence);
                            violation_types.insert(ViolationType::Precedence);
                        } else {
                            expected_delivery_ranks.insert(step.rank + 1);
                            delivery_to_pickup_step.insert(step.rank + 1, sol_steps.len());
                        }
                    }
                    JobType::Delivery => {
                        if !expected_delivery_ranks.remove(&step.rank) {
                            violations.types.insert(ViolationType::Precedence);
                            violation_types.insert(ViolationType::Precedence);
                            delivery_first_ranks.insert(step.rank);
                        }
                    }
                }

                sol_steps.push(Step {
                    step_type,
                    id: Some(job.id),
                    location: Some(job.location),
                    arrival,
                    duration,
                    service_start,
                    waiting_time,
                    load: current_load.clone(),
                    violations,
                });

                previous_start = service_start;
                previous_service = job.service;
                previous_travel = output.delta_values[task_rank + 1];
                task_rank += 1;
            }
            ValidationStepType::Break => {
                let brk = &vehicle.breaks[step.rank];
                break_ids.remove(&brk.id);

                service_total += brk.service;

                duration += previous_travel;
                let arrival = previous_start + previous_service + previous_travel;
                let service_start = output.t_values[task_rank + 1];
                let waiting_time = service_start.saturating_sub(arrival);
                forward_wt += waiting_time;

                let mut violations = Violations::default();
                let tw = &brk.time_windows[output.tw_ranks[task_rank]];
                if service_start < tw.start {
                    violations.types.insert(ViolationType::LeadTime);
                    violation_types.insert(ViolationType::LeadTime);
                    violations.lead_time = tw.start - service_start;
                    lead_time_total += violations.lead_time;
                }
                if tw.end < service_start {
                    violations.types.insert(ViolationType::Delay);
                    violation_types.insert(ViolationType::Delay);
                    violations.delay = service_start - tw.end;
                    delay_total += violations.delay;
                }
                if previous_over_capacity {
                    violations.types.insert(ViolationType::Load);
                    violation_types.insert(ViolationType::Load);
                }

                sol_steps.push(Step {
                    step_type: StepType::Break,
                    id: Some(brk.id),
                    location: None,
                    arrival,
                    duration,
                    service_start,
                    waiting_time,
                    load: current_load.clone(),
                    violations,
                });

                previous_start = service_start;
                previous_service = brk.service;
                previous_travel = output.delta_values[task_rank + 1];
                task_rank += 1;
            }
            ValidationStepType::End => {
                if vehicle.has_end() {
                    duration += previous_travel;
                    let arrival = previous_start + previous_service + previous_travel;
                    let waiting_time = v_end.saturating_sub(arrival);
                    forward_wt += waiting_time;

                    let mut violations = Violations::default();
                    if vehicle.time_window.end < v_end {
                        violations.types.insert(ViolationType::Delay);
                        violation_types.insert(ViolationType::Delay);
                        violations.delay = v_end - vehicle.time_window.end;
                        delay_total += violations.delay;
                    }
                    if previous_over_capacity {
                        violations.types.insert(ViolationType::Load);
                        violation_types.insert(ViolationType::Load);
                    }

                    sol_steps.push(Step {
                        step_type: StepType::End,
                        id: None,
                        location: vehicle.end,
                        arrival,
                        duration,
                        service_start: v_end,
                        waiting_time,
                        load: current_load.clone(),
                        violations,
                    });
                } else {
                    delay_total += end_delay;
                }
            }
        }
    }

    // pickups whose delivery never showed up
    for delivery_rank in expected_delivery_ranks {
        if let Some(&step_idx) = delivery_to_pickup_step.get(&delivery_rank) {
            sol_steps[step_idx].violations.types.insert(ViolationType::Precedence);
            violation_types.insert(ViolationType::Precedence);
        }
    }
    if !break_ids.is_empty() {
        violation_types.insert(ViolationType::MissingBreak);
    }

    VehicleRoute {
        vehicle_id: vehicle.id,
        steps: sol_steps,
        cost: duration as Cost,
        service: service_total,
        duration,
        waiting_time: forward_wt,
        priority,
        delivery: sum_deliveries,
        pickup: sum_pickups,
        violations: Violations { lead_time: lead_time_total, delay: delay_total, types: violation_types },
    }
}
