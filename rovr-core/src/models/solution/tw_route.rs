#[cfg(test)]
#[path = "../../../tests/unit/models/solution/tw_route_test.rs"]
mod tw_route_test;

use crate::models::common::{Duration, Location, Timestamp};
use crate::models::problem::{Problem, Vehicle};
use crate::models::solution::route::RawRoute;

/// A break scheduled in the gap before a step, with its own service time slack.
#[derive(Clone, Debug)]
pub struct PlannedBreak {
    /// A break rank within the vehicle's break list.
    pub break_rank: usize,
    /// A chosen time window rank.
    pub tw_rank: usize,
    /// Earliest feasible break start.
    pub earliest: Timestamp,
    /// Latest feasible break start.
    pub latest: Timestamp,
}

/// Tight earliest/latest service times for every step of a route, including break
/// placements. Maintained by [`TwRoute`] after every mutation.
#[derive(Clone, Debug, Default)]
struct Schedule {
    start_earliest: Timestamp,
    start_latest: Timestamp,
    end_earliest: Timestamp,
    end_latest: Timestamp,
    earliest: Vec<Timestamp>,
    latest: Vec<Timestamp>,
    tw_ranks: Vec<usize>,
    /// Breaks placed before step `g`: `gaps[g]` sits between job `g - 1` and job `g`,
    /// the last entry sits before the route end.
    gaps: Vec<Vec<PlannedBreak>>,
}

/// A route which additionally keeps a feasible schedule: earliest/latest service times
/// per position and break placements. All mutations go through [`TwRoute::replace`]
/// which re-runs the forward and backward propagations.
#[derive(Clone, Debug)]
pub struct TwRoute {
    /// The underlying job sequence with load caches.
    pub route: RawRoute,
    schedule: Schedule,
}

impl TwRoute {
    /// Creates an empty time window aware route for given vehicle.
    pub fn new(vehicle: usize, problem: &Problem) -> Self {
        let route = RawRoute::new(vehicle, problem);
        let schedule = compute_schedule(problem, &route)
            .unwrap_or_else(|| unreachable!("empty route must be schedulable"));

        Self { route, schedule }
    }

    /// Tries to create a route over given job ranks, returns `None` when no feasible
    /// schedule exists.
    pub fn with_jobs(vehicle: usize, jobs: Vec<usize>, problem: &Problem) -> Option<Self> {
        let route = RawRoute::with_jobs(vehicle, jobs, problem);
        compute_schedule(problem, &route).map(|schedule| Self { route, schedule })
    }

    /// Returns earliest departure time from the route start.
    pub fn start_earliest(&self) -> Timestamp {
        self.schedule.start_earliest
    }

    /// Returns latest departure time from the route start.
    pub fn start_latest(&self) -> Timestamp {
        self.schedule.start_latest
    }

    /// Returns earliest arrival time at the route end.
    pub fn end_earliest(&self) -> Timestamp {
        self.schedule.end_earliest
    }

    /// Returns latest arrival time at the route end.
    pub fn end_latest(&self) -> Timestamp {
        self.schedule.end_latest
    }

    /// Returns earliest service start for job at given position.
    pub fn earliest_at(&self, rank: usize) -> Timestamp {
        self.schedule.earliest[rank]
    }

    /// Returns latest service start for job at given position.
    pub fn latest_at(&self, rank: usize) -> Timestamp {
        self.schedule.latest[rank]
    }

    /// Returns chosen time window rank for job at given position.
    pub fn tw_rank_at(&self, rank: usize) -> usize {
        self.schedule.tw_ranks[rank]
    }

    /// Returns breaks planned in the gap before step at given position.
    pub fn breaks_before(&self, rank: usize) -> &[PlannedBreak] {
        &self.schedule.gaps[rank]
    }

    /// Would inserting `job` at `rank` yield a feasible schedule?
    pub fn is_valid_addition_for_tw(&self, problem: &Problem, job: usize, rank: usize) -> bool {
        self.is_valid_replacement(problem, rank, rank, &[job])
    }

    /// Batch variant of [`Self::is_valid_addition_for_tw`] for contiguous slices.
    pub fn is_valid_addition_for_tw_range(&self, problem: &Problem, jobs: &[usize], rank: usize) -> bool {
        self.is_valid_replacement(problem, rank, rank, jobs)
    }

    /// Checks feasibility after removing `count` consecutive jobs at `rank`.
    pub fn is_valid_removal(&self, problem: &Problem, rank: usize, count: usize) -> bool {
        self.is_valid_replacement(problem, rank, rank + count, &[])
    }

    /// Checks whether replacing jobs in `first..last` with given ranks keeps the
    /// schedule feasible. Without breaks this is a local propagation which stops at the
    /// stored `latest` bound of the first untouched step; with breaks the whole
    /// candidate is rescheduled.
    pub fn is_valid_replacement(&self, problem: &Problem, first: usize, last: usize, ranks: &[usize]) -> bool {
        let vehicle = &problem.vehicles[self.route.vehicle];

        if !vehicle.breaks.is_empty() {
            let mut candidate = self.route.jobs.clone();
            candidate.splice(first..last, ranks.iter().copied());
            let candidate = RawRoute::with_jobs(self.route.vehicle, candidate, problem);
            return compute_schedule(problem, &candidate).is_some();
        }

        let mut departure = if first == 0 {
            self.schedule.start_earliest
        } else {
            let job = &problem.jobs[self.route.jobs[first - 1]];
            match self.schedule.earliest[first - 1].checked_add(job.service) {
                Some(time) => time,
                None => return false,
            }
        };
        let mut location =
            if first == 0 { vehicle.start } else { Some(problem.jobs[self.route.jobs[first - 1]].location) };

        for &rank in ranks {
            let job = &problem.jobs[rank];
            let arrival = match checked_arrival(problem, departure, location, job.location) {
                Some(time) => time,
                None => return false,
            };
            let tw = match job.time_windows.iter().find(|tw| tw.end >= arrival) {
                Some(tw) => tw,
                None => return false,
            };
            let service_start = arrival.max(tw.start);
            departure = match service_start.checked_add(job.service) {
                Some(time) => time,
                None => return false,
            };
            location = Some(job.location);
        }

        if last < self.route.jobs.len() {
            let next = &problem.jobs[self.route.jobs[last]];
            match checked_arrival(problem, departure, location, next.location) {
                Some(arrival) => arrival <= self.schedule.latest[last],
                None => false,
            }
        } else {
            let arrival = match (location, vehicle.end) {
                (Some(from), Some(to)) => departure.checked_add(problem.matrix.duration(from, to)),
                _ => Some(departure),
            };
            match arrival {
                Some(arrival) => arrival <= vehicle.time_window.end,
                None => false,
            }
        }
    }

    /// Atomically replaces jobs in `first..last` with given ranks, rebuilding only the
    /// forward and backward propagations of the affected span: both sweeps stop as soon
    /// as the recomputed times fall back onto the stored schedule. Break placement is
    /// global, so routes with breaks are rescheduled as a whole. The replacement must
    /// have been validated beforehand.
    pub fn replace(&mut self, problem: &Problem, first: usize, last: usize, ranks: &[usize]) {
        let removed = last - first;
        let inserted = ranks.len();
        self.route.replace(problem, first, last, ranks);

        let vehicle = &problem.vehicles[self.route.vehicle];
        if !vehicle.breaks.is_empty() || self.route.jobs.is_empty() {
            self.schedule = compute_schedule(problem, &self.route)
                .unwrap_or_else(|| unreachable!("replacement applied without validity check"));
            return;
        }

        rebuild_affected_span(problem, vehicle, &self.route, &mut self.schedule, first, removed, inserted)
            .unwrap_or_else(|| unreachable!("replacement applied without validity check"));
    }
}

/// Re-runs the forward propagation from the start of a replaced span and the backward
/// propagation from its end. Positions past the span keep their stored times once the
/// propagated values coincide with them again; positions before the span keep theirs
/// once the late bound settles back. Only used for routes without breaks.
fn rebuild_affected_span(
    problem: &Problem,
    vehicle: &Vehicle,
    route: &RawRoute,
    schedule: &mut Schedule,
    first: usize,
    removed: usize,
    inserted: usize,
) -> Option<()> {
    let jobs = route.jobs.as_slice();
    let old_earliest = std::mem::take(&mut schedule.earliest);
    let old_latest = std::mem::take(&mut schedule.latest);
    let old_tw_ranks = std::mem::take(&mut schedule.tw_ranks);

    let mut earliest = Vec::with_capacity(jobs.len());
    let mut tw_ranks = Vec::with_capacity(jobs.len());
    earliest.extend_from_slice(&old_earliest[..first]);
    tw_ranks.extend_from_slice(&old_tw_ranks[..first]);

    let mut departure = if first == 0 {
        schedule.start_earliest
    } else {
        earliest[first - 1].checked_add(problem.jobs[jobs[first - 1]].service)?
    };
    let mut location = if first == 0 { vehicle.start } else { Some(problem.jobs[jobs[first - 1]].location) };

    // first position whose stored times survive the mutation
    let mut stable = jobs.len();
    while earliest.len() < jobs.len() {
        let i = earliest.len();
        let job = &problem.jobs[jobs[i]];
        let arrival = checked_arrival(problem, departure, location, job.location)?;
        let tw_rank = job.time_windows.iter().position(|tw| tw.end >= arrival)?;
        let start = arrival.max(job.time_windows[tw_rank].start);

        if i >= first + inserted {
            let old_i = i - inserted + removed;
            if start == old_earliest[old_i] && tw_rank == old_tw_ranks[old_i] {
                earliest.extend_from_slice(&old_earliest[old_i..]);
                tw_ranks.extend_from_slice(&old_tw_ranks[old_i..]);
                stable = i;
                break;
            }
        }

        earliest.push(start);
        tw_ranks.push(tw_rank);
        departure = start.checked_add(job.service)?;
        location = Some(job.location);
    }

    if stable == jobs.len() {
        let arrival = match (location, vehicle.end) {
            (Some(from), Some(to)) => departure.checked_add(problem.matrix.duration(from, to))?,
            _ => departure,
        };
        if arrival > vehicle.time_window.end {
            return None;
        }
        schedule.end_earliest = arrival;
    }

    schedule.earliest = earliest;
    schedule.tw_ranks = tw_ranks;

    let mut latest = vec![0; jobs.len()];
    let (mut follow, mut follow_travel) = if stable == jobs.len() {
        (schedule.end_latest, crossing_travel(problem, vehicle, jobs, jobs.len()))
    } else {
        latest[stable..].copy_from_slice(&old_latest[stable - inserted + removed..]);
        (latest[stable], crossing_travel(problem, vehicle, jobs, stable))
    };

    let mut reached_start = true;
    for i in (0..stable).rev() {
        let job = &problem.jobs[jobs[i]];
        let bound = follow.checked_sub(follow_travel)?.checked_sub(job.service)?;
        let value = bound.min(job.time_windows[schedule.tw_ranks[i]].end);
        if value < schedule.earliest[i] {
            return None;
        }

        if i < first && value == old_latest[i] {
            latest[..=i].copy_from_slice(&old_latest[..=i]);
            reached_start = false;
            break;
        }

        latest[i] = value;
        follow = value;
        follow_travel = crossing_travel(problem, vehicle, jobs, i);
    }

    if reached_start {
        schedule.start_latest = follow.checked_sub(follow_travel)?;
        if schedule.start_latest < schedule.start_earliest {
            return None;
        }
    }
    schedule.latest = latest;
    schedule.gaps = vec![Vec::new(); jobs.len() + 1];

    Some(())
}

fn checked_arrival(
    problem: &Problem,
    departure: Timestamp,
    from: Option<Location>,
    to: Location,
) -> Option<Timestamp> {
    match from {
        Some(from) => departure.checked_add(problem.matrix.duration(from, to)),
        None => Some(departure),
    }
}

/// Travel crossing the gap before step `g` of the (start, jobs.., end) sequence.
fn crossing_travel(problem: &Problem, vehicle: &Vehicle, jobs: &[usize], g: usize) -> Duration {
    let from = if g == 0 { vehicle.start } else { Some(problem.jobs[jobs[g - 1]].location) };
    let to = if g == jobs.len() { vehicle.end } else { Some(problem.jobs[jobs[g]].location) };

    match (from, to) {
        (Some(from), Some(to)) => problem.matrix.duration(from, to),
        _ => 0,
    }
}

/// Computes a tight schedule for the route or returns `None` when infeasible. All
/// arithmetic is checked: an overflow means infeasibility, never saturation.
fn compute_schedule(problem: &Problem, route: &RawRoute) -> Option<Schedule> {
    let vehicle = &problem.vehicles[route.vehicle];
    let jobs = route.jobs.as_slice();

    // An unused vehicle stays at its start: no travel, no breaks to consume.
    if jobs.is_empty() {
        return Some(Schedule {
            start_earliest: vehicle.time_window.start,
            start_latest: vehicle.time_window.end,
            end_earliest: vehicle.time_window.start,
            end_latest: vehicle.time_window.end,
            gaps: vec![Vec::new()],
            ..Schedule::default()
        });
    }

    let mut schedule = Schedule { gaps: vec![Vec::new(); jobs.len() + 1], ..Schedule::default() };

    forward_sweep(problem, vehicle, jobs, &mut schedule)?;
    backward_sweep(problem, vehicle, jobs, &mut schedule)?;

    if !vehicle.breaks.is_empty() {
        place_breaks(problem, vehicle, jobs, &mut schedule)?;
        forward_sweep(problem, vehicle, jobs, &mut schedule)?;
        backward_sweep(problem, vehicle, jobs, &mut schedule)?;
    }

    Some(schedule)
}

/// Sets `earliest` for every step, choosing per job the earliest time window which can
/// still be met. Breaks already planned in gaps are served at the previous location
/// before crossing travel.
fn forward_sweep(problem: &Problem, vehicle: &Vehicle, jobs: &[usize], schedule: &mut Schedule) -> Option<()> {
    schedule.start_earliest = if vehicle.time_window.is_default() { 0 } else { vehicle.time_window.start };
    schedule.earliest.clear();
    schedule.tw_ranks.clear();

    let mut departure = schedule.start_earliest;
    let mut location = vehicle.start;

    for g in 0..=jobs.len() {
        for planned in schedule.gaps[g].iter_mut() {
            let brk = &vehicle.breaks[planned.break_rank];
            let tw = &brk.time_windows[planned.tw_rank];
            let start = departure.max(tw.start);
            if start > tw.end {
                return None;
            }
            planned.earliest = start;
            departure = start.checked_add(brk.service)?;
        }

        if g < jobs.len() {
            let job = &problem.jobs[jobs[g]];
            let arrival = checked_arrival(problem, departure, location, job.location)?;
            let tw_rank = job.time_windows.iter().position(|tw| tw.end >= arrival)?;
            let earliest = arrival.max(job.time_windows[tw_rank].start);

            schedule.earliest.push(earliest);
            schedule.tw_ranks.push(tw_rank);

            departure = earliest.checked_add(job.service)?;
            location = Some(job.location);
        } else {
            let arrival = match (location, vehicle.end) {
                (Some(from), Some(to)) => departure.checked_add(problem.matrix.duration(from, to))?,
                _ => departure,
            };
            if arrival > vehicle.time_window.end {
                return None;
            }
            schedule.end_earliest = arrival;
        }
    }

    Some(())
}

/// Sets `latest` for every step so that the remainder of the route stays feasible,
/// mirroring the forward sweep. Requires `earliest`/`tw_ranks` to be up to date.
fn backward_sweep(problem: &Problem, vehicle: &Vehicle, jobs: &[usize], schedule: &mut Schedule) -> Option<()> {
    schedule.end_latest = vehicle.time_window.end;
    schedule.latest = vec![0; jobs.len()];

    let mut follow = schedule.end_latest;
    let mut follow_travel = crossing_travel(problem, vehicle, jobs, jobs.len());

    for g in (0..jobs.len()).rev() {
        (follow, follow_travel) = tighten_gap_breaks(vehicle, &mut schedule.gaps[g + 1], follow, follow_travel)?;

        let job = &problem.jobs[jobs[g]];
        let bound = follow.checked_sub(follow_travel)?.checked_sub(job.service)?;
        let latest = bound.min(job.time_windows[schedule.tw_ranks[g]].end);
        if latest < schedule.earliest[g] {
            return None;
        }
        schedule.latest[g] = latest;

        follow = latest;
        follow_travel = crossing_travel(problem, vehicle, jobs, g);
    }

    (follow, follow_travel) = tighten_gap_breaks(vehicle, &mut schedule.gaps[0], follow, follow_travel)?;

    schedule.start_latest = follow.checked_sub(follow_travel)?;
    if schedule.start_latest < schedule.start_earliest {
        return None;
    }

    Some(())
}

/// Propagates the late bound right-to-left through the breaks of one gap. The break
/// next to the following step absorbs the crossing travel.
fn tighten_gap_breaks(
    vehicle: &Vehicle,
    planned_breaks: &mut [PlannedBreak],
    mut follow: Timestamp,
    mut follow_travel: Duration,
) -> Option<(Timestamp, Duration)> {
    for planned in planned_breaks.iter_mut().rev() {
        let brk = &vehicle.breaks[planned.break_rank];
        let tw = &brk.time_windows[planned.tw_rank];
        let latest = follow.checked_sub(follow_travel)?.checked_sub(brk.service)?.min(tw.end);
        if latest < planned.earliest {
            return None;
        }
        planned.latest = latest;
        follow = latest;
        follow_travel = 0;
    }

    Some((follow, follow_travel))
}

/// Assigns every break to the first gap where one of its time windows intersects the
/// open interval between consecutive service steps, shifted by already placed breaks.
/// Ties prefer the earliest time window; break order follows the vehicle's list, which
/// keeps lower break ids first.
fn place_breaks(problem: &Problem, vehicle: &Vehicle, jobs: &[usize], schedule: &mut Schedule) -> Option<()> {
    schedule.gaps.iter_mut().for_each(Vec::clear);

    let mut g = 0;
    let mut shift: Duration = 0;

    for (break_rank, brk) in vehicle.breaks.iter().enumerate() {
        loop {
            if g > jobs.len() {
                return None;
            }

            let open_start = if g == 0 {
                schedule.start_earliest.checked_add(shift)?
            } else {
                let job = &problem.jobs[jobs[g - 1]];
                schedule.earliest[g - 1].checked_add(job.service)?.checked_add(shift)?
            };
            let next_latest = if g == jobs.len() { schedule.end_latest } else { schedule.latest[g] };
            let open_end = next_latest.checked_sub(crossing_travel(problem, vehicle, jobs, g));

            let found = open_end.filter(|open_end| open_start <= *open_end).and_then(|open_end| {
                brk.time_windows.iter().position(|tw| tw.start <= open_end && tw.end >= open_start)
            });

            if let Some(tw_rank) = found {
                let tw = &brk.time_windows[tw_rank];
                schedule.gaps[g].push(PlannedBreak {
                    break_rank,
                    tw_rank,
                    earliest: open_start.max(tw.start),
                    latest: tw.end,
                });
                shift = shift.checked_add(brk.service)?;
                break;
            }

            g += 1;
            shift = 0;
        }
    }

    Some(())
}
