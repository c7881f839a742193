#[cfg(test)]
#[path = "../../../tests/unit/models/solution/route_test.rs"]
mod route_test;

use crate::models::common::Amount;
use crate::models::problem::{JobType, Problem};

/// An ordered sequence of job ranks served by one vehicle with cached load prefixes.
#[derive(Clone, Debug)]
pub struct RawRoute {
    /// A vehicle rank within the problem.
    pub vehicle: usize,
    /// Served job ranks in visit order.
    pub jobs: Vec<usize>,

    current_loads: Vec<Amount>,
    fwd_peaks: Vec<Amount>,
    bwd_peaks: Vec<Amount>,
}

impl RawRoute {
    /// Creates an empty route for given vehicle.
    pub fn new(vehicle: usize, problem: &Problem) -> Self {
        let zero = problem.zero_amount();
        Self {
            vehicle,
            jobs: Vec::default(),
            current_loads: vec![zero.clone()],
            fwd_peaks: vec![zero.clone()],
            bwd_peaks: vec![zero],
        }
    }

    /// Creates a route over given job ranks.
    pub fn with_jobs(vehicle: usize, jobs: Vec<usize>, problem: &Problem) -> Self {
        let mut route = Self::new(vehicle, problem);
        route.jobs = jobs;
        route.update_amounts(problem);

        route
    }

    /// Checks whether route serves no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Returns load right after serving the first `rank` jobs. Rank zero is the startup load.
    pub fn load_at(&self, rank: usize) -> &Amount {
        &self.current_loads[rank]
    }

    /// Returns componentwise maximum of loads over positions `0..=rank`.
    pub fn fwd_peak(&self, rank: usize) -> &Amount {
        &self.fwd_peaks[rank]
    }

    /// Returns componentwise maximum of loads over positions `rank..`.
    pub fn bwd_peak(&self, rank: usize) -> &Amount {
        &self.bwd_peaks[rank]
    }

    /// Recomputes load prefixes and peaks. Must be called after every mutation of `jobs`.
    pub fn update_amounts(&mut self, problem: &Problem) {
        let mut load = startup_load(problem, &self.jobs);

        self.current_loads.clear();
        self.current_loads.push(load.clone());
        for &job in self.jobs.iter() {
            load += &problem.jobs[job].pickup;
            load -= &problem.jobs[job].delivery;
            self.current_loads.push(load.clone());
        }

        self.fwd_peaks.clear();
        let mut peak = self.current_loads[0].clone();
        for load in self.current_loads.iter() {
            peak = peak.max_components(load);
            self.fwd_peaks.push(peak.clone());
        }

        self.bwd_peaks = vec![problem.zero_amount(); self.current_loads.len()];
        let mut peak = self.current_loads[self.current_loads.len() - 1].clone();
        for (rank, load) in self.current_loads.iter().enumerate().rev() {
            peak = peak.max_components(load);
            self.bwd_peaks[rank] = peak.clone();
        }
    }

    /// Checks whether a single job with given pickup and delivery can be added at `rank`
    /// without violating capacity. Constant time via cached peaks.
    pub fn is_valid_addition_for_capacity(
        &self,
        problem: &Problem,
        pickup: &Amount,
        delivery: &Amount,
        rank: usize,
    ) -> bool {
        let capacity = &problem.vehicles[self.vehicle].capacity;

        (self.fwd_peak(rank) + delivery).fits_within(capacity) && (self.bwd_peak(rank) + pickup).fits_within(capacity)
    }

    /// Checks whether replacing jobs in `first..last` with content of given total pickup
    /// and delivery can fit. Conservative: may reject a feasible replacement, never the
    /// other way around.
    pub fn is_valid_addition_for_capacity_margins(
        &self,
        problem: &Problem,
        pickup: &Amount,
        delivery: &Amount,
        first: usize,
        last: usize,
    ) -> bool {
        let capacity = &problem.vehicles[self.vehicle].capacity;

        (self.fwd_peak(first) + delivery).fits_within(capacity) && (self.bwd_peak(last) + pickup).fits_within(capacity)
    }

    /// Checks exactly whether replacing jobs in `first..last` with given ranks keeps all
    /// load prefixes within capacity. Linear in route size; required for content carrying
    /// pickup-delivery pairs where peak margins are not applicable.
    pub fn is_valid_range_content(&self, problem: &Problem, first: usize, last: usize, ranks: &[usize]) -> bool {
        let capacity = &problem.vehicles[self.vehicle].capacity;
        let sequence =
            || self.jobs[..first].iter().chain(ranks.iter()).chain(self.jobs[last..].iter()).copied();

        let mut load = startup_load_over(problem, sequence());
        if !load.fits_within(capacity) {
            return false;
        }

        for job in sequence() {
            load += &problem.jobs[job].pickup;
            load -= &problem.jobs[job].delivery;
            if !load.fits_within(capacity) {
                return false;
            }
        }

        true
    }

    /// Replaces jobs in `first..last` with given ranks and refreshes load caches.
    pub fn replace(&mut self, problem: &Problem, first: usize, last: usize, ranks: &[usize]) {
        self.jobs.splice(first..last, ranks.iter().copied());
        self.update_amounts(problem);
    }
}

/// Returns the load carried when leaving the start: deliveries of all single jobs.
pub(crate) fn startup_load(problem: &Problem, jobs: &[usize]) -> Amount {
    startup_load_over(problem, jobs.iter().copied())
}

fn startup_load_over(problem: &Problem, jobs: impl Iterator<Item = usize>) -> Amount {
    let mut load = problem.zero_amount();
    jobs.filter(|&job| problem.jobs[job].job_type == JobType::Single)
        .for_each(|job| load += &problem.jobs[job].delivery);

    load
}
