//! A regret insertion heuristic which produces the initial solutions for the solver.

#[cfg(test)]
#[path = "../../tests/unit/construction/heuristics_test.rs"]
mod heuristics_test;

use crate::models::common::Cost;
use crate::models::problem::{JobType, Problem};
use crate::models::solution::RouteMut;
use crate::solver::search::local::{add_cost_edge, add_cost_node};

/// Specifies how routes are pre-filled before the regret loop starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SeedStrategy {
    /// No seeding, the regret loop does all the work.
    None,
    /// Every empty route first receives the cheapest unassigned job measured from the
    /// vehicle start.
    NearestFromStart,
}

/// Where an insertion unit goes: a single rank, or for pairs the resequenced span
/// between the pickup and delivery positions.
enum InsertionPosition {
    Single { rank: usize },
    Pair { first: usize, last: usize, span: Vec<usize> },
}

struct InsertionCandidate {
    cost: Cost,
    vehicle: usize,
    position: InsertionPosition,
}

/// A regret-k insertion heuristic. On every step the unassigned job with the largest
/// regret (the sum of differences between its k next best and its best insertion costs
/// across routes) is inserted at its best feasible position. Pickup-delivery pairs are
/// inserted jointly, both positions chosen in one step.
pub struct RegretInsertion {
    regret: usize,
    seed: SeedStrategy,
}

impl RegretInsertion {
    /// Creates a new instance of `RegretInsertion` with given regret depth.
    pub fn new(regret: usize, seed: SeedStrategy) -> Self {
        assert!(regret > 0);
        Self { regret, seed }
    }

    /// Builds routes for all vehicles and returns them with the ranks of jobs which
    /// could not be assigned anywhere.
    pub fn build<R: RouteMut>(&self, problem: &Problem) -> (Vec<R>, Vec<usize>) {
        let mut routes: Vec<R> =
            (0..problem.vehicles.len()).map(|vehicle| R::new_route(vehicle, problem)).collect();

        // units are job ranks, pairs are represented by their pickup
        let mut pool: Vec<usize> = (0..problem.jobs.len())
            .filter(|&rank| problem.jobs[rank].job_type != JobType::Delivery)
            .collect();

        if self.seed == SeedStrategy::NearestFromStart {
            seed_nearest_from_start(problem, &mut routes, &mut pool);
        }

        loop {
            let mut chosen: Option<(Cost, usize, InsertionCandidate)> = None;

            for (pool_idx, &unit) in pool.iter().enumerate() {
                let mut bests: Vec<InsertionCandidate> = routes
                    .iter()
                    .enumerate()
                    .filter_map(|(vehicle, route)| best_insertion(problem, route, vehicle, unit))
                    .collect();
                if bests.is_empty() {
                    continue;
                }

                bests.sort_by(|left, right| left.cost.cmp(&right.cost).then(left.vehicle.cmp(&right.vehicle)));
                let best_cost = bests[0].cost;
                let regret: Cost =
                    bests.iter().skip(1).take(self.regret - 1).map(|candidate| candidate.cost - best_cost).sum();

                // pool is sorted by job rank, strict comparison keeps the lowest rank on ties
                if chosen.as_ref().map_or(true, |(max_regret, _, _)| regret > *max_regret) {
                    chosen = Some((regret, pool_idx, bests.swap_remove(0)));
                }
            }

            match chosen {
                Some((_, pool_idx, candidate)) => {
                    let unit = pool.remove(pool_idx);
                    apply_insertion(problem, &mut routes[candidate.vehicle], unit, candidate.position);
                }
                None => break,
            }
        }

        let unassigned = pool
            .into_iter()
            .flat_map(|unit| match problem.jobs[unit].job_type {
                JobType::Pickup => vec![unit, unit + 1],
                _ => vec![unit],
            })
            .collect();

        (routes, unassigned)
    }
}

fn apply_insertion<R: RouteMut>(problem: &Problem, route: &mut R, unit: usize, position: InsertionPosition) {
    match position {
        InsertionPosition::Single { rank } => route.replace(problem, rank, rank, &[unit]),
        InsertionPosition::Pair { first, last, span } => route.replace(problem, first, last, &span),
    }
}

/// Finds the cheapest feasible insertion of a unit into one route, ties resolved by the
/// lowest position.
fn best_insertion<R: RouteMut>(
    problem: &Problem,
    route: &R,
    vehicle: usize,
    unit: usize,
) -> Option<InsertionCandidate> {
    match problem.jobs[unit].job_type {
        JobType::Pickup => best_pair_insertion(problem, route, vehicle, unit),
        _ => best_single_insertion(problem, route, vehicle, unit),
    }
}

fn best_single_insertion<R: RouteMut>(
    problem: &Problem,
    route: &R,
    vehicle: usize,
    unit: usize,
) -> Option<InsertionCandidate> {
    if !problem.vehicle_ok_with_job(vehicle, unit) {
        return None;
    }

    let job = &problem.jobs[unit];
    let mut best: Option<(Cost, usize)> = None;

    for rank in 0..=route.raw().jobs.len() {
        let cost = add_cost_node(problem, route.raw(), job.location, rank);
        if best.map_or(false, |(best_cost, _)| best_cost <= cost) {
            continue;
        }

        let feasible = route.raw().is_valid_addition_for_capacity(problem, &job.pickup, &job.delivery, rank)
            && route.is_valid_replacement(problem, rank, rank, &[unit]);
        if feasible {
            best = Some((cost, rank));
        }
    }

    best.map(|(cost, rank)| InsertionCandidate { cost, vehicle, position: InsertionPosition::Single { rank } })
}

fn best_pair_insertion<R: RouteMut>(
    problem: &Problem,
    route: &R,
    vehicle: usize,
    pickup: usize,
) -> Option<InsertionCandidate> {
    let delivery = pickup + 1;
    if !problem.vehicle_ok_with_jobs_range(vehicle, pickup, delivery) {
        return None;
    }

    let pickup_location = problem.jobs[pickup].location;
    let delivery_location = problem.jobs[delivery].location;
    let jobs = &route.raw().jobs;
    let mut best: Option<(Cost, usize, usize, Vec<usize>)> = None;

    for p_rank in 0..=jobs.len() {
        for d_rank in p_rank..=jobs.len() {
            let cost = if p_rank == d_rank {
                add_cost_edge(problem, route.raw(), pickup_location, delivery_location, p_rank)
            } else {
                add_cost_node(problem, route.raw(), pickup_location, p_rank)
                    + add_cost_node(problem, route.raw(), delivery_location, d_rank)
            };
            if best.as_ref().map_or(false, |(best_cost, _, _, _)| *best_cost <= cost) {
                continue;
            }

            // jobs between the chosen positions end up framed by the pair
            let mut span = Vec::with_capacity(d_rank - p_rank + 2);
            span.push(pickup);
            span.extend_from_slice(&jobs[p_rank..d_rank]);
            span.push(delivery);

            let feasible = route.raw().is_valid_range_content(problem, p_rank, d_rank, &span)
                && route.is_valid_replacement(problem, p_rank, d_rank, &span);
            if feasible {
                best = Some((cost, p_rank, d_rank, span));
            }
        }
    }

    best.map(|(cost, first, last, span)| InsertionCandidate {
        cost,
        vehicle,
        position: InsertionPosition::Pair { first, last, span },
    })
}

/// Seeds every route owning a start location with the unassigned unit nearest to it.
fn seed_nearest_from_start<R: RouteMut>(problem: &Problem, routes: &mut [R], pool: &mut Vec<usize>) {
    for vehicle in 0..routes.len() {
        let start = match problem.vehicles[vehicle].start {
            Some(start) => start,
            None => continue,
        };

        let nearest = pool
            .iter()
            .enumerate()
            .map(|(pool_idx, &unit)| (problem.matrix.cost(start, problem.jobs[unit].location), pool_idx))
            .min_by_key(|&(cost, pool_idx)| (cost, pool_idx))
            .map(|(_, pool_idx)| pool_idx);

        let candidate = nearest.and_then(|pool_idx| {
            best_insertion(problem, &routes[vehicle], vehicle, pool[pool_idx])
                .map(|candidate| (pool_idx, candidate))
        });

        if let Some((pool_idx, candidate)) = candidate {
            let unit = pool.remove(pool_idx);
            apply_insertion(problem, &mut routes[vehicle], unit, candidate.position);
        }
    }
}
