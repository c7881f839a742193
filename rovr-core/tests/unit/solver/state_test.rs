use super::*;
use crate::helpers::models::*;
use proptest::prelude::*;

fn asymmetric_problem() -> Problem {
    create_asymmetric_problem()
}

#[test]
fn can_compute_route_costs() {
    let problem = asymmetric_problem();
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1], &problem), RawRoute::with_jobs(1, vec![2], &problem)];

    let state = SolutionState::new(&problem, &routes);

    // 0->1->2->0 and 0->3->0
    assert_eq!(state.route_costs, vec![2 + 6 + 15, 10 + 6]);
    assert_eq!(state.total_cost(), 39);
}

#[test]
fn node_gains_match_exact_removal_delta() {
    let problem = asymmetric_problem();
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1, 2], &problem), RawRoute::new(1, &problem)];
    let state = SolutionState::new(&problem, &routes);

    for rank in 0..3 {
        let mut reduced = routes[0].clone();
        reduced.replace(&problem, rank, rank + 1, &[]);

        let expected = route_cost(&problem, &routes[0]) - route_cost(&problem, &reduced);
        assert_eq!(state.node_gains[0][rank], expected, "node gain mismatch at rank {rank}");
    }
}

#[test]
fn edge_gains_match_exact_removal_delta() {
    let problem = asymmetric_problem();
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1, 2], &problem), RawRoute::new(1, &problem)];
    let state = SolutionState::new(&problem, &routes);

    for rank in 0..2 {
        let mut reduced = routes[0].clone();
        reduced.replace(&problem, rank, rank + 2, &[]);

        // the internal edge travels with the removed pair
        let internal = problem
            .matrix
            .cost(problem.jobs[routes[0].jobs[rank]].location, problem.jobs[routes[0].jobs[rank + 1]].location);
        let expected = route_cost(&problem, &routes[0]) - route_cost(&problem, &reduced) - internal;
        assert_eq!(state.edge_gains[0][rank], expected, "edge gain mismatch at rank {rank}");
    }
}

#[test]
fn can_compute_skill_prefix_unions() {
    let mut jobs = vec![create_single(1, 1, 1), create_single(2, 2, 1)];
    jobs[0].skills.insert(1);
    jobs[1].skills.insert(2);
    let mut vehicle = create_vehicle(1, 10);
    vehicle.skills.extend([1, 2]);
    let problem = create_problem(vec![vehicle], jobs, 3);
    let routes = vec![RawRoute::with_jobs(0, vec![0, 1], &problem)];

    let state = SolutionState::new(&problem, &routes);

    let skills = |tags: &[u32]| tags.iter().copied().collect::<Skills>();
    assert_eq!(state.fwd_skills[0][0], skills(&[1]));
    assert_eq!(state.fwd_skills[0][1], skills(&[1, 2]));
    assert_eq!(state.bwd_skills[0][0], skills(&[1, 2]));
    assert_eq!(state.bwd_skills[0][1], skills(&[2]));
    assert!(state.bwd_skills[0][2].is_empty());
}

proptest! {
    // derived state refreshed incrementally never drifts from a fresh recomputation
    #[test]
    fn refresh_equals_fresh_recomputation(order in Just(vec![0_usize, 1, 2]).prop_shuffle(), split in 0_usize..3) {
        let problem = asymmetric_problem();
        let mut routes = vec![
            RawRoute::with_jobs(0, order[..split].to_vec(), &problem),
            RawRoute::with_jobs(1, order[split..].to_vec(), &problem),
        ];
        let mut state = SolutionState::new(&problem, &routes);

        // move the first job of the fuller route to the other one
        let (from, to) = if routes[0].jobs.len() >= routes[1].jobs.len() { (0, 1) } else { (1, 0) };
        if !routes[from].jobs.is_empty() {
            let job = routes[from].jobs[0];
            routes[from].replace(&problem, 0, 1, &[]);
            let insert_at = routes[to].jobs.len();
            routes[to].replace(&problem, insert_at, insert_at, &[job]);
            state.refresh(&problem, &routes, vec![from, to]);
        }

        prop_assert_eq!(state, SolutionState::new(&problem, &routes));
    }
}
