//! Contains constructive heuristics which build an initial feasible solution.

pub mod heuristics;
