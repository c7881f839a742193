//! Contains the local search driver and its neighborhood operators.

pub mod local;

mod local_search;
pub use self::local_search::LocalSearch;
