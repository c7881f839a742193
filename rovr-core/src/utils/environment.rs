//! Contains environment specific logic.

use crate::utils::Timer;
use std::sync::Arc;

/// A logger type which is called with various information.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Specifies a computational quota for executions. The main purpose is to allow to stop
/// the algorithm in reaction to external events such as user cancellation or a timer.
pub trait Quota: Send + Sync {
    /// Returns true when computation should be stopped.
    fn is_reached(&self) -> bool;
}

/// Keeps track of environment specific information which influences algorithm behavior.
#[derive(Clone)]
pub struct Environment {
    /// A global execution quota.
    pub quota: Option<Arc<dyn Quota + Send + Sync>>,

    /// Keeps data parallelism settings.
    pub parallelism: Parallelism,

    /// An information logger.
    pub logger: InfoLogger,
}

impl Environment {
    /// Creates an instance of `Environment`.
    pub fn new(quota: Option<Arc<dyn Quota + Send + Sync>>, parallelism: Parallelism, logger: InfoLogger) -> Self {
        Self { quota, parallelism, logger }
    }

    /// Creates an instance of `Environment` using optional time quota and defaults.
    pub fn new_with_time_quota(max_time: Option<usize>) -> Self {
        Self {
            quota: max_time.map::<Arc<dyn Quota + Send + Sync>, _>(|time| Arc::new(TimeQuota::new(time as f64))),
            ..Self::default()
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new(None, Parallelism::default(), Arc::new(|msg| eprintln!("{msg}")))
    }
}

/// A time quota.
pub struct TimeQuota {
    start: Timer,
    limit_in_secs: f64,
}

impl TimeQuota {
    /// Creates a new instance of `TimeQuota`.
    pub fn new(limit_in_secs: f64) -> Self {
        Self { start: Timer::start(), limit_in_secs }
    }
}

impl Quota for TimeQuota {
    fn is_reached(&self) -> bool {
        self.start.elapsed_secs_as_f64() > self.limit_in_secs
    }
}

/// Specifies data parallelism settings.
#[derive(Clone)]
pub struct Parallelism {
    available_cpus: usize,
}

impl Default for Parallelism {
    fn default() -> Self {
        Self { available_cpus: get_cpus() }
    }
}

impl Parallelism {
    /// Creates an instance of `Parallelism` using available cpus as given.
    pub fn new_with_cpus(available_cpus: usize) -> Self {
        Self { available_cpus: available_cpus.max(1) }
    }

    /// Amount of total available CPUs.
    pub fn available_cpus(&self) -> usize {
        self.available_cpus
    }
}

fn get_cpus() -> usize {
    std::thread::available_parallelism().map_or(1, |value| value.get())
}
