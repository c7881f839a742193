//! Common primitives shared by problem and solution models.

#[cfg(test)]
#[path = "../../../tests/unit/models/common/common_test.rs"]
mod common_test;

use hashbrown::HashSet;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Specifies location type: an index into the cost matrix.
pub type Location = usize;

/// Specifies cost value.
pub type Cost = i64;

/// Specifies duration in abstract time units.
pub type Duration = u64;

/// Specifies timestamp in abstract time units.
pub type Timestamp = u64;

/// Specifies job priority.
pub type Priority = u32;

/// Specifies a set of skill tags.
pub type Skills = HashSet<u32>;

/// Represents a time window with inclusive bounds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeWindow {
    /// Start of time window.
    pub start: Timestamp,
    /// End of time window.
    pub end: Timestamp,
}

impl TimeWindow {
    /// Creates a new [`TimeWindow`].
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Returns unlimited time window.
    pub fn max() -> Self {
        Self { start: 0, end: Timestamp::MAX }
    }

    /// Checks whether this time window is the universal default one.
    pub fn is_default(&self) -> bool {
        self.start == 0 && self.end == Timestamp::MAX
    }

    /// Checks whether time window has intersection with another one (inclusive).
    pub fn intersects(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Checks whether time window contains given time.
    pub fn contains(&self, time: Timestamp) -> bool {
        self.start <= time && time <= self.end
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::max()
    }
}

/// Represents a multi-dimensional amount used for vehicle capacities and job demands.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Amount(Vec<i64>);

impl Amount {
    /// Creates a new instance of `Amount` from raw components.
    pub fn new(components: Vec<i64>) -> Self {
        Self(components)
    }

    /// Creates an origin amount of given dimensionality.
    pub fn zero(dimension: usize) -> Self {
        Self(vec![0; dimension])
    }

    /// Returns amount dimensionality.
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Returns raw components.
    pub fn components(&self) -> &[i64] {
        &self.0
    }

    /// Checks whether each component fits within given capacity.
    pub fn fits_within(&self, capacity: &Amount) -> bool {
        debug_assert_eq!(self.0.len(), capacity.0.len());
        self.0.iter().zip(capacity.0.iter()).all(|(component, limit)| component <= limit)
    }

    /// Returns componentwise maximum of two amounts.
    pub fn max_components(&self, other: &Amount) -> Amount {
        debug_assert_eq!(self.0.len(), other.0.len());
        Amount(self.0.iter().zip(other.0.iter()).map(|(left, right)| *left.max(right)).collect())
    }
}

impl Add for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Self::Output {
        debug_assert_eq!(self.0.len(), rhs.0.len());
        Amount(self.0.iter().zip(rhs.0.iter()).map(|(left, right)| left + right).collect())
    }
}

impl Sub for &Amount {
    type Output = Amount;

    fn sub(self, rhs: &Amount) -> Self::Output {
        debug_assert_eq!(self.0.len(), rhs.0.len());
        Amount(self.0.iter().zip(rhs.0.iter()).map(|(left, right)| left - right).collect())
    }
}

impl AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, rhs: &Amount) {
        debug_assert_eq!(self.0.len(), rhs.0.len());
        self.0.iter_mut().zip(rhs.0.iter()).for_each(|(component, delta)| *component += delta);
    }
}

impl SubAssign<&Amount> for Amount {
    fn sub_assign(&mut self, rhs: &Amount) {
        debug_assert_eq!(self.0.len(), rhs.0.len());
        self.0.iter_mut().zip(rhs.0.iter()).for_each(|(component, delta)| *component -= delta);
    }
}
