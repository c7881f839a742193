//! A dense travel cost matrix over problem locations.

#[cfg(test)]
#[path = "../../tests/unit/models/matrix_test.rs"]
mod matrix_test;

use crate::models::common::{Cost, Duration, Location};
use crate::utils::{SolverError, SolverResult};

/// A dense square matrix of non-negative travel costs with constant time access.
#[derive(Clone, Debug)]
pub struct CostMatrix {
    size: usize,
    data: Vec<u32>,
}

impl CostMatrix {
    /// Creates a new instance of `CostMatrix` from a row-major layout.
    pub fn new(size: usize, data: Vec<u32>) -> SolverResult<Self> {
        if data.len() != size * size {
            return Err(SolverError::input(format!(
                "matrix data size {} does not match dimension {size}x{size}",
                data.len()
            )));
        }

        Ok(Self { size, data })
    }

    /// Creates a matrix from nested rows, checking squareness.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> SolverResult<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return Err(SolverError::input("input matrix is not square"));
        }

        Self::new(size, rows.into_iter().flatten().collect())
    }

    /// Returns matrix dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns raw matrix value between two locations.
    pub fn at(&self, from: Location, to: Location) -> u32 {
        self.data[from * self.size + to]
    }

    /// Returns travel cost between two locations.
    pub fn cost(&self, from: Location, to: Location) -> Cost {
        Cost::from(self.at(from, to))
    }

    /// Returns travel duration between two locations.
    pub fn duration(&self, from: Location, to: Location) -> Duration {
        Duration::from(self.at(from, to))
    }

    /// Returns the principal sub-matrix over given indices keeping their order.
    pub fn sub_matrix(&self, indices: &[Location]) -> CostMatrix {
        let size = indices.len();
        let mut data = Vec::with_capacity(size * size);

        for &from in indices {
            for &to in indices {
                data.push(self.at(from, to));
            }
        }

        CostMatrix { size, data }
    }
}
