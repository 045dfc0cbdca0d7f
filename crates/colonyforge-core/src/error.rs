//! Error types for the core problem model.

use thiserror::Error;

/// Errors raised while constructing a distance matrix.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// Row count and column count disagree.
    #[error("matrix is not square: {rows} rows, {cols} columns")]
    NotSquare { rows: usize, cols: usize },

    /// An off-diagonal pair disagrees.
    #[error("matrix is not symmetric at ({i}, {j}): {a} != {b}")]
    NotSymmetric { i: usize, j: usize, a: f64, b: f64 },

    /// A cost entry is negative or non-finite.
    #[error("invalid distance {value} at ({i}, {j})")]
    InvalidEntry { i: usize, j: usize, value: f64 },

    /// A diagonal entry is not zero.
    #[error("nonzero diagonal entry {value} at ({i}, {i})")]
    NonzeroDiagonal { i: usize, value: f64 },

    /// Fewer than two nodes.
    #[error("distance matrix needs at least 2 nodes, got {0}")]
    TooSmall(usize),
}
