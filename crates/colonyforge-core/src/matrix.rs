//! Distance and pheromone matrices.
//!
//! Both matrices are stored row-major in a flat buffer. The distance
//! matrix is validated once and read-only afterwards; the pheromone
//! matrix is mutated every iteration through [`PheromoneMatrix::evaporate`],
//! [`PheromoneMatrix::deposit`] and [`PheromoneMatrix::clamp`].

use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

/// Immutable symmetric cost matrix over a fixed node set.
///
/// # Example
///
/// ```
/// use colonyforge_core::DistanceMatrix;
///
/// let dist = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 1.5],
///     vec![2.0, 1.5, 0.0],
/// ]).unwrap();
///
/// assert_eq!(dist.len(), 3);
/// assert_eq!(dist.distance(0, 2), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds a distance matrix from nested rows, validating shape,
    /// symmetry, non-negativity and a zero diagonal.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let n = rows.len();
        if n < 2 {
            return Err(MatrixError::TooSmall(n));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(MatrixError::NotSquare {
                    rows: n,
                    cols: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(MatrixError::InvalidEntry { i, j, value });
                }
            }
            if rows[i][i] != 0.0 {
                return Err(MatrixError::NonzeroDiagonal {
                    i,
                    value: rows[i][i],
                });
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if rows[i][j] != rows[j][i] {
                    return Err(MatrixError::NotSymmetric {
                        i,
                        j,
                        a: rows[i][j],
                        b: rows[j][i],
                    });
                }
            }
        }
        let data = rows.into_iter().flatten().collect();
        Ok(Self { n, data })
    }

    /// Builds a Euclidean distance matrix from 2D coordinates.
    pub fn from_coords(coords: &[(f64, f64)]) -> Result<Self, MatrixError> {
        let n = coords.len();
        let mut rows = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                let dx = coords[i].0 - coords[j].0;
                let dy = coords[i].1 - coords[j].1;
                rows[i][j] = (dx * dx + dy * dy).sqrt();
            }
        }
        Self::from_rows(rows)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false; construction rejects empty matrices.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Cost of the edge `(i, j)`.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }
}

/// Shared pheromone concentration matrix.
///
/// Kept symmetric by construction: [`PheromoneMatrix::deposit`] writes
/// both `(i, j)` and `(j, i)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PheromoneMatrix {
    n: usize,
    data: Vec<f64>,
}

impl PheromoneMatrix {
    /// Creates an `n`x`n` matrix with every entry set to `initial`.
    pub fn uniform(n: usize, initial: f64) -> Self {
        Self {
            n,
            data: vec![initial; n * n],
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.n
    }

    /// True when the matrix covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Concentration on the edge `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Adds `amount` to both `(i, j)` and `(j, i)`.
    #[inline]
    pub fn deposit(&mut self, i: usize, j: usize, amount: f64) {
        self.data[i * self.n + j] += amount;
        self.data[j * self.n + i] += amount;
    }

    /// Multiplies every entry by `1 - rho`.
    pub fn evaporate(&mut self, rho: f64) {
        let keep = 1.0 - rho;
        for entry in &mut self.data {
            *entry *= keep;
        }
    }

    /// Clamps every entry into `[min, max]`.
    pub fn clamp(&mut self, min: f64, max: f64) {
        for entry in &mut self.data {
            *entry = entry.clamp(min, max);
        }
    }

    /// True when `other` has the same shape. Used to validate the output
    /// of a local pheromone-update hook before adopting it.
    pub fn same_shape(&self, other: &PheromoneMatrix) -> bool {
        self.n == other.n && self.data.len() == other.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_accepts_valid_matrix() {
        let dist = DistanceMatrix::from_rows(vec![
            vec![0.0, 3.0],
            vec![3.0, 0.0],
        ])
        .unwrap();
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.distance(1, 0), 3.0);
    }

    #[test]
    fn from_rows_rejects_asymmetric_matrix() {
        let err = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0],
            vec![2.0, 0.0],
        ])
        .unwrap_err();
        assert!(matches!(err, MatrixError::NotSymmetric { i: 0, j: 1, .. }));
    }

    #[test]
    fn from_rows_rejects_ragged_matrix() {
        let err = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, MatrixError::NotSquare { rows: 2, cols: 1 }));
    }

    #[test]
    fn from_rows_rejects_negative_entry() {
        let err = DistanceMatrix::from_rows(vec![
            vec![0.0, -1.0],
            vec![-1.0, 0.0],
        ])
        .unwrap_err();
        assert!(matches!(err, MatrixError::InvalidEntry { .. }));
    }

    #[test]
    fn from_rows_rejects_nonzero_diagonal() {
        let err = DistanceMatrix::from_rows(vec![
            vec![1.0, 2.0],
            vec![2.0, 0.0],
        ])
        .unwrap_err();
        assert!(matches!(err, MatrixError::NonzeroDiagonal { i: 0, .. }));
    }

    #[test]
    fn from_coords_is_symmetric_with_zero_diagonal() {
        let dist = DistanceMatrix::from_coords(&[(0.0, 0.0), (3.0, 4.0), (6.0, 0.0)]).unwrap();
        assert_eq!(dist.distance(0, 1), 5.0);
        assert_eq!(dist.distance(1, 0), 5.0);
        assert_eq!(dist.distance(2, 2), 0.0);
    }

    #[test]
    fn deposit_is_symmetric() {
        let mut pher = PheromoneMatrix::uniform(3, 0.5);
        pher.deposit(0, 2, 0.25);
        assert_eq!(pher.get(0, 2), 0.75);
        assert_eq!(pher.get(2, 0), 0.75);
        assert_eq!(pher.get(0, 1), 0.5);
    }

    #[test]
    fn evaporate_scales_all_entries() {
        let mut pher = PheromoneMatrix::uniform(2, 1.0);
        pher.evaporate(0.1);
        assert!((pher.get(0, 1) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn evaporate_with_zero_rho_is_identity() {
        let mut pher = PheromoneMatrix::uniform(2, 0.7);
        let before = pher.clone();
        pher.evaporate(0.0);
        assert_eq!(pher, before);
    }

    #[test]
    fn clamp_enforces_bounds() {
        let mut pher = PheromoneMatrix::uniform(2, 5.0);
        pher.deposit(0, 1, 100.0);
        pher.clamp(1.0, 10.0);
        assert_eq!(pher.get(0, 1), 10.0);
        assert_eq!(pher.get(0, 0), 5.0);
    }
}
