//! Tours over the node set.

use crate::matrix::DistanceMatrix;

/// A Hamiltonian cycle with its cached closed-tour length.
///
/// The order holds each node exactly once; the length includes the
/// closing edge back to the start node. Tours are value objects and
/// carry no identity beyond the ant and iteration that produced them.
///
/// # Example
///
/// ```
/// use colonyforge_core::{DistanceMatrix, Tour};
///
/// let dist = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 1.0],
///     vec![2.0, 1.0, 0.0],
/// ]).unwrap();
///
/// let tour = Tour::new(vec![0, 1, 2], &dist);
/// assert_eq!(tour.length(), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    order: Vec<usize>,
    length: f64,
}

impl Tour {
    /// Creates a tour from a visiting order, computing its length
    /// against the given distances.
    pub fn new(order: Vec<usize>, distances: &DistanceMatrix) -> Self {
        let length = cycle_length(&order, distances);
        Self { order, length }
    }

    /// The visiting order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Closed-cycle length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of visited nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True for the degenerate empty tour.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consecutive edges of the closed cycle, including the return edge.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.order.len();
        (0..n).map(move |i| (self.order[i], self.order[(i + 1) % n]))
    }

    /// True when the tour visits each of `0..n` exactly once.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.order.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &node in &self.order {
            if node >= n || seen[node] {
                return false;
            }
            seen[node] = true;
        }
        true
    }
}

fn cycle_length(order: &[usize], distances: &DistanceMatrix) -> f64 {
    let n = order.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| distances.distance(order[i], order[(i + 1) % n]))
        .sum()
}
