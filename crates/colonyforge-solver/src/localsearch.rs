//! Local search adapter.
//!
//! Conditionally invokes the external local-search hook on the ants'
//! tours at scheduled iterations. The hook is applied to every ant's
//! tour (never a subset), keeping elite ranking and global-best
//! comparison fair. Structurally invalid hook output is discarded with
//! a warning and the pre-hook tour is kept.

use colonyforge_core::{DistanceMatrix, Tour};
use tracing::warn;

use crate::hooks::LocalSearch;

/// True when the hook should fire at this iteration.
pub fn scheduled(steps: &[u64], iteration: u64) -> bool {
    steps.contains(&iteration)
}

/// Applies the hook to every tour in place, passing the pre-refinement
/// tour as the initial-tour hint.
pub fn refine_all<L: LocalSearch>(hook: &L, tours: &mut [Tour], distances: &DistanceMatrix) {
    let n = distances.len();
    for (ant, tour) in tours.iter_mut().enumerate() {
        let refined = hook.refine(tour, tour, distances);
        if refined.is_permutation_of(n) && refined.length().is_finite() {
            *tour = refined;
        } else {
            warn!(ant, "local search returned an invalid tour; keeping the original");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> DistanceMatrix {
        DistanceMatrix::from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]).unwrap()
    }

    #[test]
    fn schedule_is_membership_based() {
        assert!(scheduled(&[2, 5], 5));
        assert!(!scheduled(&[2, 5], 3));
        assert!(!scheduled(&[], 1));
    }

    #[test]
    fn valid_refinement_replaces_every_tour() {
        let distances = square();
        let optimal = Tour::new(vec![0, 1, 2, 3], &distances);
        let hook = {
            let optimal = optimal.clone();
            move |_: &Tour, _: &Tour, _: &DistanceMatrix| optimal.clone()
        };

        let mut tours = vec![
            Tour::new(vec![0, 2, 1, 3], &distances),
            Tour::new(vec![1, 3, 0, 2], &distances),
        ];
        refine_all(&hook, &mut tours, &distances);
        assert!(tours.iter().all(|t| *t == optimal));
    }

    #[test]
    fn invalid_refinement_keeps_the_original() {
        let distances = square();
        // Duplicate node: not a permutation.
        let hook = |_: &Tour, _: &Tour, d: &DistanceMatrix| Tour::new(vec![0, 0, 1, 2], d);

        let original = Tour::new(vec![0, 2, 1, 3], &distances);
        let mut tours = vec![original.clone()];
        refine_all(&hook, &mut tours, &distances);
        assert_eq!(tours[0], original);
    }

    #[test]
    fn hint_is_the_pre_refinement_tour() {
        let distances = square();
        let hook = |tour: &Tour, initial: &Tour, _: &DistanceMatrix| {
            assert_eq!(tour, initial);
            tour.clone()
        };
        let mut tours = vec![Tour::new(vec![3, 1, 0, 2], &distances)];
        refine_all(&hook, &mut tours, &distances);
    }
}
