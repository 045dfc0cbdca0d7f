//! Stochastic tour construction.
//!
//! Each ant builds one tour by repeated probabilistic next-node
//! selection: the transition weight from `i` to an unvisited `j` is
//! `tau(i, j)^alpha * (att_factor / d(i, j))^beta`, normalized over the
//! unvisited set via roulette-wheel sampling. Two overrides apply per
//! step:
//! - with probability `prp_prob` a perturbation step picks the next
//!   node uniformly at random, bypassing the pheromone-weighted rule;
//! - if every weight underflows to zero (degenerate pheromone/heuristic
//!   combination), selection falls back to a uniform choice.

use colonyforge_core::{DistanceMatrix, PheromoneMatrix, Tour};
use rand::Rng;
use tracing::warn;

use crate::hooks::LocalPheromoneUpdate;

/// Transition-rule parameters, copied out of the validated config.
#[derive(Debug, Clone, Copy)]
pub struct TransitionParams {
    pub alpha: f64,
    pub beta: f64,
    pub att_factor: f64,
    pub prp_prob: f64,
}

/// Heuristic desirability of a zero-length edge.
const ZERO_DISTANCE_DESIRABILITY: f64 = 1e6;

/// Builds one complete tour against a read-only pheromone matrix.
pub fn construct_tour<R: Rng>(
    rng: &mut R,
    params: TransitionParams,
    distances: &DistanceMatrix,
    pheromone: &PheromoneMatrix,
) -> Tour {
    let n = distances.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let start = rng.random_range(0..n);
    visited[start] = true;
    order.push(start);

    let mut current = start;
    for _ in 1..n {
        let next = select_next(rng, params, distances, pheromone, current, &visited);
        visited[next] = true;
        order.push(next);
        current = next;
    }

    Tour::new(order, distances)
}

/// Builds one tour while threading the exclusive pheromone handle
/// through the per-step local update hook.
pub fn construct_tour_with_hook<R: Rng, U: LocalPheromoneUpdate>(
    rng: &mut R,
    params: TransitionParams,
    distances: &DistanceMatrix,
    pheromone: &mut PheromoneMatrix,
    hook: &U,
) -> Tour {
    let n = distances.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let start = rng.random_range(0..n);
    visited[start] = true;
    order.push(start);

    let mut current = start;
    for _ in 1..n {
        let next = select_next(rng, params, distances, pheromone, current, &visited);
        visited[next] = true;
        order.push(next);
        current = next;

        let updated = hook.update(pheromone);
        if pheromone.same_shape(&updated) {
            *pheromone = updated;
        } else {
            warn!(
                expected = pheromone.len(),
                got = updated.len(),
                "local pheromone update returned a wrong-shaped matrix; keeping previous model"
            );
        }
    }

    Tour::new(order, distances)
}

/// Picks the next node from `current` among the unvisited ones.
fn select_next<R: Rng>(
    rng: &mut R,
    params: TransitionParams,
    distances: &DistanceMatrix,
    pheromone: &PheromoneMatrix,
    current: usize,
    visited: &[bool],
) -> usize {
    let candidates: Vec<usize> = (0..visited.len()).filter(|&j| !visited[j]).collect();
    debug_assert!(!candidates.is_empty());

    // Perturbation step: evaluated independently per step, not per ant.
    if params.prp_prob > 0.0 && rng.random::<f64>() < params.prp_prob {
        return candidates[rng.random_range(0..candidates.len())];
    }

    let weights: Vec<f64> = candidates
        .iter()
        .map(|&j| transition_weight(params, distances, pheromone, current, j))
        .collect();
    let total: f64 = weights.iter().sum();

    if total <= 0.0 || !total.is_finite() {
        // Degenerate weights: uniform fallback, never an error.
        return candidates[rng.random_range(0..candidates.len())];
    }

    let mut pick = rng.random::<f64>() * total;
    for (&j, &weight) in candidates.iter().zip(&weights) {
        pick -= weight;
        if pick <= 0.0 {
            return j;
        }
    }
    candidates[candidates.len() - 1]
}

#[inline]
fn transition_weight(
    params: TransitionParams,
    distances: &DistanceMatrix,
    pheromone: &PheromoneMatrix,
    i: usize,
    j: usize,
) -> f64 {
    let d = distances.distance(i, j);
    let eta = if d > 0.0 {
        params.att_factor / d
    } else {
        ZERO_DISTANCE_DESIRABILITY
    };
    pheromone.get(i, j).powf(params.alpha) * eta.powf(params.beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params() -> TransitionParams {
        TransitionParams {
            alpha: 1.0,
            beta: 2.0,
            att_factor: 1.0,
            prp_prob: 0.0,
        }
    }

    fn square() -> DistanceMatrix {
        DistanceMatrix::from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]).unwrap()
    }

    #[test]
    fn constructed_tour_is_a_permutation() {
        let distances = square();
        let pheromone = PheromoneMatrix::uniform(4, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..20 {
            let tour = construct_tour(&mut rng, params(), &distances, &pheromone);
            assert!(tour.is_permutation_of(4));
            assert!(tour.length().is_finite());
        }
    }

    #[test]
    fn full_perturbation_still_yields_permutations() {
        let distances = square();
        let pheromone = PheromoneMatrix::uniform(4, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let params = TransitionParams {
            prp_prob: 1.0,
            ..params()
        };

        for _ in 0..20 {
            let tour = construct_tour(&mut rng, params, &distances, &pheromone);
            assert!(tour.is_permutation_of(4));
        }
    }

    #[test]
    fn zero_pheromone_falls_back_to_uniform_choice() {
        let distances = square();
        // alpha > 0 with an all-zero matrix drives every weight to zero.
        let pheromone = PheromoneMatrix::uniform(4, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let tour = construct_tour(&mut rng, params(), &distances, &pheromone);
        assert!(tour.is_permutation_of(4));
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let distances = square();
        let pheromone = PheromoneMatrix::uniform(4, 0.5);

        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        let ta = construct_tour(&mut a, params(), &distances, &pheromone);
        let tb = construct_tour(&mut b, params(), &distances, &pheromone);
        assert_eq!(ta, tb);
    }

    #[test]
    fn hook_runs_once_per_step() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let distances = square();
        let mut pheromone = PheromoneMatrix::uniform(4, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let calls = AtomicUsize::new(0);
        let hook = |pher: &PheromoneMatrix| {
            calls.fetch_add(1, Ordering::SeqCst);
            let mut next = pher.clone();
            next.evaporate(0.5);
            next
        };

        let tour =
            construct_tour_with_hook(&mut rng, params(), &distances, &mut pheromone, &hook);
        assert!(tour.is_permutation_of(4));
        // One call per selection step; the start node is not a step.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(pheromone.get(0, 1) < 0.5);
    }

    #[test]
    fn wrong_shaped_hook_output_is_discarded() {
        let distances = square();
        let mut pheromone = PheromoneMatrix::uniform(4, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let hook = |_: &PheromoneMatrix| PheromoneMatrix::uniform(3, 1.0);
        construct_tour_with_hook(&mut rng, params(), &distances, &mut pheromone, &hook);
        assert_eq!(pheromone.len(), 4);
        assert_eq!(pheromone.get(0, 1), 0.5);
    }
}
