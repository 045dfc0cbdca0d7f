//! End-of-iteration pheromone update.
//!
//! Evaporation, deposit from the contributing tours selected by the
//! [`DepositPolicy`], then clamping into the configured bounds. The
//! deposit amount per edge is `1 / length` (unit Q constant), written
//! symmetrically.

use std::cmp::Ordering;

use colonyforge_config::DepositPolicy;
use colonyforge_core::{PheromoneMatrix, Tour};

/// Update-step parameters, copied out of the validated config.
#[derive(Debug, Clone, Copy)]
pub struct UpdateParams {
    pub rho: f64,
    pub n_elite: usize,
    pub min_pher_conc: f64,
    pub max_pher_conc: f64,
    pub policy: DepositPolicy,
}

/// Index of the iteration-best tour: strictly shortest length, ties
/// broken by lowest ant index for reproducibility.
pub fn iteration_best(tours: &[Tour]) -> Option<usize> {
    tours
        .iter()
        .enumerate()
        .min_by(|(ai, a), (bi, b)| {
            a.length()
                .partial_cmp(&b.length())
                .unwrap_or(Ordering::Equal)
                .then(ai.cmp(bi))
        })
        .map(|(i, _)| i)
}

/// Ant indices ranked by tour length (ascending), ties by ant index.
fn ranked_indices(tours: &[Tour]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..tours.len()).collect();
    indices.sort_by(|&a, &b| {
        tours[a]
            .length()
            .partial_cmp(&tours[b].length())
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    indices
}

/// Runs the full update step: evaporate, deposit, clamp.
pub fn apply(
    pheromone: &mut PheromoneMatrix,
    params: UpdateParams,
    tours: &[Tour],
    global_best: Option<&Tour>,
) {
    pheromone.evaporate(params.rho);

    if params.policy.uses_iteration_tours() && !tours.is_empty() {
        let count = match params.policy {
            DepositPolicy::SingleBest | DepositPolicy::SingleBestAndGlobalBest => 1,
            _ => params.n_elite.min(tours.len()),
        };
        for &ant in ranked_indices(tours).iter().take(count) {
            deposit_tour(pheromone, &tours[ant]);
        }
    }

    if params.policy.uses_global_best() {
        if let Some(best) = global_best {
            deposit_tour(pheromone, best);
        }
    }

    pheromone.clamp(params.min_pher_conc, params.max_pher_conc);
}

fn deposit_tour(pheromone: &mut PheromoneMatrix, tour: &Tour) {
    if tour.length() <= 0.0 {
        return;
    }
    let amount = 1.0 / tour.length();
    for (i, j) in tour.edges() {
        pheromone.deposit(i, j, amount);
    }
}
