//! Strategy seams for the external collaborators.
//!
//! The local-search operator and the per-step local pheromone update
//! are injected at solver build time. Absence is an explicit no-op
//! marker type rather than an `Option`, keeping the call sites
//! branch-free; the markers report `is_active() == false` so the engine
//! can pick the parallel construction path and skip the adapter
//! entirely.

use colonyforge_core::{DistanceMatrix, PheromoneMatrix, Tour};

/// External tour-refinement operator.
///
/// Implemented for any `Fn(&Tour, &Tour, &DistanceMatrix) -> Tour`,
/// where the second argument is the initial-tour hint (the tour before
/// refinement).
pub trait LocalSearch: Send + Sync {
    /// Returns a refined tour. The engine validates that the result is
    /// a permutation of the same node set and falls back to `tour`
    /// otherwise.
    fn refine(&self, tour: &Tour, initial: &Tour, distances: &DistanceMatrix) -> Tour;

    /// False only for the no-op marker.
    fn is_active(&self) -> bool {
        true
    }
}

/// Marker type indicating no local search.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalSearch;

impl LocalSearch for NoLocalSearch {
    fn refine(&self, tour: &Tour, _initial: &Tour, _distances: &DistanceMatrix) -> Tour {
        tour.clone()
    }

    fn is_active(&self) -> bool {
        false
    }
}

impl<F> LocalSearch for F
where
    F: Fn(&Tour, &Tour, &DistanceMatrix) -> Tour + Send + Sync,
{
    fn refine(&self, tour: &Tour, initial: &Tour, distances: &DistanceMatrix) -> Tour {
        self(tour, initial, distances)
    }
}

/// Per-step local pheromone update operator.
///
/// Invoked once per construction step, immediately after each node
/// choice. Implemented for any `Fn(&PheromoneMatrix) -> PheromoneMatrix`.
pub trait LocalPheromoneUpdate: Send + Sync {
    /// Returns the modified pheromone model. The engine validates the
    /// shape and keeps the pre-hook matrix on mismatch.
    fn update(&self, pheromone: &PheromoneMatrix) -> PheromoneMatrix;

    /// False only for the no-op marker. When false, ant construction
    /// runs in parallel against a read-only matrix.
    fn is_active(&self) -> bool {
        true
    }
}

/// Marker type indicating no per-step pheromone update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalPheromoneUpdate;

impl LocalPheromoneUpdate for NoLocalPheromoneUpdate {
    fn update(&self, pheromone: &PheromoneMatrix) -> PheromoneMatrix {
        pheromone.clone()
    }

    fn is_active(&self) -> bool {
        false
    }
}

impl<F> LocalPheromoneUpdate for F
where
    F: Fn(&PheromoneMatrix) -> PheromoneMatrix + Send + Sync,
{
    fn update(&self, pheromone: &PheromoneMatrix) -> PheromoneMatrix {
        self(pheromone)
    }
}
