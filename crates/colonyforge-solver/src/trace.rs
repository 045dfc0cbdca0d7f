//! Run results and optional per-iteration trace recording.

use colonyforge_core::{PheromoneMatrix, Tour};

use crate::termination::StopReason;

/// Snapshot of one iteration, captured when `trace_all` is set.
#[derive(Debug, Clone)]
pub struct IterationTrace {
    /// 1-based iteration number.
    pub iteration: u64,
    /// Pheromone matrix after the update step.
    pub pheromone: PheromoneMatrix,
    /// Every ant's tour, in ant-index order, after local search.
    pub tours: Vec<Tour>,
    /// Best tour of this iteration.
    pub iteration_best: Tour,
    /// Running global best after this iteration's bookkeeping.
    pub global_best: Tour,
}

/// Outcome of a solver run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Best tour across the whole run. `None` only when the wall-clock
    /// gate fired before the first iteration.
    pub best: Option<Tour>,
    /// Iterations executed.
    pub iterations: u64,
    /// Which criterion stopped the run.
    pub stop_reason: StopReason,
    /// Per-iteration snapshots when `trace_all` was set.
    pub trace: Option<Vec<IterationTrace>>,
}

impl RunResult {
    /// Length of the best tour, if any.
    pub fn best_length(&self) -> Option<f64> {
        self.best.as_ref().map(Tour::length)
    }
}
