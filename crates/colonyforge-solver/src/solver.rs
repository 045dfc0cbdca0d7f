//! Solver implementation.

use std::time::Instant;

use colonyforge_config::{AcoConfig, ConfigError};
use colonyforge_core::{DistanceMatrix, Tour};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::construction::{self, TransitionParams};
use crate::hooks::{LocalPheromoneUpdate, LocalSearch, NoLocalPheromoneUpdate, NoLocalSearch};
use crate::localsearch;
use crate::scope::RunState;
use crate::termination::TerminationEstimator;
use crate::trace::{IterationTrace, RunResult};
use crate::update::{self, UpdateParams};

/// Errors refusing a solver before the run starts.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The ACO engine: constructs ant tours against the shared pheromone
/// model, refines them through the local-search adapter, applies the
/// deposit policy and lets the termination estimator gate each
/// iteration.
///
/// # Type Parameters
/// * `L` - Local-search hook (default [`NoLocalSearch`])
/// * `U` - Local pheromone-update hook (default [`NoLocalPheromoneUpdate`])
///
/// # Example
///
/// ```
/// use colonyforge_config::AcoConfig;
/// use colonyforge_core::DistanceMatrix;
/// use colonyforge_solver::AcoSolver;
///
/// let distances = DistanceMatrix::from_coords(&[
///     (0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0),
/// ]).unwrap();
///
/// let config = AcoConfig::new()
///     .with_n_ants(5)
///     .with_max_iter(3)
///     .with_random_seed(42);
///
/// let solver = AcoSolver::new(config, distances).unwrap();
/// let result = solver.solve();
/// assert!(result.best.is_some());
/// ```
pub struct AcoSolver<L = NoLocalSearch, U = NoLocalPheromoneUpdate> {
    config: AcoConfig,
    distances: DistanceMatrix,
    local_search: L,
    local_update: U,
}

impl AcoSolver<NoLocalSearch, NoLocalPheromoneUpdate> {
    /// Builds a solver over the given problem, validating the
    /// configuration. An inconsistent configuration (including a
    /// missing deposit source) is rejected here; the run loop assumes
    /// validated parameters.
    pub fn new(config: AcoConfig, distances: DistanceMatrix) -> Result<Self, SolverError> {
        config.validate()?;
        Ok(Self {
            config,
            distances,
            local_search: NoLocalSearch,
            local_update: NoLocalPheromoneUpdate,
        })
    }
}

impl<L: LocalSearch, U: LocalPheromoneUpdate> AcoSolver<L, U> {
    /// Injects the local-search hook.
    pub fn with_local_search<L2: LocalSearch>(self, hook: L2) -> AcoSolver<L2, U> {
        AcoSolver {
            config: self.config,
            distances: self.distances,
            local_search: hook,
            local_update: self.local_update,
        }
    }

    /// Injects the per-step local pheromone-update hook. With a hook
    /// present, ant construction runs sequentially (the hook mutates
    /// state read by subsequent ants).
    pub fn with_local_pheromone_update<U2: LocalPheromoneUpdate>(
        self,
        hook: U2,
    ) -> AcoSolver<L, U2> {
        AcoSolver {
            config: self.config,
            distances: self.distances,
            local_search: self.local_search,
            local_update: hook,
        }
    }

    /// The control configuration.
    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    /// Runs the full loop until a stop criterion fires.
    pub fn solve(&self) -> RunResult {
        let transition = TransitionParams {
            alpha: self.config.alpha,
            beta: self.config.beta,
            att_factor: self.config.att_factor,
            prp_prob: self.config.prp_prob,
        };
        let update_params = UpdateParams {
            rho: self.config.rho,
            n_elite: self.config.n_elite(),
            min_pher_conc: self.config.min_pher_conc,
            max_pher_conc: self.config.max_pher_conc,
            policy: self.config.deposit_policy(),
        };

        if self.local_search.is_active() && self.config.local_search_steps.is_empty() {
            warn!("local search hook supplied but local_search_steps is empty; it will never run");
        }

        let mut state = RunState::new(&self.config, self.distances.len());
        let mut estimator = TerminationEstimator::from_config(&self.config);
        let mut trace = self.config.trace_all.then(Vec::new);

        let stop_reason = loop {
            if let Some(reason) = estimator.before_iteration(state.elapsed()) {
                break reason;
            }
            let iteration_start = Instant::now();
            let iteration = state.next_iteration();

            let mut tours = self.construct_all(transition, &mut state);

            if self.local_search.is_active()
                && localsearch::scheduled(&self.config.local_search_steps, iteration)
            {
                localsearch::refine_all(&self.local_search, &mut tours, &self.distances);
            }

            let best_idx = update::iteration_best(&tours).unwrap_or(0);

            // Deposit uses the global best of the previous iterations;
            // bookkeeping happens after the update step.
            let previous_best = state.global_best().cloned();
            update::apply(
                state.pheromone_mut(),
                update_params,
                &tours,
                previous_best.as_ref(),
            );
            state.offer_global_best(&tours[best_idx]);

            debug!(
                iteration,
                iteration_best = tours[best_idx].length(),
                global_best = ?state.global_best_length(),
                "iteration finished"
            );

            if let Some(records) = trace.as_mut() {
                let global_best = state
                    .global_best()
                    .cloned()
                    .unwrap_or_else(|| tours[best_idx].clone());
                records.push(IterationTrace {
                    iteration,
                    pheromone: state.pheromone().clone(),
                    iteration_best: tours[best_idx].clone(),
                    global_best,
                    tours,
                });
            }

            estimator.record_iteration(iteration_start.elapsed());

            if let Some(reason) = estimator.after_iteration(iteration, state.global_best_length())
            {
                break reason;
            }
        };

        let iterations = state.iterations();
        debug!(?stop_reason, iterations, best = ?state.global_best_length(), "run finished");
        RunResult {
            best: state.take_global_best(),
            iterations,
            stop_reason,
            trace,
        }
    }

    /// Constructs all ant tours for one iteration, in ant-index order.
    ///
    /// Per-ant RNGs are seeded from the master stream before
    /// construction, so fixed-seed runs are reproducible on both paths
    /// regardless of thread scheduling.
    fn construct_all(&self, transition: TransitionParams, state: &mut RunState) -> Vec<Tour> {
        let seeds: Vec<u64> = (0..self.config.n_ants)
            .map(|_| state.rng_mut().random())
            .collect();

        if self.local_update.is_active() {
            // The hook mutates the shared matrix: strictly sequential.
            seeds
                .into_iter()
                .map(|seed| {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    construction::construct_tour_with_hook(
                        &mut rng,
                        transition,
                        &self.distances,
                        state.pheromone_mut(),
                        &self.local_update,
                    )
                })
                .collect()
        } else {
            let distances = &self.distances;
            let pheromone = state.pheromone();
            seeds
                .into_par_iter()
                .map(|seed| {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    construction::construct_tour(&mut rng, transition, distances, pheromone)
                })
                .collect()
        }
    }
}
