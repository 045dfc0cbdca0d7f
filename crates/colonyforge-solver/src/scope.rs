//! Run state threaded through the iteration loop.

use std::time::{Duration, Instant};

use colonyforge_config::AcoConfig;
use colonyforge_core::{PheromoneMatrix, Tour};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Mutable state of one solver run: iteration counter, RNG, the shared
/// pheromone model and the global best.
///
/// Carried explicitly through each iteration rather than as ambient
/// state, so single iterations are testable in isolation.
pub struct RunState {
    rng: ChaCha8Rng,
    start: Instant,
    iterations: u64,
    pheromone: PheromoneMatrix,
    global_best: Option<Tour>,
}

impl RunState {
    /// Initializes the state for `n` nodes: uniform pheromone at
    /// `init_pher_conc`, RNG seeded from the config (or the OS when no
    /// seed is set).
    pub fn new(config: &AcoConfig, n: usize) -> Self {
        let rng = match config.random_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            rng,
            start: Instant::now(),
            iterations: 0,
            pheromone: PheromoneMatrix::uniform(n, config.init_pher_conc),
            global_best: None,
        }
    }

    /// Time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Advances the iteration counter and returns the new (1-based)
    /// iteration number.
    pub fn next_iteration(&mut self) -> u64 {
        self.iterations += 1;
        self.iterations
    }

    /// Iterations completed or in progress.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn pheromone(&self) -> &PheromoneMatrix {
        &self.pheromone
    }

    pub fn pheromone_mut(&mut self) -> &mut PheromoneMatrix {
        &mut self.pheromone
    }

    pub fn global_best(&self) -> Option<&Tour> {
        self.global_best.as_ref()
    }

    pub fn global_best_length(&self) -> Option<f64> {
        self.global_best.as_ref().map(Tour::length)
    }

    /// Adopts `tour` as the global best only when strictly shorter, so
    /// the best length is non-increasing over the run.
    pub fn offer_global_best(&mut self, tour: &Tour) -> bool {
        let improved = match &self.global_best {
            None => true,
            Some(best) => tour.length() < best.length(),
        };
        if improved {
            self.global_best = Some(tour.clone());
        }
        improved
    }

    /// Consumes the state, yielding the global best.
    pub fn take_global_best(self) -> Option<Tour> {
        self.global_best
    }
}
