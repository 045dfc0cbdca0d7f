//! Adaptive termination.
//!
//! Three stop criteria, reported in priority order
//! `{OptimumReached, IterationLimit, TimeLimit}`:
//! - optimality gap against a known optimum (`(best - opt)^2 < eps`);
//! - iteration count limit;
//! - wall-clock budget, gated *before* each iteration by estimating the
//!   next iteration's duration from a rolling log of recent durations.
//!   The estimator only prevents starting an iteration, it never aborts
//!   one in progress.

use std::collections::VecDeque;
use std::time::Duration;

use colonyforge_config::AcoConfig;

/// Why a run stopped. Normal terminations, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The optimality-gap criterion fired.
    OptimumReached,
    /// The iteration limit was reached.
    IterationLimit,
    /// The remaining wall-clock budget cannot fit another iteration.
    TimeLimit,
}

/// Tracks iteration durations and decides whether another iteration may
/// start within the remaining budget.
#[derive(Debug, Clone)]
pub struct TerminationEstimator {
    max_time: Option<Duration>,
    max_iter: u64,
    global_opt_value: Option<f64>,
    termination_eps: f64,
    window: usize,
    durations: VecDeque<Duration>,
}

impl TerminationEstimator {
    pub fn from_config(config: &AcoConfig) -> Self {
        Self {
            max_time: config.max_time(),
            max_iter: config.max_iter,
            global_opt_value: config.global_opt_value,
            termination_eps: config.termination_eps,
            window: config.duration_window,
            durations: VecDeque::with_capacity(config.duration_window),
        }
    }

    /// Appends an iteration duration, keeping only the most recent
    /// window.
    pub fn record_iteration(&mut self, duration: Duration) {
        if self.durations.len() == self.window {
            self.durations.pop_front();
        }
        self.durations.push_back(duration);
    }

    /// Mean duration over the logged window; `None` before the first
    /// iteration completes.
    pub fn estimate(&self) -> Option<Duration> {
        if self.durations.is_empty() {
            return None;
        }
        let total: Duration = self.durations.iter().sum();
        Some(total / self.durations.len() as u32)
    }

    /// Wall-clock gate, checked before starting an iteration.
    pub fn before_iteration(&self, elapsed: Duration) -> Option<StopReason> {
        let max_time = self.max_time?;
        if elapsed >= max_time {
            return Some(StopReason::TimeLimit);
        }
        let remaining = max_time - elapsed;
        match self.estimate() {
            Some(estimate) if estimate > remaining => Some(StopReason::TimeLimit),
            _ => None,
        }
    }

    /// Iteration-count and optimality-gap checks, run after an
    /// iteration completes. The gap check comes first: a found optimum
    /// is the more informative signal.
    pub fn after_iteration(&self, iterations: u64, best_length: Option<f64>) -> Option<StopReason> {
        if let (Some(opt), Some(best)) = (self.global_opt_value, best_length) {
            let gap = best - opt;
            if gap * gap < self.termination_eps {
                return Some(StopReason::OptimumReached);
            }
        }
        if iterations >= self.max_iter {
            return Some(StopReason::IterationLimit);
        }
        None
    }
}
