//! ColonyForge ACO engine.
//!
//! This crate provides the solver implementation:
//! - [`AcoSolver`] - the iteration loop driven by a validated
//!   [`AcoConfig`](colonyforge_config::AcoConfig)
//! - Stochastic tour construction with perturbation and degeneracy
//!   fallbacks (construction module)
//! - Pluggable [`LocalSearch`] and [`LocalPheromoneUpdate`] hooks with
//!   explicit no-op variants
//! - End-of-iteration pheromone update policies
//! - The adaptive wall-clock [`TerminationEstimator`]
//! - Optional per-iteration trace recording

pub mod construction;
pub mod hooks;
pub mod localsearch;
pub mod scope;
pub mod solver;
pub mod termination;
pub mod trace;
pub mod update;

pub use hooks::{LocalPheromoneUpdate, LocalSearch, NoLocalPheromoneUpdate, NoLocalSearch};
pub use scope::RunState;
pub use solver::{AcoSolver, SolverError};
pub use termination::{StopReason, TerminationEstimator};
pub use trace::{IterationTrace, RunResult};
