//! Core problem model for ColonyForge.
//!
//! This crate provides the data types shared by the configuration and
//! solver crates:
//! - [`DistanceMatrix`] - immutable symmetric cost matrix over the node set
//! - [`PheromoneMatrix`] - mutable concentration matrix with
//!   evaporation, deposit and clamping
//! - [`Tour`] - a Hamiltonian cycle with its cached length

pub mod error;
pub mod matrix;
pub mod tour;

pub use error::MatrixError;
pub use matrix::{DistanceMatrix, PheromoneMatrix};
pub use tour::Tour;
