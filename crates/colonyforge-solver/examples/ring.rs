//! Solves a 10-city ring instance and prints the control report and the
//! best tour found.
//!
//! Run with `RUST_LOG=debug` to see per-iteration progress.

use colonyforge_config::AcoConfig;
use colonyforge_core::DistanceMatrix;
use colonyforge_solver::AcoSolver;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Ten cities on a circle: the ring order is the optimal cycle.
    let coords: Vec<(f64, f64)> = (0..10)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / 10.0;
            (angle.cos(), angle.sin())
        })
        .collect();
    let distances = DistanceMatrix::from_coords(&coords)?;

    let config = AcoConfig::new()
        .with_n_ants(20)
        .with_n_elite(4)
        .with_use_global_best(true)
        .with_max_iter(100)
        .with_random_seed(42);
    println!("{config}\n");

    let solver = AcoSolver::new(config, distances)?;
    let result = solver.solve();

    println!("stopped after {} iterations ({:?})", result.iterations, result.stop_reason);
    if let Some(best) = &result.best {
        println!("best tour: {:?} (length {:.4})", best.order(), best.length());
    }
    Ok(())
}
