//! Control configuration for the ColonyForge ACO engine.
//!
//! Holds the validated, immutable parameter record that drives the
//! engine: colony sizing, pheromone dynamics, perturbation, the
//! local-search schedule and the termination budget. Configurations can
//! be built in code or loaded from TOML; all range constraints are
//! checked once by [`AcoConfig::validate`] and never re-checked inside
//! the run loop.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use colonyforge_config::AcoConfig;
//!
//! let config = AcoConfig::from_toml_str(r#"
//!     n_ants = 20
//!     n_elite = 4
//!     rho = 0.2
//!     max_iter = 50
//!     random_seed = 42
//! "#).unwrap();
//!
//! config.validate().unwrap();
//! assert_eq!(config.n_ants, 20);
//! assert_eq!(config.n_elite(), 4);
//! ```
//!
//! Or build one with the fluent API:
//!
//! ```
//! use colonyforge_config::AcoConfig;
//!
//! let config = AcoConfig::new()
//!     .with_n_ants(10)
//!     .with_use_global_best(true)
//!     .with_max_iter(100);
//!
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A range or consistency constraint failed; names the field.
    #[error("invalid configuration: `{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Which tours deposit pheromone at the end of an iteration.
///
/// Resolved once from `n_elite`, `use_global_best` and
/// `best_deposit_only` by [`AcoConfig::deposit_policy`];
/// `best_deposit_only` replaces the elite-set deposit with the single
/// iteration-best tour and leaves the global-best deposit alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositPolicy {
    /// The `n_elite` shortest tours of the iteration.
    EliteSet,
    /// Elite set plus the global best.
    EliteSetAndGlobalBest,
    /// Only the single shortest tour of the iteration.
    SingleBest,
    /// Single iteration best plus the global best.
    SingleBestAndGlobalBest,
    /// Only the global best.
    GlobalBest,
}

impl DepositPolicy {
    /// True when the iteration's tours contribute (anything besides the
    /// global best alone).
    pub fn uses_iteration_tours(&self) -> bool {
        !matches!(self, DepositPolicy::GlobalBest)
    }

    /// True when the global best contributes.
    pub fn uses_global_best(&self) -> bool {
        matches!(
            self,
            DepositPolicy::EliteSetAndGlobalBest
                | DepositPolicy::SingleBestAndGlobalBest
                | DepositPolicy::GlobalBest
        )
    }
}

/// Control configuration for an ACO run.
///
/// Field defaults follow the reference parametrization: 2 ants, all of
/// them elite, no global-best deposit, `alpha = 1`, `beta = 2`,
/// `rho = 0.1`, 10 iterations, no wall-clock budget.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AcoConfig {
    /// Number of ants per iteration.
    #[serde(default = "default_n_ants")]
    pub n_ants: usize,

    /// Number of elite ants depositing pheromone. `None` means all ants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_elite: Option<usize>,

    /// Whether the global-best tour deposits every iteration.
    #[serde(default)]
    pub use_global_best: bool,

    /// Replace the elite-set deposit with the single iteration best.
    #[serde(default)]
    pub best_deposit_only: bool,

    /// Pheromone influence exponent.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Heuristic-desirability influence exponent.
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Evaporation rate per iteration.
    #[serde(default = "default_rho")]
    pub rho: f64,

    /// Scales heuristic attractiveness (numerator of the inverse
    /// distance term).
    #[serde(default = "default_att_factor")]
    pub att_factor: f64,

    /// Initial concentration on every edge.
    #[serde(default = "default_init_pher_conc")]
    pub init_pher_conc: f64,

    /// Lower pheromone clamp.
    #[serde(default)]
    pub min_pher_conc: f64,

    /// Upper pheromone clamp.
    #[serde(default = "default_max_pher_conc")]
    pub max_pher_conc: f64,

    /// Per-step probability of a perturbation step that bypasses the
    /// pheromone-weighted transition rule.
    #[serde(default)]
    pub prp_prob: f64,

    /// Iteration numbers (1-based) at which the local-search hook runs.
    #[serde(default)]
    pub local_search_steps: Vec<u64>,

    /// Iteration limit.
    #[serde(default = "default_max_iter")]
    pub max_iter: u64,

    /// Wall-clock budget in seconds; `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time_secs: Option<f64>,

    /// Known optimal tour length, enabling the optimality-gap stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_opt_value: Option<f64>,

    /// Squared-gap threshold for the optimality stop.
    #[serde(default = "default_termination_eps")]
    pub termination_eps: f64,

    /// Record per-iteration snapshots in the run result.
    #[serde(default)]
    pub trace_all: bool,

    /// Random seed for reproducible runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,

    /// Window size for the iteration-duration log used by the
    /// wall-clock estimator.
    #[serde(default = "default_duration_window")]
    pub duration_window: usize,
}

fn default_n_ants() -> usize {
    2
}
fn default_alpha() -> f64 {
    1.0
}
fn default_beta() -> f64 {
    2.0
}
fn default_rho() -> f64 {
    0.1
}
fn default_att_factor() -> f64 {
    1.0
}
fn default_init_pher_conc() -> f64 {
    0.0001
}
fn default_max_pher_conc() -> f64 {
    1_000_000.0
}
fn default_max_iter() -> u64 {
    10
}
fn default_termination_eps() -> f64 {
    0.1
}
fn default_duration_window() -> usize {
    5
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            n_ants: default_n_ants(),
            n_elite: None,
            use_global_best: false,
            best_deposit_only: false,
            alpha: default_alpha(),
            beta: default_beta(),
            rho: default_rho(),
            att_factor: default_att_factor(),
            init_pher_conc: default_init_pher_conc(),
            min_pher_conc: 0.0,
            max_pher_conc: default_max_pher_conc(),
            prp_prob: 0.0,
            local_search_steps: Vec::new(),
            max_iter: default_max_iter(),
            max_time_secs: None,
            global_opt_value: None,
            termination_eps: default_termination_eps(),
            trace_all: false,
            random_seed: None,
            duration_window: default_duration_window(),
        }
    }
}

impl AcoConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or contains invalid
    /// TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Effective elite count: `n_elite` when set, otherwise all ants.
    pub fn n_elite(&self) -> usize {
        self.n_elite.unwrap_or(self.n_ants)
    }

    /// Wall-clock budget as a `Duration`, if bounded.
    pub fn max_time(&self) -> Option<Duration> {
        self.max_time_secs.map(Duration::from_secs_f64)
    }

    pub fn with_n_ants(mut self, n_ants: usize) -> Self {
        self.n_ants = n_ants;
        self
    }

    pub fn with_n_elite(mut self, n_elite: usize) -> Self {
        self.n_elite = Some(n_elite);
        self
    }

    pub fn with_use_global_best(mut self, on: bool) -> Self {
        self.use_global_best = on;
        self
    }

    pub fn with_best_deposit_only(mut self, on: bool) -> Self {
        self.best_deposit_only = on;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn with_att_factor(mut self, att_factor: f64) -> Self {
        self.att_factor = att_factor;
        self
    }

    pub fn with_init_pher_conc(mut self, conc: f64) -> Self {
        self.init_pher_conc = conc;
        self
    }

    pub fn with_pheromone_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_pher_conc = min;
        self.max_pher_conc = max;
        self
    }

    pub fn with_prp_prob(mut self, prob: f64) -> Self {
        self.prp_prob = prob;
        self
    }

    pub fn with_local_search_steps(mut self, steps: impl Into<Vec<u64>>) -> Self {
        self.local_search_steps = steps.into();
        self
    }

    pub fn with_max_iter(mut self, max_iter: u64) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_max_time_secs(mut self, secs: f64) -> Self {
        self.max_time_secs = Some(secs);
        self
    }

    pub fn with_global_opt_value(mut self, value: f64) -> Self {
        self.global_opt_value = Some(value);
        self
    }

    pub fn with_termination_eps(mut self, eps: f64) -> Self {
        self.termination_eps = eps;
        self
    }

    pub fn with_trace_all(mut self, on: bool) -> Self {
        self.trace_all = on;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_duration_window(mut self, window: usize) -> Self {
        self.duration_window = window;
        self
    }

    /// Checks every range and consistency constraint.
    ///
    /// Rejections name the offending field; this is the single
    /// validation point, the engine assumes validated parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_ants < 1 {
            return Err(ConfigError::invalid("n_ants", "must be at least 1"));
        }
        let n_elite = self.n_elite();
        if n_elite > self.n_ants {
            return Err(ConfigError::invalid(
                "n_elite",
                format!("must not exceed n_ants ({} > {})", n_elite, self.n_ants),
            ));
        }
        if n_elite == 0 && !self.use_global_best {
            return Err(ConfigError::invalid(
                "n_elite",
                "is 0 and use_global_best is false: no pheromone deposit source",
            ));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(ConfigError::invalid("alpha", "must be finite and >= 0"));
        }
        if !self.beta.is_finite() || self.beta < 1.0 {
            return Err(ConfigError::invalid("beta", "must be finite and >= 1"));
        }
        if !(0.0..=1.0).contains(&self.rho) {
            return Err(ConfigError::invalid("rho", "must lie in [0, 1]"));
        }
        if !self.att_factor.is_finite() || self.att_factor < 1.0 {
            return Err(ConfigError::invalid(
                "att_factor",
                "must be finite and >= 1",
            ));
        }
        if self.init_pher_conc < 0.0001 {
            return Err(ConfigError::invalid(
                "init_pher_conc",
                "must be at least 0.0001",
            ));
        }
        if self.min_pher_conc < 0.0 {
            return Err(ConfigError::invalid("min_pher_conc", "must be >= 0"));
        }
        if self.max_pher_conc < 1.0 {
            return Err(ConfigError::invalid("max_pher_conc", "must be >= 1"));
        }
        if self.min_pher_conc >= self.max_pher_conc {
            return Err(ConfigError::invalid(
                "min_pher_conc",
                "must be below max_pher_conc",
            ));
        }
        if !(0.0..=1.0).contains(&self.prp_prob) {
            return Err(ConfigError::invalid("prp_prob", "must lie in [0, 1]"));
        }
        if self.max_iter < 1 {
            return Err(ConfigError::invalid("max_iter", "must be at least 1"));
        }
        if let Some(secs) = self.max_time_secs {
            if !secs.is_finite() || secs < 100.0 {
                return Err(ConfigError::invalid(
                    "max_time_secs",
                    "must be at least 100 seconds (or omitted for no budget)",
                ));
            }
        }
        if let Some(opt) = self.global_opt_value {
            if !opt.is_finite() {
                return Err(ConfigError::invalid("global_opt_value", "must be finite"));
            }
        }
        if self.termination_eps < 1e-6 {
            return Err(ConfigError::invalid(
                "termination_eps",
                "must be at least 1e-6",
            ));
        }
        if !(1..=10).contains(&self.duration_window) {
            return Err(ConfigError::invalid(
                "duration_window",
                "must lie in 1..=10",
            ));
        }
        Ok(())
    }

    /// Resolves the three deposit flags into the explicit policy.
    ///
    /// Assumes a validated configuration (at least one deposit source).
    pub fn deposit_policy(&self) -> DepositPolicy {
        match (self.n_elite() > 0, self.best_deposit_only, self.use_global_best) {
            (true, false, false) => DepositPolicy::EliteSet,
            (true, false, true) => DepositPolicy::EliteSetAndGlobalBest,
            (true, true, false) => DepositPolicy::SingleBest,
            (true, true, true) => DepositPolicy::SingleBestAndGlobalBest,
            (false, _, _) => DepositPolicy::GlobalBest,
        }
    }

    /// Human-readable rendering of the control parameters.
    pub fn report(&self) -> String {
        let n_elite = self.n_elite();
        let pct = 100.0 * n_elite as f64 / self.n_ants as f64;
        let schedule = match self.local_search_steps.as_slice() {
            [] => "disabled".to_string(),
            [k] => format!("every {k} iterations"),
            steps => format!(
                "at iterations {}",
                steps
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        format!(
            "ant colony control:\n\
             \x20 ants: {} (elite: {}, {:.2}%)\n\
             \x20 alpha: {}, beta: {}, rho: {}, attraction factor: {}\n\
             \x20 pheromone bounds: [{}, {}] (initial {})\n\
             \x20 local search: {}",
            self.n_ants,
            n_elite,
            pct,
            self.alpha,
            self.beta,
            self.rho,
            self.att_factor,
            self.min_pher_conc,
            self.max_pher_conc,
            self.init_pher_conc,
            schedule,
        )
    }
}

impl fmt::Display for AcoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AcoConfig::default();
        config.validate().unwrap();
        assert_eq!(config.n_ants, 2);
        assert_eq!(config.n_elite(), 2);
        assert_eq!(config.max_iter, 10);
        assert!(config.max_time().is_none());
    }

    #[test]
    fn toml_parsing() {
        let toml = r#"
            n_ants = 20
            n_elite = 4
            use_global_best = true
            alpha = 1.5
            rho = 0.2
            local_search_steps = [5, 10]
            max_iter = 50
            random_seed = 42
        "#;

        let config = AcoConfig::from_toml_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.n_ants, 20);
        assert_eq!(config.n_elite(), 4);
        assert!(config.use_global_best);
        assert_eq!(config.local_search_steps, vec![5, 10]);
        assert_eq!(config.random_seed, Some(42));
    }

    #[test]
    fn builder() {
        let config = AcoConfig::new()
            .with_n_ants(10)
            .with_n_elite(3)
            .with_rho(0.05)
            .with_max_iter(25)
            .with_random_seed(123);

        config.validate().unwrap();
        assert_eq!(config.n_ants, 10);
        assert_eq!(config.n_elite(), 3);
        assert_eq!(config.random_seed, Some(123));
    }

    #[test]
    fn rejects_elite_exceeding_ants() {
        let err = AcoConfig::new().with_n_ants(2).with_n_elite(3).validate();
        assert!(matches!(
            err,
            Err(ConfigError::Invalid { field: "n_elite", .. })
        ));
    }

    #[test]
    fn rejects_missing_deposit_source() {
        let err = AcoConfig::new()
            .with_n_elite(0)
            .with_use_global_best(false)
            .validate();
        assert!(matches!(
            err,
            Err(ConfigError::Invalid { field: "n_elite", .. })
        ));
    }

    #[test]
    fn accepts_zero_elite_with_global_best() {
        AcoConfig::new()
            .with_n_elite(0)
            .with_use_global_best(true)
            .validate()
            .unwrap();
    }

    #[test]
    fn rejects_out_of_range_scalars() {
        assert!(AcoConfig::new().with_alpha(-0.1).validate().is_err());
        assert!(AcoConfig::new().with_alpha(f64::NAN).validate().is_err());
        assert!(AcoConfig::new().with_beta(0.5).validate().is_err());
        assert!(AcoConfig::new().with_rho(1.1).validate().is_err());
        assert!(AcoConfig::new().with_att_factor(0.0).validate().is_err());
        assert!(AcoConfig::new().with_prp_prob(-0.2).validate().is_err());
        assert!(AcoConfig::new().with_init_pher_conc(0.0).validate().is_err());
        assert!(AcoConfig::new().with_termination_eps(1e-9).validate().is_err());
        assert!(AcoConfig::new().with_duration_window(0).validate().is_err());
    }

    #[test]
    fn rejects_short_time_budget() {
        let err = AcoConfig::new().with_max_time_secs(30.0).validate();
        assert!(matches!(
            err,
            Err(ConfigError::Invalid {
                field: "max_time_secs",
                ..
            })
        ));
        AcoConfig::new().with_max_time_secs(100.0).validate().unwrap();
    }

    #[test]
    fn deposit_policy_mapping() {
        let base = AcoConfig::new().with_n_ants(4);
        assert_eq!(
            base.clone().with_n_elite(2).deposit_policy(),
            DepositPolicy::EliteSet
        );
        assert_eq!(
            base.clone()
                .with_n_elite(2)
                .with_use_global_best(true)
                .deposit_policy(),
            DepositPolicy::EliteSetAndGlobalBest
        );
        assert_eq!(
            base.clone()
                .with_n_elite(2)
                .with_best_deposit_only(true)
                .deposit_policy(),
            DepositPolicy::SingleBest
        );
        assert_eq!(
            base.clone()
                .with_n_elite(2)
                .with_best_deposit_only(true)
                .with_use_global_best(true)
                .deposit_policy(),
            DepositPolicy::SingleBestAndGlobalBest
        );
        assert_eq!(
            base.clone()
                .with_n_elite(0)
                .with_use_global_best(true)
                .deposit_policy(),
            DepositPolicy::GlobalBest
        );
    }

    #[test]
    fn report_shows_exact_elite_percentage() {
        let report = AcoConfig::new().with_n_ants(5).with_n_elite(5).report();
        assert!(report.contains("ants: 5 (elite: 5, 100.00%)"), "{report}");

        let report = AcoConfig::new().with_n_ants(4).with_n_elite(1).report();
        assert!(report.contains("(elite: 1, 25.00%)"), "{report}");
    }

    #[test]
    fn report_renders_local_search_schedule() {
        let report = AcoConfig::new().with_local_search_steps([3]).report();
        assert!(report.contains("local search: every 3 iterations"), "{report}");

        let report = AcoConfig::new().with_local_search_steps([2, 4, 8]).report();
        assert!(report.contains("local search: at iterations 2, 4, 8"), "{report}");

        let report = AcoConfig::new().report();
        assert!(report.contains("local search: disabled"), "{report}");
    }

    #[test]
    fn toml_round_trip() {
        let config = AcoConfig::new()
            .with_n_ants(8)
            .with_use_global_best(true)
            .with_pheromone_bounds(0.01, 5.0)
            .with_local_search_steps([10]);
        let text = toml::to_string(&config).unwrap();
        let back = AcoConfig::from_toml_str(&text).unwrap();
        assert_eq!(back.n_ants, 8);
        assert!(back.use_global_best);
        assert_eq!(back.min_pher_conc, 0.01);
        assert_eq!(back.local_search_steps, vec![10]);
    }
}
