//! Core domain types and the engagement scoring engine.
//!
//! Everything in this crate is synchronous and side-effect-free apart from
//! the configuration loader, which reads environment variables. The scoring
//! functions in [`metrics`] and the ranker in [`rank`] perform no I/O and
//! hold no shared state, so callers may invoke them concurrently across
//! independent records without coordination.

mod app_config;
mod config;
pub mod metrics;
pub mod rank;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use metrics::{compute_metrics, EngagementMetrics, RawMetrics, ScoringWeights};
pub use rank::{rank, ScoredVideo};

use thiserror::Error;

/// Errors produced while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but its value does not parse.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
