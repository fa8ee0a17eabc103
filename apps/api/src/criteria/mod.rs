//! Criteria: the closed criterion set, its weight table, and the typed
//! per-document evidence map.

mod analysis;
mod criterion;
mod weights;

pub use analysis::{Analysis, CriterionResult, Evidence};
pub use criterion::Criterion;
pub use weights::{CriterionWeights, RatingThresholds, ScoringConfig, WEIGHT_SUM_EPSILON};

use thiserror::Error;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ScoringConfigError {
    #[error("unrecognized criterion '{0}'")]
    UnrecognizedCriterion(String),

    #[error("criterion '{0}' supplied more than once")]
    DuplicateCriterion(Criterion),

    #[error("no weight configured for criterion '{0}'")]
    MissingCriterion(Criterion),

    #[error("weight {weight} for '{criterion}' is outside (0, 1]")]
    WeightOutOfRange { criterion: Criterion, weight: f64 },

    #[error("criterion weights sum to {sum}, expected 1.0")]
    WeightSum { sum: f64 },

    #[error("thresholds must satisfy 0 < low_cut < medium_cut <= 1 (got {low_cut}, {medium_cut})")]
    InvalidThresholds { low_cut: f64, medium_cut: f64 },

    #[error("invalid scoring config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
