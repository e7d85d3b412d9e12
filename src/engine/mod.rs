//! The shared analytic engine: rolling growth detection, novelty set
//! arithmetic, three-gate evaluation, and explainable scoring.

use thiserror::Error;

pub mod evaluator;
pub mod explain;
pub mod growth;
pub mod novelty;
pub mod scoring;

pub use evaluator::{
    evaluate_admin_tooling, evaluate_auth_spray, evaluate_data_staging, evaluate_drift,
    evaluate_network_fanout, evaluate_persistence, NoveltySets,
};
pub use explain::{explain_signal, Explanation};
pub use growth::compute_growth_hits;
pub use novelty::{build_baseline_union, true_novelty_count};
pub use scoring::{compute_confidence, compute_risk_score, score_bucket, ScoreResult};

/// Caller-contract violations at the evaluation boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("sustained window must be at least 1 bucket, got {0}")]
    InvalidSustainedWindow(usize),
}
