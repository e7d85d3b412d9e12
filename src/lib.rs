//! Driftwatch: Behavioral Drift Detection for Security Telemetry
//!
//! Watches batches of timestamped events about entities (hosts or source IPs)
//! and emits risk-scored signals when an entity's recent behavior diverges
//! from its own historical baseline in a sustained, variety-rich way.
//!
//! ## Architecture
//!
//! - **Feature Extractors**: collapse raw events into per-entity, per-bucket
//!   records (count + distinct-artifact cardinality), one qualifier per
//!   detection family
//! - **Baseline Aggregator**: per-entity mean/std of the primary metric over
//!   the historical window
//! - **Engine**: rolling growth detection, novelty set arithmetic, and a
//!   three-gate evaluator with an explainable risk/confidence scorer
//!
//! ## Detection families
//!
//! | Detection id   | Family                    | Entity  |
//! |----------------|---------------------------|---------|
//! | `pde-spl-0401` | Network fan-out drift     | host    |
//! | `pde-spl-0402` | Auth-failure drift        | src_ip  |
//! | `pde-spl-0403` | Persistence drift         | host    |
//! | `pde-spl-0404` | Data-staging drift        | host    |
//! | `pde-spl-0405` | Admin-tooling drift       | host    |

pub mod baseline;
pub mod config;
pub mod engine;
pub mod features;
pub mod types;

// Re-export configuration
pub use config::DriftThresholds;

// Re-export commonly used types
pub use types::{
    BucketFeatures, DriftKind, EntityType, Evaluation, Signal, TelemetryEvent, TimeHorizon,
};

// Re-export baseline components
pub use baseline::{
    apply_baseline_to_observation, completeness_score, compute_baseline_stats, BaselineStats,
};

// Re-export engine components
pub use engine::{
    evaluate_admin_tooling, evaluate_auth_spray, evaluate_data_staging, evaluate_drift,
    evaluate_network_fanout, evaluate_persistence, explain_signal, EngineError, Explanation,
    NoveltySets,
};

// Re-export feature extraction entry points
pub use features::{
    admin_tooling::extract_admin_tooling_bucket_features,
    auth_drift::extract_auth_failure_bucket_features,
    data_staging::extract_data_staging_bucket_features, network_fanout::extract_dest_sets_by_bucket,
    network_fanout::extract_fanout_bucket_features,
    persistence::extract_persistence_bucket_features, FeatureError,
};
