//! Variant-parameterized evaluation: three AND-gated conditions over the
//! joined pipeline outputs.
//!
//! One evaluator serves all five detection families; a [`DriftKind`] value
//! supplies the identity strings and scoring parameters. The fan-out family
//! optionally receives destination sets. When present, gate C uses true
//! novelty (set difference against the baseline union); when absent, the
//! count proxy `new_targets := primary_count` applies.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::debug;

use super::growth::compute_growth_hits;
use super::novelty::true_novelty_count;
use super::scoring::score_bucket;
use super::EngineError;
use crate::baseline::{
    apply_baseline_to_observation, completeness_score, compute_baseline_stats, BaselineStats,
};
use crate::config::DriftThresholds;
use crate::types::{BucketFeatures, DriftKind, EntityBucket, Evaluation, Signal};

/// Optional destination-set inputs for true-novelty fan-out evaluation.
#[derive(Debug, Clone, Default)]
pub struct NoveltySets {
    /// `(host, bucket_start)` -> destinations seen in that observation bucket.
    pub current_dest_sets: HashMap<EntityBucket, HashSet<String>>,
    /// host -> union of destinations across all baseline buckets.
    pub baseline_union: HashMap<String, HashSet<String>>,
}

/// Evaluate one detection family over baseline and observation bucket
/// records.
///
/// Computes per-entity baseline statistics, attaches deviation ratios to the
/// observation, folds rolling growth state, and emits one [`Signal`] per
/// (entity, bucket) that passes all three gates. Signal order follows the
/// sorted `(entity_key, bucket_start)` observation order.
pub fn evaluate_drift(
    kind: DriftKind,
    baseline: &[BucketFeatures],
    observation: &[BucketFeatures],
    thresholds: &DriftThresholds,
    novelty: Option<&NoveltySets>,
) -> Result<Evaluation, EngineError> {
    let baselines = compute_baseline_stats(baseline);
    let observation =
        apply_baseline_to_observation(observation, &baselines, thresholds.min_baseline_buckets);
    let growth_hits = compute_growth_hits(&observation, thresholds.sustained_buckets)?;

    // Every (entity, bucket) is independent once growth state is folded in;
    // rayon keeps the collected order identical to the sequential walk.
    let signals: Vec<Signal> = observation
        .par_iter()
        .filter_map(|bucket| {
            evaluate_bucket(kind, bucket, &baselines, &growth_hits, thresholds, novelty)
        })
        .collect();

    debug!(
        detection_id = kind.detection_id(),
        entities = baselines.len(),
        observation_buckets = observation.len(),
        signals = signals.len(),
        "evaluation complete"
    );
    Ok(Evaluation::from(signals))
}

/// Fan-out gate-C metric: true novelty when sets are available for this
/// bucket, otherwise the count proxy.
fn fanout_new_targets(
    bucket: &BucketFeatures,
    novelty: Option<&NoveltySets>,
) -> u64 {
    let Some(sets) = novelty else {
        return bucket.primary_count;
    };
    let key = (bucket.entity_key.clone(), bucket.bucket_start);
    match sets.current_dest_sets.get(&key) {
        Some(current) => match sets.baseline_union.get(&bucket.entity_key) {
            Some(union) => true_novelty_count(current, union) as u64,
            None => current.len() as u64,
        },
        None => bucket.primary_count,
    }
}

fn evaluate_bucket(
    kind: DriftKind,
    bucket: &BucketFeatures,
    baselines: &HashMap<String, BaselineStats>,
    growth_hits: &HashMap<EntityBucket, u32>,
    thresholds: &DriftThresholds,
    novelty: Option<&NoveltySets>,
) -> Option<Signal> {
    let stats = baselines.get(&bucket.entity_key);
    let deviation_ratio = bucket.baseline_deviation_ratio;

    let hits = growth_hits
        .get(&(bucket.entity_key.clone(), bucket.bucket_start))
        .copied()
        .unwrap_or(0);
    let sustained_growth = hits as usize >= thresholds.sustained_buckets;

    let (variety_metric, new_targets) = if kind == DriftKind::NetworkFanout {
        let new = fanout_new_targets(bucket, novelty);
        (new, Some(new))
    } else {
        (bucket.variety_count, None)
    };

    let deviation_gate =
        deviation_ratio.is_some_and(|ratio| ratio >= thresholds.deviation_ratio_threshold);
    let growth_gate = sustained_growth;
    let variety_gate = variety_metric >= thresholds.min_variety;

    if !(deviation_gate && growth_gate && variety_gate) {
        return None;
    }

    let score = score_bucket(
        deviation_ratio,
        variety_metric,
        kind.variety_denominator(),
        sustained_growth,
        completeness_score(stats, thresholds.expected_baseline_buckets),
        variety_metric > 0,
    );

    Some(Signal {
        signal_name: kind.signal_name().to_string(),
        detection_id: kind.detection_id().to_string(),
        entity_type: kind.entity_type(),
        entity_key: bucket.entity_key.clone(),
        bucket_start: bucket.bucket_start,
        risk_score: score.risk_score,
        confidence: score.confidence,
        time_horizon: score.time_horizon,
        primary_count: bucket.primary_count,
        variety_count: bucket.variety_count,
        baseline_avg_primary: stats.map(|s| s.avg_primary),
        deviation_ratio,
        growth_hits: hits,
        new_targets,
    })
}

/// Evaluate network fan-out drift (`pde-spl-0401`); destination sets are
/// optional and enable true novelty.
pub fn evaluate_network_fanout(
    baseline: &[BucketFeatures],
    observation: &[BucketFeatures],
    thresholds: &DriftThresholds,
    novelty: Option<&NoveltySets>,
) -> Result<Evaluation, EngineError> {
    evaluate_drift(DriftKind::NetworkFanout, baseline, observation, thresholds, novelty)
}

/// Evaluate authentication-failure drift (`pde-spl-0402`).
pub fn evaluate_auth_spray(
    baseline: &[BucketFeatures],
    observation: &[BucketFeatures],
    thresholds: &DriftThresholds,
) -> Result<Evaluation, EngineError> {
    evaluate_drift(DriftKind::AuthSpray, baseline, observation, thresholds, None)
}

/// Evaluate persistence-artifact drift (`pde-spl-0403`).
pub fn evaluate_persistence(
    baseline: &[BucketFeatures],
    observation: &[BucketFeatures],
    thresholds: &DriftThresholds,
) -> Result<Evaluation, EngineError> {
    evaluate_drift(DriftKind::Persistence, baseline, observation, thresholds, None)
}

/// Evaluate data-staging drift (`pde-spl-0404`).
pub fn evaluate_data_staging(
    baseline: &[BucketFeatures],
    observation: &[BucketFeatures],
    thresholds: &DriftThresholds,
) -> Result<Evaluation, EngineError> {
    evaluate_drift(DriftKind::DataStaging, baseline, observation, thresholds, None)
}

/// Evaluate admin-tooling drift (`pde-spl-0405`).
pub fn evaluate_admin_tooling(
    baseline: &[BucketFeatures],
    observation: &[BucketFeatures],
    thresholds: &DriftThresholds,
) -> Result<Evaluation, EngineError> {
    evaluate_drift(DriftKind::AdminTooling, baseline, observation, thresholds, None)
}
