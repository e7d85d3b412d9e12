//! Per-entity baseline statistics over the historical window.
//!
//! The aggregator reduces baseline-window bucket records to one summary per
//! entity: population mean and population standard deviation (N in the
//! denominator, not N-1; the baseline window is the whole population of
//! interest, not a sample) of the primary metric, plus the bucket count.
//! Entities with no baseline records are simply absent; a zero average marks
//! the entity as having no usable baseline for ratio computation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::types::BucketFeatures;

/// Summary statistics for one entity across the baseline window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineStats {
    /// Entity the statistics describe.
    pub entity_key: String,
    /// Population mean of the per-bucket primary metric.
    pub avg_primary: f64,
    /// Population standard deviation of the per-bucket primary metric.
    ///
    /// Carried for future scorer extensions; current gating uses the mean
    /// only.
    pub std_primary: f64,
    /// Number of baseline buckets the entity appeared in.
    pub bucket_count: usize,
}

impl BaselineStats {
    /// Whether this baseline can anchor a deviation ratio: non-zero average
    /// and enough history.
    pub fn usable(&self, min_baseline_buckets: usize) -> bool {
        self.avg_primary > 0.0 && self.bucket_count >= min_baseline_buckets
    }

    /// Fraction of the expected baseline window this entity actually covers,
    /// clamped to 1.0.
    pub fn completeness(&self, expected_baseline_buckets: usize) -> f64 {
        if expected_baseline_buckets == 0 {
            return 0.0;
        }
        (self.bucket_count as f64 / expected_baseline_buckets as f64).min(1.0)
    }
}

/// Compute per-entity baseline statistics from baseline-window records.
///
/// No entity is fabricated: an entity missing from `baseline_buckets` has no
/// entry in the returned map.
pub fn compute_baseline_stats(
    baseline_buckets: &[BucketFeatures],
) -> HashMap<String, BaselineStats> {
    let mut by_entity: HashMap<&str, Vec<f64>> = HashMap::new();
    for record in baseline_buckets {
        by_entity
            .entry(record.entity_key.as_str())
            .or_default()
            .push(record.primary_count as f64);
    }

    debug!(
        entities = by_entity.len(),
        buckets = baseline_buckets.len(),
        "aggregated baseline statistics"
    );

    by_entity
        .into_iter()
        .map(|(entity_key, values)| {
            let stats = BaselineStats {
                entity_key: entity_key.to_string(),
                avg_primary: values.iter().mean(),
                std_primary: values.iter().population_std_dev(),
                bucket_count: values.len(),
            };
            (stats.entity_key.clone(), stats)
        })
        .collect()
}

/// Fill `baseline_deviation_ratio` on observation records where the entity
/// has a usable baseline, leaving the rest `None`.
///
/// Output is re-sorted by `(entity_key, bucket_start)` so callers can hand
/// the result straight to the growth and evaluation stages.
pub fn apply_baseline_to_observation(
    observation: &[BucketFeatures],
    baselines: &HashMap<String, BaselineStats>,
    min_baseline_buckets: usize,
) -> Vec<BucketFeatures> {
    let mut out: Vec<BucketFeatures> = observation
        .iter()
        .map(|record| {
            let ratio = baselines
                .get(&record.entity_key)
                .filter(|stats| stats.usable(min_baseline_buckets))
                .map(|stats| record.primary_count as f64 / stats.avg_primary);
            BucketFeatures {
                baseline_deviation_ratio: ratio,
                ..record.clone()
            }
        })
        .collect();
    out.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    out
}

/// Baseline-completeness score for the confidence model: `min(1, have /
/// expected)`, or 0.0 when the entity has no baseline at all.
pub fn completeness_score(
    baseline: Option<&BaselineStats>,
    expected_baseline_buckets: usize,
) -> f64 {
    baseline.map_or(0.0, |stats| stats.completeness(expected_baseline_buckets))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(entity: &str, bucket_start: i64, primary: u64) -> BucketFeatures {
        BucketFeatures::new(entity, bucket_start, primary, primary.min(1))
    }

    #[test]
    fn test_population_mean_and_std() {
        let records = vec![
            bucket("h1", 0, 2),
            bucket("h1", 3600, 4),
            bucket("h1", 7200, 6),
        ];
        let stats = compute_baseline_stats(&records);
        let h1 = stats.get("h1").expect("entity should be present");
        assert!((h1.avg_primary - 4.0).abs() < 1e-9);
        // population std of {2, 4, 6}: sqrt(8/3), not sqrt(8/2)
        assert!((h1.std_primary - (8.0_f64 / 3.0).sqrt()).abs() < 1e-9);
        assert_eq!(h1.bucket_count, 3);
    }

    #[test]
    fn test_single_bucket_has_zero_std() {
        let stats = compute_baseline_stats(&[bucket("h1", 0, 5)]);
        let h1 = stats.get("h1").expect("entity should be present");
        assert!((h1.avg_primary - 5.0).abs() < f64::EPSILON);
        assert!(h1.std_primary.abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_entities_fabricated() {
        assert!(compute_baseline_stats(&[]).is_empty());
    }

    #[test]
    fn test_zero_average_baseline_is_unusable() {
        let stats = compute_baseline_stats(&[bucket("h1", 0, 0)]);
        let h1 = stats.get("h1").expect("entity should be present");
        assert!(!h1.usable(1));

        let applied = apply_baseline_to_observation(&[bucket("h1", 3600, 9)], &stats, 1);
        assert!(applied[0].baseline_deviation_ratio.is_none());
    }

    #[test]
    fn test_apply_fills_ratio_and_sorts() {
        let baselines = compute_baseline_stats(&[
            bucket("h1", 0, 2),
            bucket("h1", 3600, 2),
        ]);
        let observation = vec![bucket("h2", 7200, 9), bucket("h1", 10800, 8), bucket("h1", 7200, 4)];
        let applied = apply_baseline_to_observation(&observation, &baselines, 1);

        assert_eq!(applied[0].entity_key, "h1");
        assert_eq!(applied[0].bucket_start, 7200);
        assert!((applied[0].baseline_deviation_ratio.expect("ratio") - 2.0).abs() < 1e-9);
        assert!((applied[1].baseline_deviation_ratio.expect("ratio") - 4.0).abs() < 1e-9);
        // h2 has no baseline entry
        assert!(applied[2].baseline_deviation_ratio.is_none());
    }

    #[test]
    fn test_min_baseline_buckets_gates_ratio() {
        let baselines = compute_baseline_stats(&[bucket("h1", 0, 2)]);
        let applied = apply_baseline_to_observation(&[bucket("h1", 3600, 8)], &baselines, 24);
        assert!(applied[0].baseline_deviation_ratio.is_none());
    }

    #[test]
    fn test_completeness_clamps_to_one() {
        let stats = BaselineStats {
            entity_key: "h1".to_string(),
            avg_primary: 1.0,
            std_primary: 0.0,
            bucket_count: 48,
        };
        assert!((stats.completeness(24) - 1.0).abs() < f64::EPSILON);
        assert!((stats.completeness(96) - 0.5).abs() < f64::EPSILON);
        assert!(completeness_score(None, 24).abs() < f64::EPSILON);
        assert!(completeness_score(Some(&stats), 0).abs() < f64::EPSILON);
    }
}
