//! Per-bucket feature records shared by all detection families.

use serde::{Deserialize, Serialize};

/// Key identifying one (entity, bucket) pair in growth and novelty maps.
pub type EntityBucket = (String, i64);

/// Stage-1 output: features for a single entity in a single time bucket.
///
/// `primary_count` is the family's primary scalar (connections, failures,
/// events); `variety_count` is the cardinality of the family's distinct-thing
/// set (destinations, users, artifacts, tools). Invariants upheld by the
/// extractor: `primary_count >= variety_count`, `bucket_start` aligned to the
/// bucket width, and `(entity_key, bucket_start)` unique and ascending within
/// any produced list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketFeatures {
    /// Entity the bucket belongs to (host or src_ip depending on the family).
    pub entity_key: String,
    /// Bucket start in epoch seconds, aligned to the bucket width.
    pub bucket_start: i64,
    /// Count of qualifying events in this bucket.
    pub primary_count: u64,
    /// Distinct artifact tokens observed in this bucket.
    pub variety_count: u64,
    /// `primary_count / baseline_avg`, filled by the baseline stage.
    ///
    /// `None` until applied, or when the entity has no usable baseline
    /// (absent entry, zero average, or too few baseline buckets).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_deviation_ratio: Option<f64>,
}

impl BucketFeatures {
    /// Construct a stage-1 record with the deviation ratio unset.
    pub fn new(entity_key: impl Into<String>, bucket_start: i64, primary_count: u64, variety_count: u64) -> Self {
        Self {
            entity_key: entity_key.into(),
            bucket_start,
            primary_count,
            variety_count,
            baseline_deviation_ratio: None,
        }
    }

    /// Borrowed ordering key matching the pipeline's `(entity, bucket)` sort.
    pub fn sort_key(&self) -> (&str, i64) {
        (self.entity_key.as_str(), self.bucket_start)
    }
}
