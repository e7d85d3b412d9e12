//! Stage-1 feature extraction: collapse raw events into per-entity,
//! per-bucket records.
//!
//! Each detection family contributes a qualifier (which events count) and an
//! artifact extractor (which token feeds the variety set); the bucketizing
//! walk itself is shared. Per-event problems (missing timestamp, empty entity,
//! absent required fields, qualifier rejection) drop the event silently;
//! telemetry is noisy and one bad event must not sink the batch. A
//! non-positive bucket width is a caller error and fails the whole call.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

use thiserror::Error;
use tracing::debug;

use crate::types::{BucketFeatures, TelemetryEvent};

pub mod admin_tooling;
pub mod auth_drift;
pub mod data_staging;
pub mod network_fanout;
pub mod persistence;

/// Caller-contract violations at the extraction boundary.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("bucket width must be positive, got {0} seconds")]
    InvalidBucketSeconds(i64),
}

/// Align an epoch timestamp to the start of its bucket.
///
/// Buckets are half-open intervals `[floor(t / W) * W, floor(t / W) * W + W)`
/// identified by their start. Uses floor division so pre-epoch timestamps
/// still align downward.
pub fn bucket_epoch(timestamp: i64, bucket_seconds: i64) -> Result<i64, FeatureError> {
    if bucket_seconds <= 0 {
        return Err(FeatureError::InvalidBucketSeconds(bucket_seconds));
    }
    Ok(timestamp.div_euclid(bucket_seconds) * bucket_seconds)
}

/// A qualifying event reduced to its entity key and artifact token.
pub(crate) struct Qualified<'a> {
    pub entity: &'a str,
    pub artifact: Cow<'a, str>,
}

/// Trimmed, non-empty view of an optional event field.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Shared bucketizing walk.
///
/// Indexes qualifying events by `(entity, bucket_start)`, counting
/// occurrences and collecting the distinct-artifact set, then materializes
/// one `BucketFeatures` per pair. The `BTreeMap` index gives the sorted
/// `(entity_key, bucket_start)` output the downstream stages rely on.
pub(crate) fn collect_bucket_features<'a, F>(
    events: &'a [TelemetryEvent],
    bucket_seconds: i64,
    family: &'static str,
    mut qualify: F,
) -> Result<Vec<BucketFeatures>, FeatureError>
where
    F: FnMut(&'a TelemetryEvent) -> Option<Qualified<'a>>,
{
    if bucket_seconds <= 0 {
        return Err(FeatureError::InvalidBucketSeconds(bucket_seconds));
    }

    let mut index: BTreeMap<(String, i64), (u64, HashSet<String>)> = BTreeMap::new();
    let mut dropped = 0_usize;

    for event in events {
        let (Some(timestamp), Some(qualified)) = (event.timestamp, qualify(event)) else {
            dropped += 1;
            continue;
        };
        let bucket_start = timestamp.div_euclid(bucket_seconds) * bucket_seconds;
        let (primary, artifacts) = index
            .entry((qualified.entity.to_string(), bucket_start))
            .or_default();
        *primary += 1;
        if !artifacts.contains(qualified.artifact.as_ref()) {
            artifacts.insert(qualified.artifact.into_owned());
        }
    }

    if dropped > 0 {
        debug!(family, dropped, kept = events.len() - dropped, "dropped non-qualifying events");
    }

    Ok(index
        .into_iter()
        .map(|((entity_key, bucket_start), (primary_count, artifacts))| BucketFeatures {
            entity_key,
            bucket_start,
            primary_count,
            variety_count: artifacts.len() as u64,
            baseline_deviation_ratio: None,
        })
        .collect())
}
