//! Network fan-out drift features (lateral-movement preparation).
//!
//! Qualifying events are connections to RFC1918 destinations; the artifact
//! token is the destination IP, so `variety_count` is the distinct internal
//! destinations contacted per bucket. This family additionally exposes the
//! raw per-bucket destination sets so the evaluator can compute true novelty
//! via set difference against the baseline union.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;

use super::{collect_bucket_features, non_empty, FeatureError, Qualified};
use crate::types::{BucketFeatures, EntityBucket, TelemetryEvent};

/// True when `ip` parses as IPv4 and lies in RFC1918 private space
/// (10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16).
pub fn is_rfc1918(ip: &str) -> bool {
    ip.trim().parse::<Ipv4Addr>().is_ok_and(|addr| addr.is_private())
}

fn qualify(event: &TelemetryEvent) -> Option<Qualified<'_>> {
    let host = non_empty(&event.host)?;
    let dest = non_empty(&event.dest_ip)?;
    if !is_rfc1918(dest) {
        return None;
    }
    Some(Qualified {
        entity: host,
        artifact: Cow::Borrowed(dest),
    })
}

/// Per-host, per-bucket fan-out features over internal traffic.
pub fn extract_fanout_bucket_features(
    events: &[TelemetryEvent],
    bucket_seconds: i64,
) -> Result<Vec<BucketFeatures>, FeatureError> {
    collect_bucket_features(events, bucket_seconds, "network_fanout", qualify)
}

/// Per-bucket internal destination sets, keyed by `(host, bucket_start)`.
///
/// Feeds the true-novelty computation; same qualification rules as
/// [`extract_fanout_bucket_features`].
pub fn extract_dest_sets_by_bucket(
    events: &[TelemetryEvent],
    bucket_seconds: i64,
) -> Result<HashMap<EntityBucket, HashSet<String>>, FeatureError> {
    if bucket_seconds <= 0 {
        return Err(FeatureError::InvalidBucketSeconds(bucket_seconds));
    }

    let mut dest_sets: HashMap<EntityBucket, HashSet<String>> = HashMap::new();
    for event in events {
        let (Some(timestamp), Some(qualified)) = (event.timestamp, qualify(event)) else {
            continue;
        };
        let bucket_start = timestamp.div_euclid(bucket_seconds) * bucket_seconds;
        dest_sets
            .entry((qualified.entity.to_string(), bucket_start))
            .or_default()
            .insert(qualified.artifact.into_owned());
    }
    Ok(dest_sets)
}
