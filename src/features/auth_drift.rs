//! Authentication-failure drift features (password spray).
//!
//! Entities are source IPs. Qualifying events are failed authentications with
//! a non-empty target user; the artifact token is the user, so
//! `variety_count` is the distinct users targeted per bucket.

use std::borrow::Cow;

use super::{collect_bucket_features, non_empty, FeatureError, Qualified};
use crate::config::defaults;
use crate::types::{BucketFeatures, TelemetryEvent};

/// True when the case-folded outcome string marks a failed authentication.
fn is_failure_outcome(outcome: &str) -> bool {
    let folded = outcome.to_ascii_lowercase();
    defaults::FAILURE_OUTCOMES.contains(&folded.as_str())
}

/// Per-source-IP, per-bucket failure counts and users targeted.
pub fn extract_auth_failure_bucket_features(
    events: &[TelemetryEvent],
    bucket_seconds: i64,
) -> Result<Vec<BucketFeatures>, FeatureError> {
    collect_bucket_features(events, bucket_seconds, "auth_drift", |event| {
        let src_ip = non_empty(&event.src_ip)?;
        let user = non_empty(&event.user)?;
        let outcome = non_empty(&event.outcome)?;
        if !is_failure_outcome(outcome) {
            return None;
        }
        Some(Qualified {
            entity: src_ip,
            artifact: Cow::Borrowed(user),
        })
    })
}
