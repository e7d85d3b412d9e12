//! Persistence-artifact drift features (scheduled tasks / services).
//!
//! Qualifying events carry one of the configured Windows event codes; the
//! artifact token is the task or service name, with stable placeholder tokens
//! when the name field is missing so nameless events still feed the variety
//! set deterministically.

use std::borrow::Cow;

use super::{collect_bucket_features, non_empty, FeatureError, Qualified};
use crate::config::defaults;
use crate::types::{BucketFeatures, TelemetryEvent};

const SCHEDULED_TASK_CREATED: i64 = 4698;
const SERVICE_INSTALLED: i64 = 7045;

fn artifact_for(event: &TelemetryEvent, event_code: i64) -> Cow<'_, str> {
    match event_code {
        SCHEDULED_TASK_CREATED => non_empty(&event.task_name)
            .map_or(Cow::Borrowed("unknown_task"), Cow::Borrowed),
        SERVICE_INSTALLED => non_empty(&event.service_name)
            .map_or(Cow::Borrowed("unknown_service"), Cow::Borrowed),
        _ => non_empty(&event.task_name)
            .or_else(|| non_empty(&event.service_name))
            .map_or(Cow::Borrowed("unknown_artifact"), Cow::Borrowed),
    }
}

/// Per-host, per-bucket persistence events using the default code set
/// (4698 scheduled task created, 7045 service installed).
pub fn extract_persistence_bucket_features(
    events: &[TelemetryEvent],
    bucket_seconds: i64,
) -> Result<Vec<BucketFeatures>, FeatureError> {
    extract_persistence_bucket_features_with_codes(
        events,
        bucket_seconds,
        &defaults::PERSISTENCE_EVENT_CODES,
    )
}

/// Per-host, per-bucket persistence events for a custom event-code set.
pub fn extract_persistence_bucket_features_with_codes(
    events: &[TelemetryEvent],
    bucket_seconds: i64,
    event_codes: &[i64],
) -> Result<Vec<BucketFeatures>, FeatureError> {
    collect_bucket_features(events, bucket_seconds, "persistence_drift", |event| {
        let host = non_empty(&event.host)?;
        let code = event.event_code?;
        if !event_codes.contains(&code) {
            return None;
        }
        Some(Qualified {
            entity: host,
            artifact: artifact_for(event, code),
        })
    })
}
