//! Data-staging drift features (archive creation / large files).
//!
//! An event qualifies when the process name contains archive-tool keywords,
//! the file name carries an archive extension, or the file size crosses the
//! large-file limit. The artifact token prefers the most specific identifier
//! available: path, then name, then process.

use std::borrow::Cow;

use super::{collect_bucket_features, non_empty, FeatureError, Qualified};
use crate::config::defaults;
use crate::types::{BucketFeatures, TelemetryEvent};

fn is_staging_event(event: &TelemetryEvent, large_file_bytes: u64) -> bool {
    if let Some(process) = non_empty(&event.process_name) {
        let folded = process.to_ascii_lowercase();
        if defaults::STAGING_TOOL_KEYWORDS
            .iter()
            .any(|keyword| folded.contains(keyword))
        {
            return true;
        }
    }

    if let Some(file_name) = non_empty(&event.file_name) {
        let folded = file_name.to_ascii_lowercase();
        if defaults::ARCHIVE_EXTENSIONS
            .iter()
            .any(|ext| folded.ends_with(ext))
        {
            return true;
        }
    }

    matches!(event.file_size, Some(size) if size >= large_file_bytes)
}

fn artifact_for(event: &TelemetryEvent) -> Cow<'_, str> {
    non_empty(&event.file_path)
        .or_else(|| non_empty(&event.file_name))
        .or_else(|| non_empty(&event.process_name))
        .map_or(Cow::Borrowed("unknown_artifact"), Cow::Borrowed)
}

/// Per-host, per-bucket staging indicators using the default 100 MB
/// large-file limit.
pub fn extract_data_staging_bucket_features(
    events: &[TelemetryEvent],
    bucket_seconds: i64,
) -> Result<Vec<BucketFeatures>, FeatureError> {
    extract_data_staging_bucket_features_with_limit(
        events,
        bucket_seconds,
        defaults::LARGE_FILE_BYTES,
    )
}

/// Per-host, per-bucket staging indicators with a custom large-file limit.
pub fn extract_data_staging_bucket_features_with_limit(
    events: &[TelemetryEvent],
    bucket_seconds: i64,
    large_file_bytes: u64,
) -> Result<Vec<BucketFeatures>, FeatureError> {
    collect_bucket_features(events, bucket_seconds, "data_staging_drift", |event| {
        let host = non_empty(&event.host)?;
        if !is_staging_event(event, large_file_bytes) {
            return None;
        }
        Some(Qualified {
            entity: host,
            artifact: artifact_for(event),
        })
    })
}
