//! Engine configuration: evaluation thresholds and system-wide defaults.

use serde::{Deserialize, Serialize};

use crate::types::DriftKind;

/// System-wide default constants.
///
/// Centralises the magic numbers of the pipeline. Grouped by concern for
/// easy discovery.
pub mod defaults {
    // ========================================================================
    // Bucketing
    // ========================================================================

    /// Conventional bucket width for host-keyed detections (seconds).
    pub const HOURLY_BUCKET_SECONDS: i64 = 3600;

    /// Conventional bucket width for authentication drift (seconds).
    pub const AUTH_BUCKET_SECONDS: i64 = 900;

    // ========================================================================
    // Baseline window
    // ========================================================================

    /// Length of the historical baseline window (days).
    pub const BASELINE_WINDOW_DAYS: usize = 30;

    /// Expected baseline buckets for hourly detections (30 days at 1 h).
    pub const EXPECTED_HOURLY_BASELINE_BUCKETS: usize = BASELINE_WINDOW_DAYS * 24;

    /// Expected baseline buckets for auth drift (30 days at 15 min).
    pub const EXPECTED_AUTH_BASELINE_BUCKETS: usize = BASELINE_WINDOW_DAYS * 24 * 4;

    /// Minimum baseline buckets before the deviation gate can fire.
    ///
    /// One full day of hourly history. Small test fixtures pass 1.
    pub const MIN_BASELINE_BUCKETS: usize = 24;

    // ========================================================================
    // Gating
    // ========================================================================

    /// Deviation-ratio gate threshold (current / baseline average).
    pub const DEVIATION_RATIO_THRESHOLD: f64 = 2.5;

    /// Rolling growth window: buckets that must all have grown.
    pub const SUSTAINED_BUCKETS: usize = 3;

    /// Fan-out: minimum new internal targets.
    pub const MIN_NEW_TARGETS: u64 = 3;

    /// Auth drift: minimum distinct users targeted.
    pub const MIN_USERS: u64 = 10;

    /// Persistence / staging: minimum distinct artifacts.
    pub const MIN_UNIQUE_ARTIFACTS: u64 = 2;

    /// Admin tooling: minimum distinct tools.
    pub const MIN_UNIQUE_TOOLS: u64 = 2;

    // ========================================================================
    // Event qualification
    // ========================================================================

    /// Windows event codes treated as persistence artifacts
    /// (4698 = scheduled task created, 7045 = service installed).
    pub const PERSISTENCE_EVENT_CODES: [i64; 2] = [4698, 7045];

    /// File size at or above which an event counts as staging (bytes).
    pub const LARGE_FILE_BYTES: u64 = 100_000_000;

    /// Process-name substrings indicating archive tooling.
    pub const STAGING_TOOL_KEYWORDS: [&str; 7] =
        ["7z", "7za", "rar", "winzip", "zip", "tar", "gzip"];

    /// File extensions indicating archive output.
    pub const ARCHIVE_EXTENSIONS: [&str; 5] = [".zip", ".7z", ".rar", ".tar", ".gz"];

    /// Case-folded outcome strings counted as authentication failures.
    pub const FAILURE_OUTCOMES: [&str; 3] = ["failure", "failed", "fail"];
}

/// Per-call evaluation thresholds.
///
/// The three gates of the evaluator plus the baseline-quality knobs. The
/// struct is serde-derived so adapters (HTTP handlers, CLI runners) can
/// deserialize it straight out of their own request/config formats; absent
/// fields fall back to the generic defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftThresholds {
    /// Gate A: minimum `primary_count / baseline_avg` ratio.
    pub deviation_ratio_threshold: f64,
    /// Gate B: rolling window size; every bucket in it must have grown.
    pub sustained_buckets: usize,
    /// Gate C: minimum variety (users / artifacts / tools) or, for fan-out,
    /// minimum new internal targets.
    pub min_variety: u64,
    /// Baseline buckets an entity needs before gate A is defined.
    pub min_baseline_buckets: usize,
    /// Bucket count a complete baseline window would contain; drives the
    /// confidence completeness term.
    pub expected_baseline_buckets: usize,
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self {
            deviation_ratio_threshold: defaults::DEVIATION_RATIO_THRESHOLD,
            sustained_buckets: defaults::SUSTAINED_BUCKETS,
            min_variety: defaults::MIN_UNIQUE_ARTIFACTS,
            min_baseline_buckets: defaults::MIN_BASELINE_BUCKETS,
            expected_baseline_buckets: defaults::EXPECTED_HOURLY_BASELINE_BUCKETS,
        }
    }
}

impl DriftThresholds {
    /// Conventional thresholds for a detection family.
    pub fn for_kind(kind: DriftKind) -> Self {
        Self {
            min_variety: kind.default_min_variety(),
            expected_baseline_buckets: kind.default_expected_baseline_buckets(),
            ..Self::default()
        }
    }
}
