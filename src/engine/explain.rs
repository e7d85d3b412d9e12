//! Analyst-facing explanation rendering.
//!
//! Turns a signal into a headline, a narrative parameterized by the actual
//! evidence values, scalar evidence bullets, and a fixed list of
//! investigative next steps per detection family. Deterministic; no I/O.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DriftKind, Signal};

/// Rendered explanation of one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// One-line summary naming the detection and the entity.
    pub headline: String,
    /// Multi-sentence narrative built from the evidence values.
    pub narrative: String,
    /// Scalar evidence bullets, one per signal field.
    pub evidence: Vec<String>,
    /// Investigative next steps for the detection family.
    pub next_steps: Vec<String>,
}

/// Render the bucket start as a UTC datetime, falling back to raw epoch
/// seconds for out-of-range values.
fn format_bucket_start(bucket_start: i64) -> String {
    Utc.timestamp_opt(bucket_start, 0)
        .single()
        .map_or_else(|| format!("epoch {bucket_start}"), |dt| {
            dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
        })
}

/// What the primary/variety counts mean for each family, in analyst words.
const fn family_nouns(kind: Option<DriftKind>) -> (&'static str, &'static str) {
    match kind {
        Some(DriftKind::NetworkFanout) => ("internal connections", "unique internal destinations"),
        Some(DriftKind::AuthSpray) => ("authentication failures", "unique users targeted"),
        Some(DriftKind::Persistence) => ("persistence events", "unique tasks/services"),
        Some(DriftKind::DataStaging) => ("staging events", "unique staged artifacts"),
        Some(DriftKind::AdminTooling) => ("admin tool executions", "unique admin tools"),
        None => ("qualifying events", "distinct artifacts"),
    }
}

fn next_steps_for(kind: Option<DriftKind>) -> Vec<String> {
    let steps: &[&str] = match kind {
        Some(DriftKind::NetworkFanout) => &[
            "Validate expected activity: patching, deployment, scanning, monitoring, or backup tasks.",
            "Review the top internal destinations contacted and identify whether they are new or unusual for this host.",
            "Pivot to authentication telemetry for the same host and time window (failed logons, new logon types, remote logons).",
            "If endpoint telemetry is available, identify the process/user responsible for outbound connections.",
            "If this host is non-admin or non-management, treat as higher priority and broaden scope to adjacent hosts.",
        ],
        Some(DriftKind::AuthSpray) => &[
            "Check whether the source IP is a known VPN egress, proxy, or scanner before escalating.",
            "Review the targeted account list for patterns (alphabetical sweeps, service accounts, executives).",
            "Look for any successful authentication from the same source during or after the failure window.",
            "Correlate with lockout events and MFA prompts for the targeted users.",
            "If the source is external, consider temporary blocking and retroactive scoping across the estate.",
        ],
        Some(DriftKind::Persistence) => &[
            "Inspect the created tasks/services: binary paths, arguments, and signing status.",
            "Identify the account and parent process responsible for the registrations.",
            "Compare artifact names against approved software deployment and patching activity.",
            "Check for matching persistence on adjacent hosts within the same window.",
            "If artifacts are unrecognized, acquire the referenced binaries for analysis before removal.",
        ],
        Some(DriftKind::DataStaging) => &[
            "Identify the archives or large files created and their current location on disk.",
            "Determine the responsible process and interactive user for the staging activity.",
            "Check for egress activity (cloud uploads, external transfers) from the same host after staging.",
            "Review what data sources the staged files were read from (file shares, databases, mailboxes).",
            "If staging is unexplained, preserve the artifacts and host state before cleanup.",
        ],
        Some(DriftKind::AdminTooling) => &[
            "Confirm whether the tooling maps to scheduled administration or change-management work.",
            "Identify the operator account and source session behind the tool executions.",
            "Review the targets of remote execution (hosts named in command lines) for follow-on activity.",
            "Compare the tool mix against the host's role; workstations rarely need service-control utilities.",
            "If unexplained, capture command lines and pivot to lateral-movement hunting across named targets.",
        ],
        None => &[
            "Validate whether the activity maps to approved operational work.",
            "Identify the responsible process and account for the flagged window.",
            "Broaden the time window and look for the same drift on adjacent entities.",
        ],
    };
    steps.iter().map(|s| (*s).to_string()).collect()
}

fn narrative_for(signal: &Signal, kind: Option<DriftKind>) -> String {
    let (primary_noun, variety_noun) = family_nouns(kind);
    let window = format_bucket_start(signal.bucket_start);

    let mut narrative = match (signal.deviation_ratio, signal.baseline_avg_primary) {
        (Some(ratio), Some(avg)) => format!(
            "{} {} is drifting from its historical norms. In the bucket starting {}, it \
             produced {} {} across {} {}, {:.2}x its baseline average of {:.1}.",
            signal.entity_type,
            signal.entity_key,
            window,
            signal.primary_count,
            primary_noun,
            signal.variety_count,
            variety_noun,
            ratio,
            avg,
        ),
        _ => format!(
            "{} {} is drifting from its historical norms. In the bucket starting {}, it \
             produced {} {} across {} {}.",
            signal.entity_type,
            signal.entity_key,
            window,
            signal.primary_count,
            primary_noun,
            signal.variety_count,
            variety_noun,
        ),
    };

    narrative.push_str(&format!(
        " The increase was sustained across {} growth-hit buckets in the rolling window.",
        signal.growth_hits
    ));

    if let Some(new_targets) = signal.new_targets {
        narrative.push_str(&format!(
            " {new_targets} of the contacted destinations never appeared in the baseline, \
             which is consistent with early-stage lateral movement preparation."
        ));
    }

    narrative
}

/// Render one signal into an analyst-friendly explanation.
pub fn explain_signal(signal: &Signal) -> Explanation {
    let kind = DriftKind::from_detection_id(&signal.detection_id);
    let (primary_noun, variety_noun) = family_nouns(kind);

    let mut evidence = vec![
        format!("Bucket start: {}", format_bucket_start(signal.bucket_start)),
        format!("{primary_noun} (current): {}", signal.primary_count),
        format!("{variety_noun} (current): {}", signal.variety_count),
        format!(
            "Baseline avg: {}",
            signal
                .baseline_avg_primary
                .map_or_else(|| "unknown".to_string(), |avg| format!("{avg:.2}")),
        ),
        format!(
            "Baseline deviation ratio: {}",
            signal
                .deviation_ratio
                .map_or_else(|| "unknown".to_string(), |ratio| format!("{ratio:.2}")),
        ),
        format!("Sustained growth hits (rolling): {}", signal.growth_hits),
    ];
    if let Some(new_targets) = signal.new_targets {
        evidence.push(format!("New internal targets: {new_targets}"));
    }
    evidence.push(format!("Risk score: {}", signal.risk_score));
    evidence.push(format!("Confidence: {:.2}", signal.confidence));
    evidence.push(format!("Time horizon: {}", signal.time_horizon));

    Explanation {
        headline: format!(
            "{} on {} {}",
            signal.signal_name, signal.entity_type, signal.entity_key
        ),
        narrative: narrative_for(signal, kind),
        evidence,
        next_steps: next_steps_for(kind),
    }
}
