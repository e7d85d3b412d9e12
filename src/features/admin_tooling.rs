//! Admin-tooling drift features (remote execution tools).
//!
//! A substring classifier maps process/command indicators to a closed set of
//! normalized tool labels; unclassified events are dropped. The artifact
//! token is the tool label, so `variety_count` is the distinct tools seen
//! per bucket (at most six).

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::{collect_bucket_features, non_empty, FeatureError, Qualified};
use crate::types::{BucketFeatures, TelemetryEvent};

/// Normalized remote-administration tool labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminTool {
    PsExec,
    Wmi,
    WinRm,
    Schtasks,
    Sc,
    PowerShell,
}

impl AdminTool {
    /// Wire label used in artifacts and rendered output.
    pub const fn label(self) -> &'static str {
        match self {
            AdminTool::PsExec => "psexec",
            AdminTool::Wmi => "wmi",
            AdminTool::WinRm => "winrm",
            AdminTool::Schtasks => "schtasks",
            AdminTool::Sc => "sc",
            AdminTool::PowerShell => "powershell",
        }
    }
}

impl std::fmt::Display for AdminTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Map process/command indicators to a normalized tool label.
///
/// Substring-based on purpose: telemetry paths and wrappers vary too much
/// for exact matching. The `sc` patterns are narrow (`sc.exe` suffix or a
/// standalone ` sc ` token) because the two-letter name collides with
/// ordinary words. PowerShell stays in scope even though it is noisy.
pub fn classify_tool(process_name: &str, command_line: &str) -> Option<AdminTool> {
    let process = process_name.to_ascii_lowercase();
    let command = command_line.to_ascii_lowercase();

    if process.contains("psexec")
        || process.contains("paexec")
        || command.contains("psexec")
        || command.contains("paexec")
    {
        return Some(AdminTool::PsExec);
    }

    if process.contains("wmic") || process.contains("wmiprvse") || command.contains("wmic") {
        return Some(AdminTool::Wmi);
    }

    if process.contains("winrm")
        || process.contains("winrs")
        || command.contains("winrm")
        || command.contains("winrs")
    {
        return Some(AdminTool::WinRm);
    }

    if process.contains("schtasks") || command.contains("schtasks") {
        return Some(AdminTool::Schtasks);
    }

    if process.ends_with("sc.exe")
        || format!(" {command} ").contains(" sc ")
        || command.contains("\\sc.exe")
    {
        return Some(AdminTool::Sc);
    }

    if process.ends_with("powershell.exe") || command.contains("powershell") {
        return Some(AdminTool::PowerShell);
    }

    None
}

/// Per-host, per-bucket admin-tool executions.
pub fn extract_admin_tooling_bucket_features(
    events: &[TelemetryEvent],
    bucket_seconds: i64,
) -> Result<Vec<BucketFeatures>, FeatureError> {
    collect_bucket_features(events, bucket_seconds, "admin_tooling_drift", |event| {
        let host = non_empty(&event.host)?;
        let process = non_empty(&event.process_name).unwrap_or("");
        let command = non_empty(&event.command_line).unwrap_or("");
        let tool = classify_tool(process, command)?;
        Some(Qualified {
            entity: host,
            artifact: Cow::Borrowed(tool.label()),
        })
    })
}
