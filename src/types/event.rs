//! Raw telemetry event record.

use serde::{Deserialize, Serialize};

/// A single normalized telemetry event.
///
/// Every field is optional at the schema level: telemetry is noisy and sources
/// disagree on which fields they carry. Serde aliases absorb the common SIEM
/// spellings (`_time`, `EventCode`, `TaskName`, ...). Each feature extractor
/// silently drops events that lack its required fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryEvent {
    /// Event time in epoch seconds.
    #[serde(alias = "_time")]
    pub timestamp: Option<i64>,
    /// Host that produced the event (entity key for most detections).
    pub host: Option<String>,
    /// Source IP of the event (entity key for auth-failure drift).
    pub src_ip: Option<String>,
    /// Destination IP for network events.
    pub dest_ip: Option<String>,
    /// Account name targeted by an authentication attempt.
    pub user: Option<String>,
    /// Authentication outcome string (`success`, `failure`, ...).
    pub outcome: Option<String>,
    /// Windows event code (4698 = scheduled task created, 7045 = service installed).
    #[serde(alias = "EventCode")]
    pub event_code: Option<i64>,
    /// Scheduled task name.
    #[serde(alias = "TaskName")]
    pub task_name: Option<String>,
    /// Installed service name.
    #[serde(alias = "ServiceName")]
    pub service_name: Option<String>,
    /// Process image name.
    pub process_name: Option<String>,
    /// Name of the file touched by the event.
    pub file_name: Option<String>,
    /// Full path of the file touched by the event.
    pub file_path: Option<String>,
    /// File size in bytes.
    pub file_size: Option<u64>,
    /// Full process command line.
    pub command_line: Option<String>,
}
