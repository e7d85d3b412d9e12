//! Detection family identities: stable ids, display names, entity types, and
//! the per-family scoring parameters.

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// Subject type of a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A monitored endpoint or server.
    Host,
    /// A source IP address (authentication drift).
    SrcIp,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Host => write!(f, "host"),
            EntityType::SrcIp => write!(f, "src_ip"),
        }
    }
}

/// The five detection families sharing the drift pipeline.
///
/// Each family is the same pipeline with different event qualification,
/// artifact semantics, and scoring denominators. The variants carry no data;
/// all per-family parameters live in the accessor methods so the evaluator
/// can stay fully generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftKind {
    /// Internal connection fan-out (lateral-movement preparation).
    NetworkFanout,
    /// Authentication-failure drift (password spray).
    AuthSpray,
    /// Persistence-artifact drift (scheduled tasks / services).
    Persistence,
    /// Data-staging drift (archive creation / large files).
    DataStaging,
    /// Admin-tooling drift (remote execution tools).
    AdminTooling,
}

impl DriftKind {
    /// All families, in detection-id order.
    pub const ALL: [DriftKind; 5] = [
        DriftKind::NetworkFanout,
        DriftKind::AuthSpray,
        DriftKind::Persistence,
        DriftKind::DataStaging,
        DriftKind::AdminTooling,
    ];

    /// Stable detection identifier.
    pub const fn detection_id(self) -> &'static str {
        match self {
            DriftKind::NetworkFanout => "pde-spl-0401",
            DriftKind::AuthSpray => "pde-spl-0402",
            DriftKind::Persistence => "pde-spl-0403",
            DriftKind::DataStaging => "pde-spl-0404",
            DriftKind::AdminTooling => "pde-spl-0405",
        }
    }

    /// Human-readable signal label.
    pub const fn signal_name(self) -> &'static str {
        match self {
            DriftKind::NetworkFanout => "Emerging Lateral Movement Preparation",
            DriftKind::AuthSpray => "Password Spray Drift (Low-and-Slow)",
            DriftKind::Persistence => "Persistence Mechanism Drift (Tasks/Services)",
            DriftKind::DataStaging => "Data Staging Drift (Compression/Large File Activity)",
            DriftKind::AdminTooling => "Suspicious Admin Tooling Drift",
        }
    }

    /// Entity type the family keys on.
    pub const fn entity_type(self) -> EntityType {
        match self {
            DriftKind::AuthSpray => EntityType::SrcIp,
            _ => EntityType::Host,
        }
    }

    /// Denominator normalizing the variety metric into [0, 1] for scoring.
    ///
    /// Fan-out normalizes new internal targets, auth normalizes users
    /// targeted, persistence/staging normalize unique artifacts, admin
    /// tooling normalizes unique tools (the classifier emits at most six).
    pub const fn variety_denominator(self) -> f64 {
        match self {
            DriftKind::AuthSpray => 25.0,
            DriftKind::AdminTooling => 6.0,
            _ => 10.0,
        }
    }

    /// Conventional bucket width in seconds (15 minutes for auth, 1 hour
    /// otherwise).
    pub const fn default_bucket_seconds(self) -> i64 {
        match self {
            DriftKind::AuthSpray => defaults::AUTH_BUCKET_SECONDS,
            _ => defaults::HOURLY_BUCKET_SECONDS,
        }
    }

    /// Baseline buckets expected over a full 30-day window at the
    /// conventional bucket width.
    pub const fn default_expected_baseline_buckets(self) -> usize {
        match self {
            DriftKind::AuthSpray => defaults::EXPECTED_AUTH_BASELINE_BUCKETS,
            _ => defaults::EXPECTED_HOURLY_BASELINE_BUCKETS,
        }
    }

    /// Default minimum for the variety/novelty gate.
    pub const fn default_min_variety(self) -> u64 {
        match self {
            DriftKind::NetworkFanout => defaults::MIN_NEW_TARGETS,
            DriftKind::AuthSpray => defaults::MIN_USERS,
            DriftKind::Persistence | DriftKind::DataStaging => defaults::MIN_UNIQUE_ARTIFACTS,
            DriftKind::AdminTooling => defaults::MIN_UNIQUE_TOOLS,
        }
    }

    /// Resolve a family from its stable detection id.
    pub fn from_detection_id(id: &str) -> Option<DriftKind> {
        DriftKind::ALL.into_iter().find(|k| k.detection_id() == id)
    }
}

impl std::fmt::Display for DriftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detection_id())
    }
}
