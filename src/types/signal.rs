//! Signal types: TimeHorizon, Signal, Evaluation

use serde::{Deserialize, Serialize};

use super::EntityType;

/// How soon the flagged behavior is expected to matter, derived from risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeHorizon {
    /// Risk below 70: worth a look, not urgent.
    Early,
    /// Risk 70..=85: the behavior is building.
    Emerging,
    /// Risk 86 and above: act now.
    Imminent,
}

impl TimeHorizon {
    /// Risk score at or above which the horizon is `Imminent`.
    pub const IMMINENT_RISK: u8 = 86;
    /// Risk score at or above which the horizon is at least `Emerging`.
    pub const EMERGING_RISK: u8 = 70;

    /// Map an integer risk score onto the closed horizon set.
    pub const fn from_risk(risk_score: u8) -> Self {
        if risk_score >= Self::IMMINENT_RISK {
            TimeHorizon::Imminent
        } else if risk_score >= Self::EMERGING_RISK {
            TimeHorizon::Emerging
        } else {
            TimeHorizon::Early
        }
    }
}

impl std::fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeHorizon::Early => write!(f, "early"),
            TimeHorizon::Emerging => write!(f, "emerging"),
            TimeHorizon::Imminent => write!(f, "imminent"),
        }
    }
}

/// A risk-scored, evidence-carrying assertion about one (entity, bucket).
///
/// Signals are immutable once produced and freshly allocated per evaluation;
/// nothing persists between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Human-readable label for the detection family.
    pub signal_name: String,
    /// Stable detection identifier (`pde-spl-04xx`).
    pub detection_id: String,
    /// Whether the entity is a host or a source IP.
    pub entity_type: EntityType,
    /// The entity the signal is about.
    pub entity_key: String,
    /// Start of the flagged bucket (epoch seconds).
    pub bucket_start: i64,
    /// Risk score, 0..=100.
    pub risk_score: u8,
    /// Confidence, 0.0..=1.0.
    pub confidence: f64,
    /// Urgency label derived from the risk score.
    pub time_horizon: TimeHorizon,
    /// Qualifying events in the flagged bucket.
    pub primary_count: u64,
    /// Distinct artifacts in the flagged bucket.
    pub variety_count: u64,
    /// Baseline average of the primary metric, when a baseline exists.
    pub baseline_avg_primary: Option<f64>,
    /// `primary_count / baseline_avg_primary`, when defined.
    pub deviation_ratio: Option<f64>,
    /// Buckets in the rolling window whose primary metric grew.
    pub growth_hits: u32,
    /// Fan-out only: destinations never seen in the baseline (true novelty),
    /// or the count proxy when destination sets were not supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_targets: Option<u64>,
}

/// Result of one evaluator run: the emitted signals plus their count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Number of signals emitted (always `signals.len()`).
    pub count: usize,
    /// Emitted signals, in observation `(entity, bucket)` order.
    pub signals: Vec<Signal>,
}

impl From<Vec<Signal>> for Evaluation {
    fn from(signals: Vec<Signal>) -> Self {
        Self {
            count: signals.len(),
            signals,
        }
    }
}
