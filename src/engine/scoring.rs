//! Risk, confidence, and time-horizon scoring.
//!
//! Both scores are deliberately simple weighted sums of bounded components so
//! every point of risk can be traced back to a named piece of evidence.

use serde::{Deserialize, Serialize};

use crate::types::TimeHorizon;

/// Weights for the risk components (sum to 100).
pub mod risk_weights {
    /// Deviation-ratio component: how far above baseline the bucket sits.
    pub const RATIO: f64 = 40.0;
    /// Variety/novelty component: breadth of distinct targets or artifacts.
    pub const VARIETY: f64 = 30.0;
    /// Sustained-growth component: all-or-nothing behavioral signal.
    pub const GROWTH: f64 = 30.0;
}

/// Weights for the confidence contributions (sum to 1.0).
pub mod confidence_weights {
    /// Baseline completeness over the expected window.
    pub const BASELINE_COMPLETENESS: f64 = 0.20;
    /// Sustained growth observed.
    pub const SUSTAINED_GROWTH: f64 = 0.30;
    /// Variety (or novelty, for fan-out) present.
    pub const VARIETY_PRESENT: f64 = 0.30;
    /// Reserved low-variance-noise slot; contributes fully until wired to a
    /// variance check.
    pub const LOW_VARIANCE_NOISE: f64 = 0.20;
}

/// Deviation-ratio span mapped onto [0, 1]: 1.0 is baseline, 5.0 saturates.
const RATIO_SPAN: f64 = 4.0;

/// Risk score plus the labels derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub risk_score: u8,
    pub confidence: f64,
    pub time_horizon: TimeHorizon,
}

fn clamp_unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Integer risk score in 0..=100.
///
/// An undefined deviation ratio contributes nothing (the gates normally make
/// this unreachable, but the scorer stays total).
pub fn compute_risk_score(
    deviation_ratio: Option<f64>,
    variety_metric: u64,
    variety_denominator: f64,
    sustained_growth: bool,
) -> u8 {
    let ratio = deviation_ratio.unwrap_or(0.0);
    let ratio_component = clamp_unit((ratio - 1.0) / RATIO_SPAN);
    let variety_component = clamp_unit(variety_metric as f64 / variety_denominator);
    let growth_component = if sustained_growth { 1.0 } else { 0.0 };

    let risk = ratio_component * risk_weights::RATIO
        + variety_component * risk_weights::VARIETY
        + growth_component * risk_weights::GROWTH;
    risk.round().clamp(0.0, 100.0) as u8
}

/// Confidence in 0.0..=1.0.
pub fn compute_confidence(
    baseline_completeness: f64,
    sustained_growth: bool,
    variety_present: bool,
) -> f64 {
    let mut confidence = confidence_weights::BASELINE_COMPLETENESS * clamp_unit(baseline_completeness);
    if sustained_growth {
        confidence += confidence_weights::SUSTAINED_GROWTH;
    }
    if variety_present {
        confidence += confidence_weights::VARIETY_PRESENT;
    }
    confidence += confidence_weights::LOW_VARIANCE_NOISE;
    clamp_unit(confidence)
}

/// Score one gated bucket: risk, confidence, and the derived horizon.
pub fn score_bucket(
    deviation_ratio: Option<f64>,
    variety_metric: u64,
    variety_denominator: f64,
    sustained_growth: bool,
    baseline_completeness: f64,
    variety_present: bool,
) -> ScoreResult {
    let risk_score = compute_risk_score(
        deviation_ratio,
        variety_metric,
        variety_denominator,
        sustained_growth,
    );
    ScoreResult {
        risk_score,
        confidence: compute_confidence(baseline_completeness, sustained_growth, variety_present),
        time_horizon: TimeHorizon::from_risk(risk_score),
    }
}
