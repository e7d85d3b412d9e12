//! Fan-out Detection Regression Tests
//!
//! Exercises the full pde-spl-0401 pipeline from raw telemetry events through
//! extraction, baseline aggregation, growth detection, novelty, evaluation,
//! and explanation rendering.

use std::collections::HashMap;
use std::collections::HashSet;

use anyhow::Result;
use driftwatch::engine::build_baseline_union;
use driftwatch::{
    evaluate_network_fanout, explain_signal, extract_dest_sets_by_bucket,
    extract_fanout_bucket_features, BucketFeatures, DriftThresholds, EntityType, Evaluation,
    NoveltySets, TelemetryEvent,
};

const BASE: i64 = 1_700_000_000;

fn conn(timestamp: i64, host: &str, dest_ip: &str) -> TelemetryEvent {
    TelemetryEvent {
        timestamp: Some(timestamp),
        host: Some(host.to_string()),
        dest_ip: Some(dest_ip.to_string()),
        ..TelemetryEvent::default()
    }
}

/// Split bucketed records into the first `baseline_buckets` per entity and
/// the remainder, both in `(entity, bucket_start)` order.
fn split_baseline_observation(
    bucketed: Vec<BucketFeatures>,
    baseline_buckets: usize,
) -> (Vec<BucketFeatures>, Vec<BucketFeatures>) {
    let mut by_entity: HashMap<String, Vec<BucketFeatures>> = HashMap::new();
    for record in bucketed {
        by_entity.entry(record.entity_key.clone()).or_default().push(record);
    }

    let mut baseline = Vec::new();
    let mut observation = Vec::new();
    for (_, mut rows) in by_entity {
        rows.sort_by_key(|r| r.bucket_start);
        let tail = rows.split_off(baseline_buckets.min(rows.len()));
        baseline.extend(rows);
        observation.extend(tail);
    }
    baseline.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    observation.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    (baseline, observation)
}

/// Baseline: three hours contacting {10.0.0.10, 10.0.0.11}. Observation:
/// hours with 4, 6, 8 destinations disjoint from the baseline.
fn fanout_drift_events() -> Vec<TelemetryEvent> {
    let mut events = Vec::new();
    for hour in 0..3 {
        let t = BASE + hour * 3600;
        events.push(conn(t + 10, "hostA", "10.0.0.10"));
        events.push(conn(t + 20, "hostA", "10.0.0.11"));
    }
    for (hour, dest_count) in [(3_i64, 4_i64), (4, 6), (5, 8)] {
        let t = BASE + hour * 3600;
        for j in 0..dest_count {
            events.push(conn(t + 10 + j, "hostA", &format!("10.0.{hour}.{j}")));
        }
    }
    events
}

fn permissive_thresholds() -> DriftThresholds {
    DriftThresholds {
        deviation_ratio_threshold: 2.0,
        sustained_buckets: 2,
        min_variety: 2,
        min_baseline_buckets: 1,
        expected_baseline_buckets: 3,
    }
}

#[test]
fn test_fanout_signal_full_pipeline() -> Result<()> {
    let events = fanout_drift_events();
    let bucketed = extract_fanout_bucket_features(&events, 3600)?;
    let (baseline, observation) = split_baseline_observation(bucketed, 3);

    let eval = evaluate_network_fanout(&baseline, &observation, &permissive_thresholds(), None)?;
    assert!(eval.count >= 1, "expected at least one fan-out signal");

    let signal = &eval.signals[0];
    assert_eq!(signal.detection_id, "pde-spl-0401");
    assert_eq!(signal.entity_type, EntityType::Host);
    assert_eq!(signal.entity_key, "hostA");
    assert_eq!(signal.primary_count, 8, "signal should fire on the 8-destination hour");
    assert!(signal.deviation_ratio.expect("ratio defined") >= 2.0);
    assert!(signal.growth_hits >= 2);
    Ok(())
}

#[test]
fn test_no_signal_when_variety_gate_out_of_reach() -> Result<()> {
    let events = fanout_drift_events();
    let bucketed = extract_fanout_bucket_features(&events, 3600)?;
    let (baseline, observation) = split_baseline_observation(bucketed, 3);

    let thresholds = DriftThresholds {
        min_variety: 100,
        ..permissive_thresholds()
    };
    let eval = evaluate_network_fanout(&baseline, &observation, &thresholds, None)?;
    assert_eq!(eval.count, 0);
    Ok(())
}

#[test]
fn test_no_signal_without_baseline() -> Result<()> {
    let events = fanout_drift_events();
    let bucketed = extract_fanout_bucket_features(&events, 3600)?;
    let (_, observation) = split_baseline_observation(bucketed, 3);

    let eval = evaluate_network_fanout(&[], &observation, &permissive_thresholds(), None)?;
    assert_eq!(eval.count, 0, "the deviation gate is undefined without a baseline");
    Ok(())
}

/// True novelty versus the count proxy: the signal bucket contacts
/// {10.0.0.10, 10.0.0.20, 10.0.0.21}, one of which is a baseline regular.
#[test]
fn test_true_novelty_vs_proxy() -> Result<()> {
    let mut events = Vec::new();
    for hour in 0..3 {
        let t = BASE + hour * 3600;
        events.push(conn(t + 10, "hostA", "10.0.0.10"));
        events.push(conn(t + 20, "hostA", "10.0.0.11"));
    }
    // first observation hour repeats the baseline pair (no signal: no growth yet)
    let t3 = BASE + 3 * 3600;
    events.push(conn(t3 + 10, "hostA", "10.0.0.10"));
    events.push(conn(t3 + 20, "hostA", "10.0.0.11"));
    // second observation hour: one baseline regular plus two new destinations
    let t4 = BASE + 4 * 3600;
    events.push(conn(t4 + 10, "hostA", "10.0.0.10"));
    events.push(conn(t4 + 20, "hostA", "10.0.0.20"));
    events.push(conn(t4 + 30, "hostA", "10.0.0.21"));

    let bucketed = extract_fanout_bucket_features(&events, 3600)?;
    let dest_sets = extract_dest_sets_by_bucket(&events, 3600)?;
    let (baseline, observation) = split_baseline_observation(bucketed, 3);

    let obs_start = observation[0].bucket_start;
    let baseline_sets: HashMap<_, HashSet<String>> = dest_sets
        .iter()
        .filter(|((_, bucket_start), _)| *bucket_start < obs_start)
        .map(|(key, set)| (key.clone(), set.clone()))
        .collect();
    let novelty = NoveltySets {
        current_dest_sets: dest_sets,
        baseline_union: build_baseline_union(&baseline_sets),
    };

    let thresholds = DriftThresholds {
        deviation_ratio_threshold: 1.0,
        sustained_buckets: 1,
        min_variety: 1,
        min_baseline_buckets: 1,
        expected_baseline_buckets: 3,
    };

    let with_sets = evaluate_network_fanout(&baseline, &observation, &thresholds, Some(&novelty))?;
    assert_eq!(with_sets.count, 1);
    assert_eq!(
        with_sets.signals[0].new_targets,
        Some(2),
        "true novelty excludes the baseline regular"
    );

    let with_proxy = evaluate_network_fanout(&baseline, &observation, &thresholds, None)?;
    assert_eq!(with_proxy.count, 1);
    assert_eq!(
        with_proxy.signals[0].new_targets,
        Some(3),
        "the proxy falls back to the current destination count"
    );
    Ok(())
}

fn run_fanout_pipeline(events: &[TelemetryEvent]) -> Result<Evaluation> {
    let bucketed = extract_fanout_bucket_features(events, 3600)?;
    let (baseline, observation) = split_baseline_observation(bucketed, 3);
    Ok(evaluate_network_fanout(&baseline, &observation, &permissive_thresholds(), None)?)
}

#[test]
fn test_event_order_does_not_change_the_outcome() -> Result<()> {
    let events = fanout_drift_events();
    let mut shuffled = events.clone();
    shuffled.reverse();
    shuffled.rotate_left(events.len() / 3);

    assert_eq!(run_fanout_pipeline(&events)?, run_fanout_pipeline(&shuffled)?);
    Ok(())
}

#[test]
fn test_explanation_renders_fanout_evidence() -> Result<()> {
    let events = fanout_drift_events();
    let bucketed = extract_fanout_bucket_features(&events, 3600)?;
    let (baseline, observation) = split_baseline_observation(bucketed, 3);
    let eval = evaluate_network_fanout(&baseline, &observation, &permissive_thresholds(), None)?;

    let explanation = explain_signal(&eval.signals[0]);
    assert!(explanation.headline.contains("hostA"));
    assert!(explanation.evidence.iter().any(|e| e.contains("Risk score")));
    assert!(explanation.evidence.iter().any(|e| e.contains("New internal targets")));
    assert!(!explanation.next_steps.is_empty());
    Ok(())
}
