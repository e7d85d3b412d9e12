//! True-novelty computation via set difference against the baseline union.

use std::collections::{HashMap, HashSet};

use crate::types::EntityBucket;

/// Count of current-bucket members never seen in the baseline:
/// `|current − baseline_union|`.
///
/// An empty current set has no novelty; an empty baseline union makes every
/// current member novel.
pub fn true_novelty_count(current: &HashSet<String>, baseline_union: &HashSet<String>) -> usize {
    if current.is_empty() {
        return 0;
    }
    if baseline_union.is_empty() {
        return current.len();
    }
    current.difference(baseline_union).count()
}

/// Union per-bucket destination sets into one set per entity.
///
/// Input is `(entity, bucket_start) -> set`; callers filter to baseline
/// buckets before handing the map over.
pub fn build_baseline_union(
    dest_sets_by_bucket: &HashMap<EntityBucket, HashSet<String>>,
) -> HashMap<String, HashSet<String>> {
    let mut union_by_entity: HashMap<String, HashSet<String>> = HashMap::new();
    for ((entity, _bucket_start), dests) in dest_sets_by_bucket {
        union_by_entity
            .entry(entity.clone())
            .or_default()
            .extend(dests.iter().cloned());
    }
    union_by_entity
}
