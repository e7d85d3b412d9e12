//! Rolling growth-hit computation.
//!
//! For each (entity, bucket) in an ordered observation series, counts how
//! many of the last N buckets grew over their immediate predecessor. The
//! window includes the current bucket, and the comparison is always between
//! consecutive *present* buckets; gaps do not synthesize zero buckets.

use std::collections::HashMap;

use tracing::debug;

use super::EngineError;
use crate::types::{BucketFeatures, EntityBucket};

/// Compute `growth_hits` for every (entity, bucket) in `per_bucket`.
///
/// Rolling state is per entity: the walk sorts each entity's buckets by
/// start, flags each bucket that strictly grew over the previous one, and
/// sums the last `sustained_buckets` flags. The first bucket of an entity
/// never flags (there is nothing to grow from).
pub fn compute_growth_hits(
    per_bucket: &[BucketFeatures],
    sustained_buckets: usize,
) -> Result<HashMap<EntityBucket, u32>, EngineError> {
    if sustained_buckets == 0 {
        return Err(EngineError::InvalidSustainedWindow(sustained_buckets));
    }

    let mut by_entity: HashMap<&str, Vec<&BucketFeatures>> = HashMap::new();
    for record in per_bucket {
        by_entity
            .entry(record.entity_key.as_str())
            .or_default()
            .push(record);
    }

    let mut growth_hits = HashMap::with_capacity(per_bucket.len());
    for (entity, mut rows) in by_entity {
        rows.sort_by_key(|record| record.bucket_start);

        let mut flags: Vec<u32> = Vec::with_capacity(rows.len());
        let mut prev: Option<u64> = None;
        for record in rows {
            let grew = prev.is_some_and(|previous| record.primary_count > previous);
            flags.push(u32::from(grew));
            prev = Some(record.primary_count);

            let window_start = flags.len().saturating_sub(sustained_buckets);
            let hits: u32 = flags[window_start..].iter().sum();
            growth_hits.insert((entity.to_string(), record.bucket_start), hits);
        }
    }

    debug!(
        buckets = per_bucket.len(),
        window = sustained_buckets,
        "computed rolling growth hits"
    );
    Ok(growth_hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(entity: &str, bucket_start: i64, primary: u64) -> BucketFeatures {
        BucketFeatures::new(entity, bucket_start, primary, primary.min(1))
    }

    fn hits_for(map: &HashMap<EntityBucket, u32>, entity: &str, bucket_start: i64) -> u32 {
        map.get(&(entity.to_string(), bucket_start)).copied().expect("bucket should be present")
    }

    #[test]
    fn test_first_bucket_never_flags() {
        let hits = compute_growth_hits(&[bucket("h1", 0, 100)], 3).expect("valid window");
        assert_eq!(hits_for(&hits, "h1", 0), 0);
    }

    #[test]
    fn test_monotone_growth_accumulates_up_to_window() {
        let records = vec![
            bucket("h1", 0, 1),
            bucket("h1", 3600, 2),
            bucket("h1", 7200, 3),
            bucket("h1", 10800, 4),
            bucket("h1", 14400, 5),
        ];
        let hits = compute_growth_hits(&records, 3).expect("valid window");
        assert_eq!(hits_for(&hits, "h1", 0), 0);
        assert_eq!(hits_for(&hits, "h1", 3600), 1);
        assert_eq!(hits_for(&hits, "h1", 7200), 2);
        assert_eq!(hits_for(&hits, "h1", 10800), 3);
        // window slides: still 3, never 4
        assert_eq!(hits_for(&hits, "h1", 14400), 3);
    }

    #[test]
    fn test_flat_and_declining_buckets_do_not_flag() {
        let records = vec![
            bucket("h1", 0, 5),
            bucket("h1", 3600, 5),
            bucket("h1", 7200, 3),
            bucket("h1", 10800, 9),
        ];
        let hits = compute_growth_hits(&records, 3).expect("valid window");
        assert_eq!(hits_for(&hits, "h1", 3600), 0);
        assert_eq!(hits_for(&hits, "h1", 7200), 0);
        assert_eq!(hits_for(&hits, "h1", 10800), 1);
    }

    #[test]
    fn test_gap_compares_consecutive_present_buckets() {
        // missing bucket at 3600; 7200 compares against 0, not a synthetic zero
        let records = vec![bucket("h1", 0, 4), bucket("h1", 7200, 5)];
        let hits = compute_growth_hits(&records, 2).expect("valid window");
        assert_eq!(hits_for(&hits, "h1", 7200), 1);
    }

    #[test]
    fn test_entities_are_independent() {
        let records = vec![
            bucket("h1", 0, 1),
            bucket("h1", 3600, 2),
            bucket("h2", 3600, 9),
        ];
        let hits = compute_growth_hits(&records, 2).expect("valid window");
        assert_eq!(hits_for(&hits, "h1", 3600), 1);
        // h2's first bucket must not inherit h1's rolling state
        assert_eq!(hits_for(&hits, "h2", 3600), 0);
    }

    #[test]
    fn test_unsorted_input_is_sorted_per_entity() {
        let records = vec![
            bucket("h1", 7200, 3),
            bucket("h1", 0, 1),
            bucket("h1", 3600, 2),
        ];
        let hits = compute_growth_hits(&records, 3).expect("valid window");
        assert_eq!(hits_for(&hits, "h1", 7200), 2);
    }

    #[test]
    fn test_zero_window_is_caller_error() {
        assert!(compute_growth_hits(&[], 0).is_err());
    }
}
