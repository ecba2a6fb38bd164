use std::collections::HashSet;

use crate::model::{Record, ReconStats};

/// Compute overlap statistics (step 4).
///
/// Identifier sets only include usable identifiers; right records without
/// one count as unique to the right side. `folded` is the number of
/// same-side identifier repeats absorbed while building the pool.
pub fn compute_stats(
    left: &[Record],
    right: &[Record],
    folded: usize,
    pool_size: usize,
    deduped_size: usize,
) -> ReconStats {
    let left_ids: HashSet<&str> = left.iter().filter_map(Record::identifier).collect();
    let right_ids: HashSet<&str> = right.iter().filter_map(Record::identifier).collect();
    let right_without_id = right.iter().filter(|r| r.identifier().is_none()).count();

    let identifier_overlap = left_ids.intersection(&right_ids).count();
    let title_duplicates = pool_size.saturating_sub(deduped_size);

    ReconStats {
        left_total: left.len(),
        right_total: right.len(),
        unique_to_left: left_ids.difference(&right_ids).count(),
        unique_to_right: right_without_id + right_ids.difference(&left_ids).count(),
        duplicate_count: identifier_overlap + folded + title_duplicates,
        identifier_overlap,
        repeated_identifiers: folded,
        title_duplicates,
    }
}
