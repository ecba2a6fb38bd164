use std::collections::{HashMap, HashSet};

use log::debug;

use crate::evidence::compute_stats;
use crate::matcher::titles_match;
use crate::merge::{fold_repeat, merge_pair};
use crate::model::{Provenance, Record, ReconciledSet};
use crate::normalize::normalize_title;

/// Working set between identifier merge and title dedup.
#[derive(Debug, Default)]
pub struct CandidatePool {
    pub records: Vec<Record>,
    /// Identifiers matched across sides (each merged into one pool entry).
    pub matched_ids: usize,
    /// Same-side identifier repeats folded into the entry holding that id.
    pub folded_repeats: usize,
}

/// Reconcile two per-source collections into one deduplicated set.
///
/// `left` is the bibliographic source whose fields win on merge; `right`
/// supplies citation counts. Identifier merge always runs before title
/// dedup, so an identifier-matched pair is never counted twice.
pub fn reconcile(left: Vec<Record>, right: Vec<Record>) -> ReconciledSet {
    let left: Vec<Record> = left.into_iter().map(|r| r.with_provenance(Provenance::Left)).collect();
    let right: Vec<Record> = right.into_iter().map(|r| r.with_provenance(Provenance::Right)).collect();

    if left.is_empty() && right.is_empty() {
        return ReconciledSet::empty();
    }

    let pool = build_candidate_pool(&left, &right);
    let pool_size = pool.records.len();
    let folded = pool.folded_repeats;
    let records = dedupe_by_title(pool.records);

    debug!(
        "reconcile: left={} right={} pool={} folded={} deduped={}",
        left.len(),
        right.len(),
        pool_size,
        folded,
        records.len(),
    );

    let stats = compute_stats(&left, &right, folded, pool_size, records.len());
    debug!(
        "reconcile stats: unique_left={} unique_right={} duplicates={}",
        stats.unique_to_left, stats.unique_to_right, stats.duplicate_count,
    );

    ReconciledSet { records, stats }
}

/// Identifier merge (steps 1-2).
///
/// Every identifier yields one pool entry. Pool order: left records in left
/// order (merged when their identifier also appears on the right), then
/// right-only identified records in right order, then right records without
/// an identifier. A later record repeating an identifier already in the pool
/// is folded into that entry.
pub fn build_candidate_pool(left: &[Record], right: &[Record]) -> CandidatePool {
    let mut records: Vec<Record> = Vec::with_capacity(left.len() + right.len());
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut merged: HashSet<&str> = HashSet::new();
    let mut matched_ids = 0;
    let mut folded_repeats = 0;

    for rec in left {
        match rec.identifier() {
            Some(id) => match slots.get(id).copied() {
                Some(at) => {
                    fold_repeat(&mut records[at], rec);
                    folded_repeats += 1;
                }
                None => {
                    slots.insert(id, records.len());
                    records.push(rec.clone());
                }
            },
            None => records.push(rec.clone()),
        }
    }
    let left_slots = records.len();

    let (right_with_id, right_without_id): (Vec<&Record>, Vec<&Record>) =
        right.iter().partition(|r| r.identifier().is_some());

    for rec in right_with_id {
        let Some(id) = rec.identifier() else { continue };
        match slots.get(id).copied() {
            Some(at) if at < left_slots && merged.insert(id) => {
                let pair = merge_pair(&records[at], rec);
                records[at] = pair;
                matched_ids += 1;
            }
            Some(at) => {
                fold_repeat(&mut records[at], rec);
                folded_repeats += 1;
            }
            None => {
                slots.insert(id, records.len());
                records.push(rec.clone());
            }
        }
    }
    records.extend(right_without_id.into_iter().cloned());

    CandidatePool { records, matched_ids, folded_repeats }
}

/// Greedy order-preserving title dedup (step 3).
///
/// Each kept record discards every later record whose normalized title
/// matches it. Discarded records never act as a comparison source, so the
/// first-seen record of a chain survives.
pub fn dedupe_by_title(records: Vec<Record>) -> Vec<Record> {
    let normalized: Vec<String> = records.iter().map(|r| normalize_title(&r.title)).collect();
    let mut keep = vec![true; records.len()];

    for i in 0..records.len() {
        if !keep[i] {
            continue;
        }
        for j in (i + 1)..records.len() {
            if keep[j] && titles_match(&normalized[i], &normalized[j]) {
                keep[j] = false;
            }
        }
    }

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(rec, kept)| kept.then_some(rec))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn both_empty_is_empty() {
        let out = reconcile(vec![], vec![]);
        assert!(out.is_empty());
        assert_eq!(out.stats, Default::default());
    }

    #[test]
    fn pool_order_left_then_right_only_then_unidentified() {
        let left = vec![
            Record::new("Alpha").with_id("1"),
            Record::new("Beta").with_id("2"),
        ];
        let right = vec![
            Record::new("Gamma"),
            Record::new("Delta").with_id("3"),
            Record::new("Alpha Right").with_id("1").with_citations(4),
        ];
        let pool = build_candidate_pool(&left, &right);
        assert_eq!(pool.matched_ids, 1);
        assert_eq!(titles(&pool.records), vec!["Alpha", "Beta", "Delta", "Gamma"]);
        assert_eq!(pool.records[0].citation_count, Some(4));
        assert_eq!(pool.records[0].provenance, Provenance::Both);
    }

    #[test]
    fn empty_left_passes_right_through() {
        let right = vec![
            Record::new("No Id"),
            Record::new("Has Id").with_id("7").with_citations(2),
        ];
        let out = reconcile(vec![], right);
        assert_eq!(titles(&out.records), vec!["Has Id", "No Id"]);
        assert_eq!(out.records[0].citation_count, Some(2));
        assert_eq!(out.stats.unique_to_right, 2);
        assert_eq!(out.stats.duplicate_count, 0);
    }

    #[test]
    fn empty_right_passes_left_through_with_title_dedup() {
        let left = vec![
            Record::new("Same Title").with_id("1"),
            Record::new("Same Title.").with_id("2"),
            Record::new("Other").with_id("3"),
        ];
        let out = reconcile(left, vec![]);
        assert_eq!(titles(&out.records), vec!["Same Title", "Other"]);
        assert_eq!(out.stats.unique_to_left, 3);
        assert_eq!(out.stats.duplicate_count, 1);
    }

    #[test]
    fn near_identical_run_collapses_to_first() {
        let a = "abcdefghijklmnopqrstuvwxyzabcdefghijklmnopqrstuvwxyz0123456789abcdefghijklmnopqrstuvwxyz";
        let b = format!("{a}q");
        let c = format!("{a}qq");
        let recs = vec![Record::new(a), Record::new(b), Record::new(c)];
        let out = dedupe_by_title(recs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, a);
    }

    #[test]
    fn discarded_record_is_not_a_comparison_source() {
        // a ~ b and b ~ c, but a !~ c.
        let a = "effects of targeted therapy on tumor growth i";
        let b = format!("{a}x");
        let c = format!("{a}xyz");
        assert!(titles_match(a, &b));
        assert!(titles_match(&b, &c));
        assert!(!titles_match(a, &c));
        let out = dedupe_by_title(vec![Record::new(a), Record::new(b), Record::new(c.clone())]);
        // b is dropped by a; c is compared only against a and survives.
        assert_eq!(titles(&out), vec![a, c.as_str()]);
    }

    #[test]
    fn repeated_identifier_within_side_folds_into_one_entry() {
        let left = vec![
            Record::new("Paper One").with_id("1"),
            Record::new("Paper One, Second Printing").with_id("1").with_year(2020),
        ];
        let right = vec![Record::new("Paper One").with_id("1").with_citations(3)];
        let pool = build_candidate_pool(&left, &right);
        assert_eq!(pool.matched_ids, 1);
        assert_eq!(pool.folded_repeats, 1);
        assert_eq!(pool.records.len(), 1);
        assert_eq!(pool.records[0].year, Some(2020));

        let out = reconcile(left, right);
        assert_eq!(out.len(), 1);
        assert_eq!(out.records[0].citation_count, Some(3));
        assert_eq!(out.stats.duplicate_count, 2);
    }

    #[test]
    fn repeated_right_identifier_is_counted_once_in_output() {
        let left = vec![Record::new("Alpha Study").with_id("1")];
        let right = vec![
            Record::new("Beta Report").with_id("1").with_citations(8),
            Record::new("Beta Report").with_id("1").with_citations(2),
        ];
        let out = reconcile(left, right);
        assert_eq!(titles(&out.records), vec!["Alpha Study"]);
        assert_eq!(out.records[0].citation_count, Some(8));
        assert_eq!(out.stats.unique_to_left, 0);
        assert_eq!(out.stats.unique_to_right, 0);
        assert_eq!(out.stats.identifier_overlap, 1);
        assert_eq!(out.stats.repeated_identifiers, 1);
        assert_eq!(out.stats.duplicate_count, 2);
        assert_eq!(3 - out.stats.duplicate_count, out.len());
    }

    #[test]
    fn repeated_right_only_identifier_keeps_first() {
        let right = vec![
            Record::new("First Copy").with_id("9"),
            Record::new("Entirely Different Wording").with_id("9").with_citations(1),
        ];
        let out = reconcile(vec![Record::new("Unrelated").with_id("2")], right);
        assert_eq!(titles(&out.records), vec!["Unrelated", "First Copy"]);
        assert_eq!(out.records[1].citation_count, Some(1));
        assert_eq!(out.stats.unique_to_right, 1);
        assert_eq!(out.stats.duplicate_count, 1);
    }
}
