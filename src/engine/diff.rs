//! Branch diff engine
//!
//! Set-based partition of two commit windows by truncated commit id. Pure,
//! deterministic, total: empty inputs are valid and produce empty partitions
//! with zero stats.

use crate::types::{BranchStats, CommitRecord, DiffResult};
use std::collections::HashSet;

/// Partition two commit windows into base-only, compare-only, and common.
///
/// Membership is decided on the truncated id (see [`crate::types::CommitId`]
/// for the collision caveat). Each partition preserves the relative order of
/// its source sequence; `common` reports the base-side records.
pub fn diff_branches(base: &[CommitRecord], compare: &[CommitRecord]) -> DiffResult {
    let base_ids: HashSet<&str> = base.iter().map(|c| c.id.short()).collect();
    let compare_ids: HashSet<&str> = compare.iter().map(|c| c.id.short()).collect();

    let unique_to_base: Vec<CommitRecord> = base
        .iter()
        .filter(|c| !compare_ids.contains(c.id.short()))
        .cloned()
        .collect();
    let unique_to_compare: Vec<CommitRecord> = compare
        .iter()
        .filter(|c| !base_ids.contains(c.id.short()))
        .cloned()
        .collect();
    let common: Vec<CommitRecord> = base
        .iter()
        .filter(|c| compare_ids.contains(c.id.short()))
        .cloned()
        .collect();

    let base_stats = BranchStats::for_commits(base, unique_to_base.len());
    let compare_stats = BranchStats::for_commits(compare, unique_to_compare.len());

    DiffResult {
        base_commits: base.to_vec(),
        compare_commits: compare.to_vec(),
        unique_to_base,
        unique_to_compare,
        common,
        base_stats,
        compare_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommitId;
    use chrono::{TimeZone, Utc};

    fn commit(sha: &str, additions: u64, deletions: u64, files: u64) -> CommitRecord {
        CommitRecord {
            id: CommitId::from_full(&format!("{sha:0<40}")).unwrap(),
            author: "alice".to_string(),
            authored_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            summary: format!("commit {sha}"),
            message: format!("commit {sha}"),
            file_count: files,
            additions,
            deletions,
            html_url: String::new(),
        }
    }

    fn shorts(commits: &[CommitRecord]) -> Vec<&str> {
        commits.iter().map(|c| c.id.short()).collect()
    }

    #[test]
    fn disjoint_windows_have_no_common() {
        let base = vec![commit("aaaaaaa", 1, 0, 1), commit("bbbbbbb", 2, 1, 1)];
        let compare = vec![commit("ccccccc", 3, 0, 2)];

        let result = diff_branches(&base, &compare);
        assert!(result.common.is_empty());
        assert_eq!(shorts(&result.unique_to_base), shorts(&base));
        assert_eq!(shorts(&result.unique_to_compare), shorts(&compare));
    }

    #[test]
    fn identical_windows_are_all_common() {
        let window = vec![commit("aaaaaaa", 1, 0, 1), commit("bbbbbbb", 2, 1, 1)];

        let result = diff_branches(&window, &window);
        assert_eq!(shorts(&result.common), shorts(&window));
        assert!(result.unique_to_base.is_empty());
        assert!(result.unique_to_compare.is_empty());
        assert_eq!(result.base_stats.unique_commit_count, 0);
    }

    #[test]
    fn partitions_preserve_source_order() {
        let base = vec![
            commit("ddddddd", 0, 0, 0),
            commit("aaaaaaa", 0, 0, 0),
            commit("ccccccc", 0, 0, 0),
            commit("bbbbbbb", 0, 0, 0),
        ];
        let compare = vec![commit("aaaaaaa", 0, 0, 0), commit("bbbbbbb", 0, 0, 0)];

        let result = diff_branches(&base, &compare);
        assert_eq!(shorts(&result.unique_to_base), vec!["ddddddd", "ccccccc"]);
        assert_eq!(shorts(&result.common), vec!["aaaaaaa", "bbbbbbb"]);
    }

    #[test]
    fn stats_are_additive_across_partitions() {
        let base = vec![
            commit("aaaaaaa", 5, 2, 1),
            commit("bbbbbbb", 7, 3, 2),
            commit("ccccccc", 11, 1, 4),
        ];
        let compare = vec![commit("bbbbbbb", 7, 3, 2)];

        let result = diff_branches(&base, &compare);
        let partition_sum: u64 = result
            .unique_to_base
            .iter()
            .chain(&result.common)
            .map(|c| c.additions)
            .sum();
        assert_eq!(partition_sum, result.base_stats.total_additions);
        assert_eq!(result.base_stats.total_additions, 23);
        assert_eq!(result.base_stats.total_deletions, 6);
        assert_eq!(result.base_stats.total_files, 7);
    }

    #[test]
    fn empty_inputs_yield_zero_stats() {
        let result = diff_branches(&[], &[]);
        assert!(result.unique_to_base.is_empty());
        assert!(result.unique_to_compare.is_empty());
        assert!(result.common.is_empty());
        assert_eq!(result.base_stats, BranchStats::default());
        assert_eq!(result.compare_stats, BranchStats::default());
    }

    #[test]
    fn three_against_three_scenario() {
        // base [c1, c2, c3] vs compare [c2, c3, c4]
        let base = vec![
            commit("c100000", 1, 1, 1),
            commit("c200000", 1, 1, 1),
            commit("c300000", 1, 1, 1),
        ];
        let compare = vec![
            commit("c200000", 1, 1, 1),
            commit("c300000", 1, 1, 1),
            commit("c400000", 1, 1, 1),
        ];

        let result = diff_branches(&base, &compare);
        assert_eq!(shorts(&result.unique_to_base), vec!["c100000"]);
        assert_eq!(shorts(&result.unique_to_compare), vec!["c400000"]);
        assert_eq!(shorts(&result.common), vec!["c200000", "c300000"]);
        assert_eq!(result.base_stats.commit_count, 3);
        assert_eq!(result.compare_stats.commit_count, 3);
        assert_eq!(result.base_stats.unique_commit_count, 1);
        assert_eq!(result.compare_stats.unique_commit_count, 1);
    }
}
