//! Integration tests for branch-drift
//!
//! Drive the engines end-to-end against a mock provider.

mod common;

use branch_drift::engine::{
    CorrelateOptions, correlate_pull_requests, diff_branches, fetch_commit_window,
};
use branch_drift::error::Error;
use branch_drift::progress::NullReporter;
use branch_drift::provider::{ProviderService, RawCommit};
use branch_drift::types::{PrRelation, StateFilter};
use common::mock_provider::{MockProviderService, make_commit, make_pull_request};

#[tokio::test]
async fn fetches_commit_window_in_provider_order() {
    let provider = MockProviderService::new("acme", "widgets").with_branch(
        "main",
        vec![
            make_commit("c300000", 1),
            make_commit("c200000", 5),
            make_commit("c100000", 10),
        ],
    );

    let commits = fetch_commit_window(&provider, "main", 30, &NullReporter)
        .await
        .unwrap();

    let shorts: Vec<&str> = commits.iter().map(|c| c.id.short()).collect();
    // Reverse-chronological provider order, untouched.
    assert_eq!(shorts, vec!["c300000", "c200000", "c100000"]);
    assert_eq!(provider.resolved_branches(), vec!["main".to_string()]);
}

#[tokio::test]
async fn lookback_window_excludes_old_commits() {
    let provider = MockProviderService::new("acme", "widgets").with_branch(
        "main",
        vec![make_commit("c200000", 2), make_commit("c100000", 45)],
    );

    let commits = fetch_commit_window(&provider, "main", 30, &NullReporter)
        .await
        .unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].id.short(), "c200000");
}

#[test]
fn zero_lookback_yields_empty_window() {
    let provider = MockProviderService::new("acme", "widgets")
        .with_branch("main", vec![make_commit("c100000", 1)]);

    let commits = tokio_test::block_on(fetch_commit_window(&provider, "main", 0, &NullReporter))
        .unwrap();
    assert!(commits.is_empty());
}

#[tokio::test]
async fn malformed_commit_is_skipped_batch_continues() {
    let mut bad = make_commit("c200000", 1);
    bad.sha = "ab".to_string(); // too short to truncate
    let provider = MockProviderService::new("acme", "widgets")
        .with_branch("main", vec![make_commit("c300000", 1), bad, make_commit("c100000", 2)]);

    let commits = fetch_commit_window(&provider, "main", 30, &NullReporter)
        .await
        .unwrap();

    let shorts: Vec<&str> = commits.iter().map(|c| c.id.short()).collect();
    assert_eq!(shorts, vec!["c300000", "c100000"]);
}

#[tokio::test]
async fn missing_branch_fails_with_named_error() {
    let provider = MockProviderService::new("acme", "widgets");

    let result = fetch_commit_window(&provider, "release", 30, &NullReporter).await;
    match result {
        Err(Error::BranchNotFound { repo, branch }) => {
            assert_eq!(repo, "acme/widgets");
            assert_eq!(branch, "release");
        }
        other => panic!("Expected BranchNotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn transport_error_fails_the_whole_fetch() {
    let provider = MockProviderService::new("acme", "widgets")
        .with_branch("main", vec![make_commit("c100000", 1)])
        .fail_list_commits("connection reset");

    let result = fetch_commit_window(&provider, "main", 30, &NullReporter).await;
    assert!(matches!(result, Err(Error::Api(message)) if message == "connection reset"));
}

#[tokio::test]
async fn compare_branches_end_to_end() {
    // base [c1, c2, c3], compare [c2, c3, c4]
    let shared2 = make_commit("c200000", 3);
    let shared3 = make_commit("c300000", 2);
    let provider = MockProviderService::new("acme", "widgets")
        .with_branch(
            "main",
            vec![make_commit("c100000", 4), shared2.clone(), shared3.clone()],
        )
        .with_branch("develop", vec![shared2, shared3, make_commit("c400000", 1)]);

    let base = fetch_commit_window(&provider, "main", 30, &NullReporter)
        .await
        .unwrap();
    let compare = fetch_commit_window(&provider, "develop", 30, &NullReporter)
        .await
        .unwrap();
    let diff = diff_branches(&base, &compare);

    let shorts = |commits: &[branch_drift::types::CommitRecord]| -> Vec<String> {
        commits.iter().map(|c| c.id.short().to_string()).collect()
    };
    assert_eq!(shorts(&diff.unique_to_base), vec!["c100000"]);
    assert_eq!(shorts(&diff.unique_to_compare), vec!["c400000"]);
    assert_eq!(shorts(&diff.common), vec!["c200000", "c300000"]);
    assert_eq!(diff.base_stats.commit_count, 3);
    assert_eq!(diff.compare_stats.commit_count, 3);
}

#[tokio::test]
async fn correlates_pull_requests_end_to_end() {
    let provider = MockProviderService::new("acme", "widgets").with_pull_requests(vec![
        make_pull_request(1, "release", "main"),
        make_pull_request(2, "release", "main"),
        make_pull_request(3, "release", "main"),
        make_pull_request(4, "feature-x", "release"),
        make_pull_request(5, "feature-y", "release"),
        make_pull_request(6, "feature-z", "main"), // unrelated
    ]);

    let batch = provider
        .list_pull_requests(StateFilter::Open, 200)
        .await
        .unwrap();
    let result =
        correlate_pull_requests(&batch, "release", &CorrelateOptions::default(), &NullReporter);

    assert_eq!(result.summary.total, 5);
    assert_eq!(result.summary.from_count, 3);
    assert_eq!(result.summary.to_count, 2);
    assert!(
        result
            .pull_requests
            .iter()
            .filter(|p| p.number <= 3)
            .all(|p| p.relation == PrRelation::From)
    );

    let calls = provider.pull_request_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].state, StateFilter::Open);
    assert_eq!(calls[0].max_records, 200);
}

#[tokio::test]
async fn pagination_ceiling_bounds_provider_consumption() {
    let batch: Vec<_> = (1..=10)
        .map(|n| make_pull_request(n, "release", "main"))
        .collect();
    let provider = MockProviderService::new("acme", "widgets").with_pull_requests(batch);

    let fetched = provider
        .list_pull_requests(StateFilter::All, 4)
        .await
        .unwrap();
    assert_eq!(fetched.len(), 4);

    let options = CorrelateOptions {
        scan_limit: 4,
        ..CorrelateOptions::default()
    };
    let result = correlate_pull_requests(&fetched, "release", &options, &NullReporter);
    assert_eq!(result.summary.total, 4);
}

#[tokio::test]
async fn empty_window_diffs_cleanly() {
    let provider = MockProviderService::new("acme", "widgets")
        .with_branch("main", vec![])
        .with_branch("develop", vec![]);

    let base = fetch_commit_window(&provider, "main", 30, &NullReporter)
        .await
        .unwrap();
    let compare = fetch_commit_window(&provider, "develop", 30, &NullReporter)
        .await
        .unwrap();
    let diff = diff_branches(&base, &compare);

    assert!(diff.common.is_empty());
    assert_eq!(diff.base_stats.commit_count, 0);
    assert_eq!(diff.compare_stats.commit_count, 0);
}

#[test]
fn raw_commit_default_is_malformed() {
    // Guard: an all-default raw commit must never normalize into a record.
    let raw = RawCommit::default();
    assert!(raw.sha.len() < 7);
}
