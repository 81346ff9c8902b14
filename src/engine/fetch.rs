//! Commit window fetcher
//!
//! Resolves a branch tip, lists the commits reachable from it within a
//! lookback window, and normalizes each into a [`CommitRecord`]. Branch
//! resolution and transport errors fail the whole call; a single malformed
//! commit is skipped with a logged reason and the batch continues.

use crate::error::Result;
use crate::progress::Reporter;
use crate::provider::{ProviderService, RawCommit};
use crate::types::{CommitId, CommitRecord, SkipReason};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

/// Compute the window cutoff: `now` minus the lookback.
///
/// A lookback of zero days is valid and means "since now", which yields an
/// empty or near-empty window rather than an error.
pub fn lookback_cutoff(now: DateTime<Utc>, lookback_days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(lookback_days))
}

/// Fetch the ordered commit window for one branch.
///
/// Commits come back in provider order (reverse-chronological); this stage
/// never re-sorts them. All-or-nothing per branch: any provider failure
/// fails the call, unlike the correlator which tolerates per-item failure.
pub async fn fetch_commit_window(
    provider: &dyn ProviderService,
    branch: &str,
    lookback_days: u32,
    reporter: &dyn Reporter,
) -> Result<Vec<CommitRecord>> {
    let cutoff = lookback_cutoff(Utc::now(), lookback_days);
    debug!(%branch, lookback_days, %cutoff, "fetching commit window");
    reporter.task_started(&format!(
        "Fetching commits from {branch} (last {lookback_days} days)"
    ));

    let tip = provider.resolve_branch_tip(branch).await?;
    let raw = provider.list_commits(&tip, cutoff).await?;

    let mut commits = Vec::with_capacity(raw.len());
    for item in &raw {
        match normalize_commit(item) {
            Ok(record) => {
                commits.push(record);
                reporter.record_processed();
            }
            Err(skip) => {
                warn!(id = %skip.id, reason = %skip.reason, "skipping malformed commit");
                reporter.record_skipped(&skip.id, &skip.reason);
            }
        }
    }

    reporter.task_finished(&format!("Fetched {} commits from {branch}", commits.len()));
    Ok(commits)
}

/// Normalize one raw commit, or explain why it cannot be kept.
pub(crate) fn normalize_commit(raw: &RawCommit) -> std::result::Result<CommitRecord, SkipReason> {
    let id = CommitId::from_full(&raw.sha).ok_or_else(|| {
        SkipReason::new(&raw.sha, "commit identifier shorter than 7 characters")
    })?;

    let authored_at = raw
        .authored_at
        .ok_or_else(|| SkipReason::new(&raw.sha, "missing author date"))?;

    let author = raw
        .author_login
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());

    let summary = raw.message.lines().next().unwrap_or_default().to_string();

    Ok(CommitRecord {
        id,
        author,
        authored_at,
        summary,
        message: raw.message.clone(),
        file_count: raw.file_count,
        additions: raw.additions,
        deletions: raw.deletions,
        html_url: raw.html_url.clone(),
    })
}
