//! Hosting-provider access
//!
//! The engines never touch provider SDK objects directly. A provider
//! implements [`ProviderService`] and hands back the loose raw shapes below;
//! the engines normalize those into the strict records in [`crate::types`]
//! exactly once, at this boundary.

mod github;

pub use github::GitHubProvider;

use crate::error::Result;
use crate::repo::RepoId;
use crate::types::{BranchInfo, StateFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A commit as supplied by the provider, before normalization
///
/// Fields the provider may omit stay optional here; the Commit Window
/// Fetcher decides what is malformed.
#[derive(Debug, Clone, Default)]
pub struct RawCommit {
    /// Full commit identifier
    pub sha: String,
    /// Author account login, when attributable
    pub author_login: Option<String>,
    /// When the commit was authored
    pub authored_at: Option<DateTime<Utc>>,
    /// Full commit message
    pub message: String,
    /// Number of files touched
    pub file_count: u64,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
    /// Web URL for the commit
    pub html_url: String,
}

/// A pull request as supplied by the provider, before normalization
///
/// Timestamps stay as strings so the correlator owns the parse (and its
/// naive-timestamp handling); count fields stay optional because the list
/// endpoint does not populate them.
#[derive(Debug, Clone, Default)]
pub struct RawPullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: Option<String>,
    /// State string as reported ("open" / "closed")
    pub state: String,
    /// Author login
    pub author_login: Option<String>,
    /// Creation timestamp, ISO-8601 or naive
    pub created_at: Option<String>,
    /// Last-update timestamp, ISO-8601 or naive
    pub updated_at: Option<String>,
    /// Head branch name
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
    /// Web URL
    pub html_url: String,
    /// Draft flag
    pub draft: bool,
    /// Mergeable tri-state
    pub mergeable: Option<bool>,
    /// Issue comment count
    pub comment_count: Option<u64>,
    /// Review comment count
    pub review_comment_count: Option<u64>,
    /// Commit count
    pub commit_count: Option<u64>,
    /// Lines added
    pub additions: Option<u64>,
    /// Lines deleted
    pub deletions: Option<u64>,
    /// Files changed
    pub changed_file_count: Option<u64>,
    /// PR body
    pub body: Option<String>,
}

/// Read-only access to one repository on a hosting provider
///
/// Calls are the engines' only blocking points. No retries happen here; a
/// transport failure surfaces immediately and the caller decides whether to
/// retry at a higher level.
#[async_trait]
pub trait ProviderService: Send + Sync {
    /// Resolve a branch to its tip commit identifier.
    ///
    /// Fails with [`crate::error::Error::BranchNotFound`] when the branch
    /// does not exist.
    async fn resolve_branch_tip(&self, branch: &str) -> Result<String>;

    /// List commits reachable from `tip_sha` authored at or after `since`,
    /// in provider order (reverse-chronological).
    async fn list_commits(&self, tip_sha: &str, since: DateTime<Utc>) -> Result<Vec<RawCommit>>;

    /// List pull requests sorted by update time descending, consuming at
    /// most `max_records` from the provider (the pagination ceiling).
    async fn list_pull_requests(
        &self,
        state: StateFilter,
        max_records: usize,
    ) -> Result<Vec<RawPullRequest>>;

    /// List the repository's branches.
    async fn list_branches(&self) -> Result<Vec<BranchInfo>>;

    /// The repository this provider is bound to
    fn repo(&self) -> &RepoId;
}
