//! Core types for branch-drift

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of characters in a truncated commit identifier
pub const SHORT_ID_LEN: usize = 7;

/// Commit identity carrying both the truncated and full identifier
///
/// Equality, ordering into sets, and hashing are defined on the short form
/// only. Truncated-identifier collisions are a known, accepted approximation
/// of this tool, not something it detects or resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitId {
    short: String,
    full: String,
}

impl CommitId {
    /// Build an identity from a full commit identifier.
    ///
    /// Returns `None` when the identifier is shorter than the truncated
    /// length; such input is malformed and the caller skips the record.
    pub fn from_full(full: &str) -> Option<Self> {
        if full.len() < SHORT_ID_LEN || !full.is_char_boundary(SHORT_ID_LEN) {
            return None;
        }
        Some(Self {
            short: full[..SHORT_ID_LEN].to_string(),
            full: full.to_string(),
        })
    }

    /// The truncated identifier (exactly 7 characters)
    pub fn short(&self) -> &str {
        &self.short
    }

    /// The full identifier
    pub fn full(&self) -> &str {
        &self.full
    }
}

impl PartialEq for CommitId {
    fn eq(&self, other: &Self) -> bool {
        self.short == other.short
    }
}

impl Eq for CommitId {}

impl std::hash::Hash for CommitId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.short.hash(state);
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short)
    }
}

/// A normalized commit within a lookback window
#[derive(Debug, Clone, Serialize)]
pub struct CommitRecord {
    /// Commit identity (truncated + full)
    pub id: CommitId,
    /// Author login, or "Unknown" when the provider has no account for it
    pub author: String,
    /// When the commit was authored
    pub authored_at: DateTime<Utc>,
    /// First line of the commit message
    pub summary: String,
    /// Full commit message (includes the first line)
    pub message: String,
    /// Number of files touched by the commit
    pub file_count: u64,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
    /// Web URL for the commit
    pub html_url: String,
}

/// Aggregate statistics over one branch's commit window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchStats {
    /// Total commits in the window
    pub commit_count: usize,
    /// Commits unique to this branch relative to the comparison set
    pub unique_commit_count: usize,
    /// Sum of additions across the window
    pub total_additions: u64,
    /// Sum of deletions across the window
    pub total_deletions: u64,
    /// Sum of files touched across the window
    pub total_files: u64,
}

impl BranchStats {
    /// Sum stats over a commit sequence, with the unique-partition size
    /// supplied by the diff.
    pub fn for_commits(commits: &[CommitRecord], unique_commit_count: usize) -> Self {
        Self {
            commit_count: commits.len(),
            unique_commit_count,
            total_additions: commits.iter().map(|c| c.additions).sum(),
            total_deletions: commits.iter().map(|c| c.deletions).sum(),
            total_files: commits.iter().map(|c| c.file_count).sum(),
        }
    }
}

/// Result of diffing two branch commit windows
///
/// Immutable after construction; partitions preserve the order of their
/// source sequence, and `common` reports the base-side records.
#[derive(Debug, Clone, Serialize)]
pub struct DiffResult {
    /// All base-branch commits in the window
    pub base_commits: Vec<CommitRecord>,
    /// All compare-branch commits in the window
    pub compare_commits: Vec<CommitRecord>,
    /// Base commits absent from the compare branch
    pub unique_to_base: Vec<CommitRecord>,
    /// Compare commits absent from the base branch
    pub unique_to_compare: Vec<CommitRecord>,
    /// Base-side records for commits present on both branches
    pub common: Vec<CommitRecord>,
    /// Aggregate stats for the base branch
    pub base_stats: BranchStats,
    /// Aggregate stats for the compare branch
    pub compare_stats: BranchStats,
}

/// Pull request state tracked by the correlator
///
/// "Merged" is a display-only refinement some presentations apply; the
/// correlator only distinguishes open from closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed (merged or not)
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// State filter passed through to the provider request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    /// Only open PRs
    #[default]
    Open,
    /// Only closed PRs
    Closed,
    /// Both open and closed PRs
    All,
}

impl std::fmt::Display for StateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::All => write!(f, "all"),
        }
    }
}

/// How a pull request relates to the branch under analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrRelation {
    /// The PR's head is the target branch (originates from it)
    From,
    /// The PR's base is the target branch (targets it)
    To,
}

impl std::fmt::Display for PrRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::From => write!(f, "from"),
            Self::To => write!(f, "to"),
        }
    }
}

/// A normalized, classified pull request
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestRecord {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Open or closed
    pub state: PrState,
    /// Author login, or "Unknown"
    pub author: String,
    /// When the PR was opened
    pub created_at: DateTime<Utc>,
    /// When the PR was last updated
    pub updated_at: DateTime<Utc>,
    /// Head branch name
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
    /// Web URL for the PR
    pub html_url: String,
    /// Relation to the target branch
    pub relation: PrRelation,
    /// Whether the PR is a draft
    pub draft: bool,
    /// Whether the PR can be merged (`None` = still computing)
    pub mergeable: Option<bool>,
    /// Issue comment count
    pub comment_count: u64,
    /// Review comment count
    pub review_comment_count: u64,
    /// Number of commits on the PR
    pub commit_count: u64,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
    /// Number of files changed
    pub changed_file_count: u64,
    /// PR body, absent when the author left it empty
    pub body: Option<String>,
}

/// Why a record was dropped during normalization
///
/// The explicit per-item alternative to catch-and-continue: a malformed
/// record is skipped with a reason, and the rest of the batch proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipReason {
    /// Identifier of the skipped record (commit id or PR number)
    pub id: String,
    /// Human-readable reason for the skip
    pub reason: String,
}

impl SkipReason {
    /// Build a skip for a record identifier
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Summary counts over the final correlation result list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorrelationSummary {
    /// Size of the final filtered and truncated list
    pub total: usize,
    /// PRs originating from the target branch
    pub from_count: usize,
    /// PRs targeting the target branch
    pub to_count: usize,
    /// Open PRs in the final list
    pub open_count: usize,
    /// Closed PRs in the final list
    pub closed_count: usize,
    /// Draft PRs in the final list
    pub draft_count: usize,
}

/// Result of correlating a pull-request batch against a branch
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationResult {
    /// Filtered, sorted, truncated records
    pub pull_requests: Vec<PullRequestRecord>,
    /// Counts over `pull_requests` (post-truncation)
    pub summary: CorrelationSummary,
    /// Records skipped as malformed while processing the batch
    pub diagnostics: Vec<SkipReason>,
}

/// A branch as listed by the provider
#[derive(Debug, Clone, Serialize)]
pub struct BranchInfo {
    /// Branch name
    pub name: String,
    /// Whether the branch is protected
    pub protected: bool,
    /// Truncated id of the branch tip
    pub tip_short_id: String,
}

/// The account a token authenticates as
#[derive(Debug, Clone, Serialize)]
pub struct TokenIdentity {
    /// Account login
    pub login: String,
    /// Display name, when set
    pub name: Option<String>,
    /// Avatar image URL
    pub avatar_url: String,
}
