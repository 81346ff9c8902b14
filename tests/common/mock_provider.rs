//! Mock provider service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use branch_drift::error::{Error, Result};
use branch_drift::provider::{ProviderService, RawCommit, RawPullRequest};
use branch_drift::repo::RepoId;
use branch_drift::types::{BranchInfo, StateFilter};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for `list_pull_requests`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPullRequestsCall {
    pub state: StateFilter,
    pub max_records: usize,
}

/// Simple mock provider service for testing
///
/// Features:
/// - Configurable branch tips and commit windows
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockProviderService {
    repo: RepoId,
    branch_tips: Mutex<HashMap<String, String>>,
    commits_by_tip: Mutex<HashMap<String, Vec<RawCommit>>>,
    pull_requests: Mutex<Vec<RawPullRequest>>,
    branches: Mutex<Vec<BranchInfo>>,
    // Call tracking
    resolve_tip_calls: Mutex<Vec<String>>,
    list_commits_calls: Mutex<Vec<(String, DateTime<Utc>)>>,
    list_pull_requests_calls: Mutex<Vec<ListPullRequestsCall>>,
    // Error injection
    error_on_list_commits: Mutex<Option<String>>,
}

impl MockProviderService {
    /// Create an empty mock for `owner/repo`
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            repo: RepoId {
                owner: owner.to_string(),
                name: repo.to_string(),
            },
            branch_tips: Mutex::new(HashMap::new()),
            commits_by_tip: Mutex::new(HashMap::new()),
            pull_requests: Mutex::new(Vec::new()),
            branches: Mutex::new(Vec::new()),
            resolve_tip_calls: Mutex::new(Vec::new()),
            list_commits_calls: Mutex::new(Vec::new()),
            list_pull_requests_calls: Mutex::new(Vec::new()),
            error_on_list_commits: Mutex::new(None),
        }
    }

    /// Register a branch whose tip serves the given commits
    pub fn with_branch(self, branch: &str, commits: Vec<RawCommit>) -> Self {
        let tip = commits
            .first()
            .map_or_else(|| format!("{branch}-tip"), |c| c.sha.clone());
        self.branch_tips
            .lock()
            .unwrap()
            .insert(branch.to_string(), tip.clone());
        self.commits_by_tip.lock().unwrap().insert(tip, commits);
        self
    }

    /// Register the pull-request batch served by `list_pull_requests`
    pub fn with_pull_requests(self, prs: Vec<RawPullRequest>) -> Self {
        *self.pull_requests.lock().unwrap() = prs;
        self
    }

    /// Register the branch list
    pub fn with_branches(self, branches: Vec<BranchInfo>) -> Self {
        *self.branches.lock().unwrap() = branches;
        self
    }

    /// Make `list_commits` fail with a transport error
    pub fn fail_list_commits(self, message: &str) -> Self {
        *self.error_on_list_commits.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Branches resolved so far
    pub fn resolved_branches(&self) -> Vec<String> {
        self.resolve_tip_calls.lock().unwrap().clone()
    }

    /// `list_pull_requests` calls so far
    pub fn pull_request_calls(&self) -> Vec<ListPullRequestsCall> {
        self.list_pull_requests_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderService for MockProviderService {
    async fn resolve_branch_tip(&self, branch: &str) -> Result<String> {
        self.resolve_tip_calls
            .lock()
            .unwrap()
            .push(branch.to_string());
        self.branch_tips
            .lock()
            .unwrap()
            .get(branch)
            .cloned()
            .ok_or_else(|| Error::BranchNotFound {
                repo: self.repo.to_string(),
                branch: branch.to_string(),
            })
    }

    async fn list_commits(&self, tip_sha: &str, since: DateTime<Utc>) -> Result<Vec<RawCommit>> {
        self.list_commits_calls
            .lock()
            .unwrap()
            .push((tip_sha.to_string(), since));
        if let Some(message) = self.error_on_list_commits.lock().unwrap().clone() {
            return Err(Error::Api(message));
        }
        let commits = self
            .commits_by_tip
            .lock()
            .unwrap()
            .get(tip_sha)
            .cloned()
            .unwrap_or_default();
        // The provider contract bounds the window by the cutoff.
        Ok(commits
            .into_iter()
            .filter(|c| c.authored_at.is_none_or(|d| d >= since))
            .collect())
    }

    async fn list_pull_requests(
        &self,
        state: StateFilter,
        max_records: usize,
    ) -> Result<Vec<RawPullRequest>> {
        self.list_pull_requests_calls
            .lock()
            .unwrap()
            .push(ListPullRequestsCall { state, max_records });
        let prs = self.pull_requests.lock().unwrap().clone();
        Ok(prs.into_iter().take(max_records).collect())
    }

    async fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        Ok(self.branches.lock().unwrap().clone())
    }

    fn repo(&self) -> &RepoId {
        &self.repo
    }
}

/// A raw commit fixture with a distinct sha prefix
pub fn make_commit(prefix: &str, days_ago: i64) -> RawCommit {
    let sha = format!("{prefix:0<40}");
    RawCommit {
        sha: sha.clone(),
        author_login: Some("alice".to_string()),
        authored_at: Some(Utc::now() - chrono::Duration::days(days_ago)),
        message: format!("Commit {prefix}\n\nDetails for {prefix}"),
        file_count: 1,
        additions: 10,
        deletions: 2,
        html_url: format!("https://github.com/acme/widgets/commit/{sha}"),
    }
}

/// A raw pull request fixture related to the given branches
pub fn make_pull_request(number: u64, head: &str, base: &str) -> RawPullRequest {
    RawPullRequest {
        number,
        title: Some(format!("PR {number}")),
        state: "open".to_string(),
        author_login: Some("alice".to_string()),
        created_at: Some(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .unwrap()
                .to_rfc3339(),
        ),
        updated_at: Some(
            (Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::hours(i64::try_from(number).unwrap_or(0)))
            .to_rfc3339(),
        ),
        head_ref: head.to_string(),
        base_ref: base.to_string(),
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
        draft: false,
        ..RawPullRequest::default()
    }
}
