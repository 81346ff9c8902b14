//! GitHub provider implementation
//!
//! Uses octocrab where its models fit (pull requests) and raw REST calls
//! with our own response structs where they do not (branches, commits with
//! change stats).

use crate::error::{Error, Result};
use crate::provider::{ProviderService, RawCommit, RawPullRequest};
use crate::repo::RepoId;
use crate::types::{BranchInfo, SHORT_ID_LEN, StateFilter};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Records requested per page from the REST API
const PER_PAGE: u8 = 100;

// REST response shapes for the endpoints we call directly

#[derive(Deserialize)]
struct BranchResponse {
    name: String,
    protected: bool,
    commit: BranchCommitRef,
}

#[derive(Deserialize)]
struct BranchCommitRef {
    sha: String,
}

#[derive(Deserialize)]
struct CommitListItem {
    sha: String,
    html_url: String,
    author: Option<AccountRef>,
    commit: CommitMeta,
}

#[derive(Deserialize)]
struct AccountRef {
    login: String,
}

#[derive(Deserialize)]
struct CommitMeta {
    message: String,
    author: Option<CommitSignature>,
}

#[derive(Deserialize)]
struct CommitSignature {
    date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct CommitDetail {
    stats: Option<CommitStats>,
    files: Option<Vec<CommitFile>>,
}

#[derive(Deserialize)]
struct CommitStats {
    additions: u64,
    deletions: u64,
}

#[derive(Deserialize)]
struct CommitFile {}

/// GitHub service bound to a single repository
pub struct GitHubProvider {
    client: Octocrab,
    /// HTTP client for endpoints octocrab does not model cleanly
    http_client: Client,
    token: String,
    api_host: String,
    repo: RepoId,
}

impl GitHubProvider {
    /// Create a provider for a repository.
    ///
    /// `host` selects a GitHub Enterprise instance; `None` means github.com.
    pub fn new(token: &str, repo: RepoId, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_host = if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::Api(e.to_string()))?;
            format!("{h}/api/v3")
        } else {
            "api.github.com".to_string()
        };

        let client = builder.build().map_err(|e| Error::Api(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("branch-drift")
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            http_client,
            token: token.to_string(),
            api_host,
            repo,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "https://{}/repos/{}/{}{path}",
            self.api_host, self.repo.owner, self.repo.name
        )
    }

    /// GET a repo-scoped REST path, returning `Ok(None)` on 404 so callers
    /// can attach the right not-found error.
    async fn rest_get<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let response = self
            .http_client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if status.as_u16() == 401 {
            return Err(Error::Auth(format!("GitHub rejected the token ({url})")));
        }
        if status.as_u16() == 403 {
            let body = response.text().await.unwrap_or_default();
            if body.to_lowercase().contains("rate limit") {
                return Err(Error::RateLimited(format!("while requesting {url}")));
            }
            return Err(Error::Api(format!("403 for {url}: {body}")));
        }
        if !status.is_success() {
            return Err(Error::Api(format!("{status} for {url}")));
        }

        let value = response
            .json::<T>()
            .await
            .map_err(|e| Error::Api(format!("Failed to parse response from {url}: {e}")))?;
        Ok(Some(value))
    }

    /// Fetch per-commit change stats; the list endpoint never includes them.
    async fn commit_detail(&self, sha: &str) -> Result<(u64, u64, u64)> {
        let url = self.repo_url(&format!("/commits/{sha}"));
        let detail: CommitDetail = self
            .rest_get(&url)
            .await?
            .ok_or_else(|| Error::Api(format!("commit {sha} vanished from {}", self.repo)))?;

        let (additions, deletions) = detail
            .stats
            .map_or((0, 0), |s| (s.additions, s.deletions));
        let file_count = detail.files.map_or(0, |f| f.len() as u64);
        Ok((file_count, additions, deletions))
    }
}

#[async_trait]
impl ProviderService for GitHubProvider {
    async fn resolve_branch_tip(&self, branch: &str) -> Result<String> {
        debug!(%branch, repo = %self.repo, "resolving branch tip");
        let url = self.repo_url(&format!("/branches/{branch}"));
        let response: BranchResponse =
            self.rest_get(&url)
                .await?
                .ok_or_else(|| Error::BranchNotFound {
                    repo: self.repo.to_string(),
                    branch: branch.to_string(),
                })?;
        debug!(%branch, tip = %response.commit.sha, "resolved branch tip");
        Ok(response.commit.sha)
    }

    async fn list_commits(&self, tip_sha: &str, since: DateTime<Utc>) -> Result<Vec<RawCommit>> {
        debug!(%tip_sha, %since, repo = %self.repo, "listing commits");
        let since_param = since_query_param(since);
        let mut items: Vec<CommitListItem> = Vec::new();
        let mut page = 1u32;

        loop {
            let url = self.repo_url(&format!(
                "/commits?sha={tip_sha}&since={since_param}&per_page={PER_PAGE}&page={page}"
            ));
            let batch: Vec<CommitListItem> =
                self.rest_get(&url).await?.ok_or_else(|| Error::RepoNotFound(
                    self.repo.to_string(),
                ))?;
            let batch_len = batch.len();
            items.extend(batch);
            if batch_len < usize::from(PER_PAGE) {
                break;
            }
            page += 1;
        }

        let mut commits = Vec::with_capacity(items.len());
        for item in items {
            // The list shape has no stats; fetch them per commit, like the
            // original client did lazily.
            let (file_count, additions, deletions) = self.commit_detail(&item.sha).await?;
            commits.push(RawCommit {
                sha: item.sha,
                author_login: item.author.map(|a| a.login),
                authored_at: item.commit.author.and_then(|a| a.date),
                message: item.commit.message,
                file_count,
                additions,
                deletions,
                html_url: item.html_url,
            });
        }

        debug!(count = commits.len(), "listed commits");
        Ok(commits)
    }

    async fn list_pull_requests(
        &self,
        state: StateFilter,
        max_records: usize,
    ) -> Result<Vec<RawPullRequest>> {
        debug!(%state, max_records, repo = %self.repo, "listing pull requests");
        let mut raw = Vec::new();
        let mut page = 1u32;

        while raw.len() < max_records {
            let octocrab_state = match state {
                StateFilter::Open => octocrab::params::State::Open,
                StateFilter::Closed => octocrab::params::State::Closed,
                StateFilter::All => octocrab::params::State::All,
            };
            let prs = self
                .client
                .pulls(&self.repo.owner, &self.repo.name)
                .list()
                .state(octocrab_state)
                .sort(octocrab::params::pulls::Sort::Updated)
                .direction(octocrab::params::Direction::Descending)
                .per_page(PER_PAGE)
                .page(page)
                .send()
                .await?;

            let batch_len = prs.items.len();
            for pr in prs.items {
                if raw.len() >= max_records {
                    break;
                }
                raw.push(self.hydrate_pull_request(pr).await);
            }
            if batch_len < usize::from(PER_PAGE) {
                break;
            }
            page += 1;
        }

        debug!(count = raw.len(), "listed pull requests");
        Ok(raw)
    }

    async fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        debug!(repo = %self.repo, "listing branches");
        let mut branches = Vec::new();
        let mut page = 1u32;

        loop {
            let url = self.repo_url(&format!("/branches?per_page={PER_PAGE}&page={page}"));
            let batch: Vec<BranchResponse> =
                self.rest_get(&url).await?.ok_or_else(|| Error::RepoNotFound(
                    self.repo.to_string(),
                ))?;
            let batch_len = batch.len();
            for b in batch {
                let tip_short_id = b.commit.sha.chars().take(SHORT_ID_LEN).collect();
                branches.push(BranchInfo {
                    name: b.name,
                    protected: b.protected,
                    tip_short_id,
                });
            }
            if batch_len < usize::from(PER_PAGE) {
                break;
            }
            page += 1;
        }

        debug!(count = branches.len(), "listed branches");
        Ok(branches)
    }

    fn repo(&self) -> &RepoId {
        &self.repo
    }
}

impl GitHubProvider {
    /// Fill in the count fields the list endpoint omits.
    ///
    /// Best effort: when the detail request fails we keep the list shape
    /// (counts absent) rather than failing the batch.
    async fn hydrate_pull_request(
        &self,
        pr: octocrab::models::pulls::PullRequest,
    ) -> RawPullRequest {
        let number = pr.number;
        let detailed = match self
            .client
            .pulls(&self.repo.owner, &self.repo.name)
            .get(number)
            .await
        {
            Ok(full) => full,
            Err(e) => {
                debug!(number, error = %e, "PR detail fetch failed, using list shape");
                pr
            }
        };
        raw_from_octocrab(&detailed)
    }
}

/// Format a cutoff for use in a query string.
///
/// Uses the `Z` suffix rather than a `+00:00` offset: the timestamp is
/// interpolated into the URL unencoded, and a raw `+` would be decoded as a
/// space on the server side, breaking the `since` bound.
fn since_query_param(since: DateTime<Utc>) -> String {
    since.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Convert an octocrab PR model into our loose raw shape
fn raw_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> RawPullRequest {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => "open".to_string(),
        Some(octocrab::models::IssueState::Closed) => "closed".to_string(),
        // IssueState is non-exhaustive; pass anything else through as-is
        // and let normalization decide.
        _ => String::new(),
    };

    RawPullRequest {
        number: pr.number,
        title: pr.title.clone(),
        state,
        author_login: pr.user.as_ref().map(|u| u.login.clone()),
        created_at: pr.created_at.map(|d| d.to_rfc3339()),
        updated_at: pr.updated_at.map(|d| d.to_rfc3339()),
        head_ref: pr.head.ref_field.clone(),
        base_ref: pr.base.ref_field.clone(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        draft: pr.draft.unwrap_or(false),
        mergeable: pr.mergeable,
        comment_count: pr.comments,
        review_comment_count: pr.review_comments,
        commit_count: pr.commits,
        additions: pr.additions,
        deletions: pr.deletions,
        changed_file_count: pr.changed_files,
        body: pr.body.clone(),
    }
}
