//! JSON web API
//!
//! Thin axum handlers over the engines. Each request carries its own token
//! and constructs its own provider, so concurrent requests share no state.
//! Provider errors are answered as JSON error bodies, never a crash.

use crate::auth::validate_token;
use crate::engine::{
    CorrelateOptions, DEFAULT_SCAN_LIMIT, correlate_pull_requests, diff_branches,
    fetch_commit_window,
};
use crate::error::{Error, Result};
use crate::progress::NullReporter;
use crate::provider::{GitHubProvider, ProviderService};
use crate::repo::RepoId;
use crate::types::{DiffResult, StateFilter};
use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Error wrapper that renders as a JSON body with the right status code
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::BranchNotFound { .. } | Error::RepoNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidRepo(_) | Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Error::Api(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

fn default_branch() -> String {
    "main".to_string()
}

const fn default_days() -> u32 {
    30
}

const fn default_limit() -> usize {
    20
}

const fn default_scan_limit() -> usize {
    DEFAULT_SCAN_LIMIT
}

#[derive(Deserialize)]
struct ChangesRequest {
    token: String,
    repo: String,
    #[serde(default = "default_branch")]
    branch: String,
    #[serde(default = "default_days")]
    days: u32,
    #[serde(default = "default_limit")]
    limit: usize,
}

#[derive(Deserialize)]
struct CompareRequest {
    token: String,
    repo: String,
    base_branch: String,
    compare_branch: String,
    #[serde(default = "default_days")]
    days: u32,
    #[serde(default = "default_limit")]
    limit: usize,
}

#[derive(Deserialize)]
struct PrsRequest {
    token: String,
    repo: String,
    branch: String,
    #[serde(default)]
    state: StateFilter,
    /// Lookback in days for the recency filter; absent means no filter
    days: Option<u32>,
    ticket: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default = "default_scan_limit")]
    scan_limit: usize,
}

#[derive(Deserialize)]
struct ValidateTokenRequest {
    token: String,
}

fn provider_for(token: &str, repo: &str) -> Result<GitHubProvider> {
    let repo = RepoId::parse(repo)?;
    GitHubProvider::new(token, repo, None)
}

/// Truncate each displayed partition; the stats still describe the full
/// window.
fn truncate_diff(diff: &mut DiffResult, limit: usize) {
    diff.unique_to_base.truncate(limit);
    diff.unique_to_compare.truncate(limit);
    diff.common.truncate(limit);
}

fn bearer_token(headers: &HeaderMap) -> Result<String> {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start_matches("Bearer ").trim())
        .unwrap_or_default();
    if value.is_empty() {
        return Err(Error::Auth("GitHub token is required".to_string()));
    }
    Ok(value.to_string())
}

async fn get_branches(
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let token = bearer_token(&headers)?;
    let provider = provider_for(&token, &format!("{owner}/{repo}"))?;
    let branches = provider.list_branches().await?;
    Ok(Json(json!({ "branches": branches })))
}

async fn post_changes(Json(req): Json<ChangesRequest>) -> ApiResult<Json<serde_json::Value>> {
    let provider = provider_for(&req.token, &req.repo)?;
    let mut changes =
        fetch_commit_window(&provider, &req.branch, req.days, &NullReporter).await?;
    let total = changes.len();
    changes.truncate(req.limit);

    Ok(Json(json!({
        "repository": provider.repo().to_string(),
        "branch": req.branch,
        "days": req.days,
        "total_commits": total,
        "changes": changes,
    })))
}

async fn post_compare(Json(req): Json<CompareRequest>) -> ApiResult<Json<serde_json::Value>> {
    let provider = provider_for(&req.token, &req.repo)?;
    let base = fetch_commit_window(&provider, &req.base_branch, req.days, &NullReporter).await?;
    let compare =
        fetch_commit_window(&provider, &req.compare_branch, req.days, &NullReporter).await?;

    let mut diff = diff_branches(&base, &compare);
    truncate_diff(&mut diff, req.limit);

    Ok(Json(json!({
        "repository": provider.repo().to_string(),
        "base_branch": req.base_branch,
        "compare_branch": req.compare_branch,
        "days": req.days,
        "comparison": diff,
    })))
}

async fn post_prs(Json(req): Json<PrsRequest>) -> ApiResult<Json<serde_json::Value>> {
    let provider = provider_for(&req.token, &req.repo)?;
    let batch = provider
        .list_pull_requests(req.state, req.scan_limit)
        .await?;

    let options = CorrelateOptions {
        since: req
            .days
            .map(|days| Utc::now() - chrono::Duration::days(i64::from(days))),
        ticket: req.ticket,
        scan_limit: req.scan_limit,
        display_limit: Some(req.limit),
    };
    let result = correlate_pull_requests(&batch, &req.branch, &options, &NullReporter);

    Ok(Json(json!({
        "repository": provider.repo().to_string(),
        "branch": req.branch,
        "state": req.state,
        "result": result,
    })))
}

async fn post_validate_token(
    Json(req): Json<ValidateTokenRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let identity = validate_token(&req.token, None).await?;
    Ok(Json(json!({ "valid": true, "user": identity })))
}

/// Build the API router.
pub fn router() -> Router {
    Router::new()
        .route("/api/branches/:owner/:repo", get(get_branches))
        .route("/api/changes", post(post_changes))
        .route("/api/compare", post(post_compare))
        .route("/api/prs", post(post_prs))
        .route("/api/validate-token", post(post_validate_token))
        .layer(CorsLayer::permissive())
}

/// Serve the API on the given port until the process is stopped.
pub async fn serve(port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| Error::Api(format!("Failed to bind port {port}: {e}")))?;
    info!(port, "serving web API");
    axum::serve(listener, router())
        .await
        .map_err(|e| Error::Api(format!("Server error: {e}")))
}
