//! GitHub authentication
//!
//! Resolves a token from an explicit flag, the environment, or the `gh` CLI,
//! and can validate which account a token authenticates as.

use crate::error::{Error, Result};
use crate::types::TokenIdentity;
use serde::Deserialize;
use std::process::Command;
use tracing::debug;

/// Source of the authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token passed explicitly (flag or request body)
    Explicit,
    /// Token from the `GITHUB_TOKEN` environment variable
    EnvVar,
    /// Token from the `gh` CLI
    Cli,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit => write!(f, "--token flag"),
            Self::EnvVar => write!(f, "GITHUB_TOKEN"),
            Self::Cli => write!(f, "gh CLI"),
        }
    }
}

/// Resolve a GitHub token, in priority order: explicit value, environment
/// variable, `gh auth token`.
pub fn resolve_token(explicit: Option<&str>) -> Result<(String, AuthSource)> {
    if let Some(token) = explicit {
        let token = token.trim();
        if !token.is_empty() {
            return Ok((token.to_string(), AuthSource::Explicit));
        }
    }

    if let Ok(token) = std::env::var("GITHUB_TOKEN")
        && !token.trim().is_empty()
    {
        debug!("using token from GITHUB_TOKEN");
        return Ok((token.trim().to_string(), AuthSource::EnvVar));
    }

    if let Some(token) = gh_cli_token() {
        debug!("using token from gh CLI");
        return Ok((token, AuthSource::Cli));
    }

    Err(Error::Auth(
        "no GitHub token found: pass --token, set GITHUB_TOKEN, or log in with 'gh auth login'"
            .to_string(),
    ))
}

/// Ask the `gh` CLI for its stored token, if installed and logged in.
fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8(output.stdout).ok()?.trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}

#[derive(Deserialize)]
struct UserResponse {
    login: String,
    name: Option<String>,
    avatar_url: String,
}

/// Validate a token by asking who it authenticates as.
///
/// `host` selects a GitHub Enterprise instance; `None` means github.com.
pub async fn validate_token(token: &str, host: Option<&str>) -> Result<TokenIdentity> {
    let api_host = host.map_or_else(
        || "api.github.com".to_string(),
        |h| format!("{h}/api/v3"),
    );
    let url = format!("https://{api_host}/user");

    let client = reqwest::Client::builder()
        .user_agent("branch-drift")
        .build()
        .map_err(|e| Error::Api(format!("Failed to create HTTP client: {e}")))?;

    let response = client
        .get(&url)
        .header("Authorization", format!("Bearer {token}"))
        .header("Accept", "application/vnd.github+json")
        .send()
        .await?;

    if response.status().as_u16() == 401 {
        return Err(Error::Auth("token rejected by GitHub".to_string()));
    }
    if !response.status().is_success() {
        return Err(Error::Api(format!(
            "{} while validating token",
            response.status()
        )));
    }

    let user: UserResponse = response
        .json()
        .await
        .map_err(|e| Error::Api(format!("Failed to parse user response: {e}")))?;

    Ok(TokenIdentity {
        login: user.login,
        name: user.name,
        avatar_url: user.avatar_url,
    })
}
