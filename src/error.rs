//! Error types for branch-drift

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the provider and the engines
///
/// Provider failures always name the repository or branch that failed, so
/// top-level callers (CLI, web handlers) can present them directly.
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication failed or no usable token was found
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The requested branch does not exist in the repository
    #[error("branch '{branch}' not found in {repo}")]
    BranchNotFound {
        /// Repository in owner/name form
        repo: String,
        /// Branch that failed to resolve
        branch: String,
    },

    /// The repository does not exist or is not visible to the token
    #[error("repository '{0}' not found")]
    RepoNotFound(String),

    /// The hosting API rejected the call due to rate limiting
    #[error("rate limited by GitHub: {0}")]
    RateLimited(String),

    /// Any other GitHub API or transport failure
    #[error("GitHub API error: {0}")]
    Api(String),

    /// A repository reference that could not be parsed into owner/name
    #[error("invalid repository '{0}': expected owner/name")]
    InvalidRepo(String),

    /// A malformed caller argument (e.g. a branch range)
    #[error("{0}")]
    InvalidArgument(String),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                let message = source.message;
                if status == 401 {
                    Self::Auth(message)
                } else if status == 403 && message.to_lowercase().contains("rate limit") {
                    Self::RateLimited(message)
                } else {
                    Self::Api(format!("{status}: {message}"))
                }
            }
            other => Self::Api(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Api(err.to_string())
    }
}
