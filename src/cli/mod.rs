//! CLI surface for branch-drift

mod changes;
mod compare;
mod prs;
pub mod render;
pub mod style;

pub use changes::run_changes;
pub use compare::run_compare;
pub use prs::{PrsOptions, run_prs};

use crate::cli::style::spinner_style;
use branch_drift::auth::resolve_token;
use branch_drift::error::Result;
use branch_drift::progress::Reporter;
use branch_drift::provider::GitHubProvider;
use branch_drift::repo::RepoId;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;
use std::time::Duration;
use tracing::debug;

/// Branch divergence and pull-request correlation for GitHub repositories
#[derive(Parser)]
#[command(name = "drift", version, about)]
pub struct Cli {
    /// GitHub token (falls back to GITHUB_TOKEN, then the gh CLI)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// GitHub Enterprise host (default: github.com)
    #[arg(long, global = true)]
    pub host: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pull request state filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StateArg {
    /// Only open PRs
    #[default]
    Open,
    /// Only closed PRs
    Closed,
    /// Both open and closed PRs
    All,
}

impl From<StateArg> for branch_drift::types::StateFilter {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Open => Self::Open,
            StateArg::Closed => Self::Closed,
            StateArg::All => Self::All,
        }
    }
}

/// Subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List recent commits on one branch
    Changes {
        /// Repository (owner/name, github.com/owner/name, or URL)
        repo: String,
        /// Branch to inspect
        #[arg(default_value = "main")]
        branch: String,
        /// Lookback window in days
        #[arg(long, default_value_t = 30)]
        days: u32,
        /// Maximum commits to display
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Compare two branches within a time window
    Compare {
        /// Repository (owner/name, github.com/owner/name, or URL)
        repo: String,
        /// Branches to compare, as base..compare
        range: String,
        /// Lookback window in days
        #[arg(long, default_value_t = 30)]
        days: u32,
        /// Maximum commits to display per table
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Correlate pull requests against a branch
    Prs {
        /// Repository (owner/name, github.com/owner/name, or URL)
        repo: String,
        /// Branch to correlate against
        branch: String,
        /// PR state to request from the provider
        #[arg(long, value_enum, default_value_t = StateArg::Open)]
        state: StateArg,
        /// Only PRs updated within this many days
        #[arg(long)]
        days: Option<u32>,
        /// Only PRs whose title or body mentions this ticket reference
        #[arg(long)]
        ticket: Option<String>,
        /// Maximum PRs to display
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Maximum provider records to consider (pagination ceiling)
        #[arg(long, default_value_t = branch_drift::engine::DEFAULT_SCAN_LIMIT)]
        scan_limit: usize,
    },
    /// Serve the JSON web API
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
}

/// Build a provider from CLI-level auth and repo arguments.
pub fn build_provider(
    token: Option<&str>,
    host: Option<&str>,
    repo: &str,
) -> Result<GitHubProvider> {
    let (token, source) = resolve_token(token)?;
    debug!(%source, "resolved token");
    let repo = RepoId::parse(repo)?;
    GitHubProvider::new(&token, repo, host.map(String::from))
}

/// Reporter backed by an indicatif spinner
pub struct SpinnerReporter {
    bar: ProgressBar,
}

impl SpinnerReporter {
    /// Create a spinner that ticks on its own
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl Default for SpinnerReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for SpinnerReporter {
    fn task_started(&self, description: &str) {
        self.bar.set_message(format!("{description}..."));
    }

    fn record_skipped(&self, id: &str, reason: &str) {
        self.bar.println(format!("skipped {id}: {reason}"));
    }

    fn task_finished(&self, description: &str) {
        self.bar.set_message(description.to_string());
    }
}

impl Drop for SpinnerReporter {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
