//! Prs command - pull requests related to a branch

use crate::cli::render::print_correlation;
use crate::cli::style::Stylize;
use crate::cli::{SpinnerReporter, StateArg, build_provider};
use anstream::println;
use branch_drift::engine::{CorrelateOptions, correlate_pull_requests};
use branch_drift::error::Result;
use branch_drift::provider::ProviderService;
use branch_drift::types::StateFilter;
use chrono::{Duration, Utc};

/// Options for the prs command
#[derive(Debug, Clone)]
pub struct PrsOptions {
    /// PR state to request from the provider
    pub state: StateArg,
    /// Recency window in days, when given
    pub days: Option<u32>,
    /// Ticket reference to require in title or body
    pub ticket: Option<String>,
    /// Maximum PRs to display
    pub limit: usize,
    /// Pagination ceiling
    pub scan_limit: usize,
}

/// Run the prs command
pub async fn run_prs(
    token: Option<&str>,
    host: Option<&str>,
    repo: &str,
    branch: &str,
    options: PrsOptions,
) -> Result<()> {
    let provider = build_provider(token, host, repo)?;
    let state: StateFilter = options.state.into();
    println!(
        "\nPull requests for {} related to {} (state: {state})\n",
        provider.repo().to_string().emphasis(),
        branch.emphasis()
    );

    let result = {
        let reporter = SpinnerReporter::new();
        let batch = provider
            .list_pull_requests(state, options.scan_limit)
            .await?;
        let correlate_options = CorrelateOptions {
            since: options
                .days
                .map(|days| Utc::now() - Duration::days(i64::from(days))),
            ticket: options.ticket.clone(),
            scan_limit: options.scan_limit,
            display_limit: Some(options.limit),
        };
        correlate_pull_requests(&batch, branch, &correlate_options, &reporter)
    };

    print_correlation(branch, &result);
    Ok(())
}
