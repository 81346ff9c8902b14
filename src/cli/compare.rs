//! Compare command - branch divergence within a time window

use crate::cli::render::print_diff;
use crate::cli::style::Stylize;
use crate::cli::{SpinnerReporter, build_provider};
use anstream::println;
use branch_drift::engine::{diff_branches, fetch_commit_window};
use branch_drift::error::{Error, Result};
use branch_drift::provider::ProviderService;

/// Split a `base..compare` range argument.
fn parse_range(range: &str) -> Result<(&str, &str)> {
    match range.split_once("..") {
        Some((base, compare)) if !base.is_empty() && !compare.is_empty() => Ok((base, compare)),
        _ => Err(Error::InvalidArgument(format!(
            "invalid range '{range}': expected base_branch..compare_branch"
        ))),
    }
}

/// Run the compare command
pub async fn run_compare(
    token: Option<&str>,
    host: Option<&str>,
    repo: &str,
    range: &str,
    days: u32,
    limit: usize,
) -> Result<()> {
    let (base_branch, compare_branch) = parse_range(range)?;
    let provider = build_provider(token, host, repo)?;

    println!("\nRepository: {}", provider.repo().to_string().emphasis());
    println!(
        "Comparing:  {} ↔ {}",
        base_branch.emphasis(),
        compare_branch.emphasis()
    );
    println!("{}\n", format!("Time period: last {days} days").muted());

    let (base, compare) = {
        let reporter = SpinnerReporter::new();
        let base = fetch_commit_window(&provider, base_branch, days, &reporter).await?;
        let compare = fetch_commit_window(&provider, compare_branch, days, &reporter).await?;
        (base, compare)
    };

    let diff = diff_branches(&base, &compare);
    print_diff(base_branch, compare_branch, &diff, days, limit);
    Ok(())
}
