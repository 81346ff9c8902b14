//! Changes command - recent commits on one branch

use crate::cli::render::print_commit_table;
use crate::cli::style::Stylize;
use crate::cli::{SpinnerReporter, build_provider};
use anstream::println;
use branch_drift::engine::fetch_commit_window;
use branch_drift::error::Result;
use branch_drift::provider::ProviderService;

/// Run the changes command
pub async fn run_changes(
    token: Option<&str>,
    host: Option<&str>,
    repo: &str,
    branch: &str,
    days: u32,
    limit: usize,
) -> Result<()> {
    let provider = build_provider(token, host, repo)?;
    println!(
        "\nFetching changes for {} ({}) - last {days} days\n",
        provider.repo().to_string().emphasis(),
        branch.emphasis()
    );

    let commits = {
        let reporter = SpinnerReporter::new();
        fetch_commit_window(&provider, branch, days, &reporter).await?
    };

    if commits.is_empty() {
        println!("{}", format!("No changes found in the last {days} days.").warning());
        return Ok(());
    }

    print_commit_table(&format!("Recent commits in {branch}"), &commits, limit);
    Ok(())
}
