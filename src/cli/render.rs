//! Table and summary rendering for CLI output

use crate::cli::style::Stylize;
use anstream::println;
use branch_drift::types::{
    BranchStats, CommitRecord, CorrelationResult, DiffResult, PrRelation, PrState,
    PullRequestRecord,
};

const MESSAGE_WIDTH: usize = 60;
const TITLE_WIDTH: usize = 50;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// Print a commit table, truncated to `limit` rows.
pub fn print_commit_table(title: &str, commits: &[CommitRecord], limit: usize) {
    if commits.is_empty() {
        println!("{}", "No changes found.".warning());
        return;
    }

    println!("{}", title.header());
    println!(
        "{}",
        format!(
            "{:<8} {:<16} {:<17} {:<MESSAGE_WIDTH$} {:>5} {:>6} {:>6}",
            "Commit", "Author", "Date", "Message", "Files", "+", "-"
        )
        .muted()
    );

    for commit in commits.iter().take(limit) {
        println!(
            "{:<8} {:<16} {:<17} {:<MESSAGE_WIDTH$} {:>5} {:>6} {:>6}",
            commit.id.short().emphasis(),
            truncate(&commit.author, 16),
            commit.authored_at.format("%Y-%m-%d %H:%M"),
            truncate(&commit.summary, MESSAGE_WIDTH),
            commit.file_count,
            format!("+{}", commit.additions).added(),
            format!("-{}", commit.deletions).removed(),
        );
    }

    if commits.len() > limit {
        println!(
            "{}",
            format!("Showing {limit} of {} commits", commits.len()).muted()
        );
    }
    println!();
}

fn print_branch_stats(branch: &str, stats: &BranchStats) {
    println!("{}", format!("📊 {branch}").header());
    println!("  Total commits:  {}", stats.commit_count);
    println!("  Unique commits: {}", stats.unique_commit_count);
    println!("  Files changed:  {}", stats.total_files);
    println!(
        "  Additions:      {}",
        format!("+{}", stats.total_additions).added()
    );
    println!(
        "  Deletions:      {}",
        format!("-{}", stats.total_deletions).removed()
    );
}

/// Print the comparison summary followed by the three partition tables.
pub fn print_diff(base_branch: &str, compare_branch: &str, diff: &DiffResult, days: u32, limit: usize) {
    print_branch_stats(base_branch, &diff.base_stats);
    println!();
    print_branch_stats(compare_branch, &diff.compare_stats);
    println!();

    println!("{}", "📈 Comparison summary".header());
    println!("  Time period:    last {days} days");
    println!("  Common commits: {}", diff.common.len());
    println!("  Divergence:");
    println!(
        "    {} unique: {}",
        base_branch.emphasis(),
        diff.unique_to_base.len()
    );
    println!(
        "    {} unique: {}",
        compare_branch.emphasis(),
        diff.unique_to_compare.len()
    );
    println!();

    if !diff.unique_to_base.is_empty() {
        print_commit_table(
            &format!("Commits unique to {base_branch}"),
            &diff.unique_to_base,
            limit,
        );
    }
    if !diff.unique_to_compare.is_empty() {
        print_commit_table(
            &format!("Commits unique to {compare_branch}"),
            &diff.unique_to_compare,
            limit,
        );
    }
    if !diff.common.is_empty() {
        print_commit_table("Common commits in both branches", &diff.common, limit);
    }
}

fn relation_cell(pr: &PullRequestRecord) -> String {
    match pr.relation {
        PrRelation::From => "from".added(),
        PrRelation::To => "to".emphasis(),
    }
}

fn state_cell(pr: &PullRequestRecord) -> String {
    match pr.state {
        PrState::Open => "open".added(),
        PrState::Closed => "closed".removed(),
    }
}

/// Print the correlation result: table, summary counts, and any skipped
/// records.
pub fn print_correlation(branch: &str, result: &CorrelationResult) {
    if result.pull_requests.is_empty() {
        println!("{}", "No matching pull requests.".warning());
    } else {
        println!("{}", format!("Pull requests related to {branch}").header());
        println!(
            "{}",
            format!(
                "{:<7} {:<5} {:<7} {:<TITLE_WIDTH$} {:<16} {:<17} {:>6} {:>6}",
                "Number", "Rel", "State", "Title", "Author", "Updated", "+", "-"
            )
            .muted()
        );
        for pr in &result.pull_requests {
            let title = if pr.draft {
                format!("[draft] {}", pr.title)
            } else {
                pr.title.clone()
            };
            println!(
                "{:<7} {:<5} {:<7} {:<TITLE_WIDTH$} {:<16} {:<17} {:>6} {:>6}",
                format!("#{}", pr.number).emphasis(),
                relation_cell(pr),
                state_cell(pr),
                truncate(&title, TITLE_WIDTH),
                truncate(&pr.author, 16),
                pr.updated_at.format("%Y-%m-%d %H:%M"),
                format!("+{}", pr.additions).added(),
                format!("-{}", pr.deletions).removed(),
            );
        }
    }
    println!();

    let summary = &result.summary;
    println!("{}", "Summary".header());
    println!(
        "  {} total (from: {}, to: {}, open: {}, closed: {}, drafts: {})",
        summary.total,
        summary.from_count,
        summary.to_count,
        summary.open_count,
        summary.closed_count,
        summary.draft_count
    );

    if !result.diagnostics.is_empty() {
        println!();
        println!(
            "{}",
            format!("Skipped {} malformed record(s):", result.diagnostics.len()).warning()
        );
        for skip in &result.diagnostics {
            println!("  {} {}", skip.id.emphasis(), skip.reason.muted());
        }
    }
}
