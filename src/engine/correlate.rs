//! Pull request correlator
//!
//! Classifies a pre-fetched pull-request batch against a target branch,
//! applies recency and ticket-reference filters, and produces a ranked,
//! deduplicated result with summary counts. Unlike the fetcher this engine
//! tolerates per-item failure: one malformed record is skipped with a
//! diagnostic and the rest of the batch is still processed.

use crate::progress::Reporter;
use crate::provider::RawPullRequest;
use crate::types::{
    CorrelationResult, CorrelationSummary, PrRelation, PrState, PullRequestRecord, SkipReason,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, warn};

/// Default pagination ceiling: provider records considered per call
pub const DEFAULT_SCAN_LIMIT: usize = 200;

/// Options for one correlation call
#[derive(Debug, Clone)]
pub struct CorrelateOptions {
    /// Keep only PRs updated at or after this instant
    pub since: Option<DateTime<Utc>>,
    /// Keep only PRs whose title or body contains this ticket reference
    /// (case-insensitive substring)
    pub ticket: Option<String>,
    /// Pagination ceiling: batch records beyond this index are never
    /// considered; callers needing completeness must page upstream
    pub scan_limit: usize,
    /// Truncate the final sorted list to this many records
    pub display_limit: Option<usize>,
}

impl Default for CorrelateOptions {
    fn default() -> Self {
        Self {
            since: None,
            ticket: None,
            scan_limit: DEFAULT_SCAN_LIMIT,
            display_limit: None,
        }
    }
}

/// Correlate a pull-request batch against a target branch.
///
/// State filtering is not performed here: the batch is assumed to already
/// reflect the state requested from the provider. The final list is sorted
/// by update time descending with a stable sort, so ties keep their batch
/// order.
pub fn correlate_pull_requests(
    batch: &[RawPullRequest],
    target_branch: &str,
    options: &CorrelateOptions,
    reporter: &dyn Reporter,
) -> CorrelationResult {
    let target = target_branch.trim();
    debug!(
        target,
        batch = batch.len(),
        scan_limit = options.scan_limit,
        "correlating pull requests"
    );
    reporter.task_started(&format!("Correlating pull requests against {target}"));

    let mut records: Vec<PullRequestRecord> = Vec::new();
    let mut diagnostics = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for raw in batch.iter().take(options.scan_limit) {
        reporter.record_processed();
        // A PR can reappear across provider pages; keep its first occurrence.
        if !seen.insert(raw.number) {
            continue;
        }
        let record = match normalize_pull_request(raw, target) {
            Ok(Some(record)) => record,
            // Neither head nor base is the target branch; excluded entirely.
            Ok(None) => continue,
            Err(skip) => {
                warn!(id = %skip.id, reason = %skip.reason, "skipping malformed pull request");
                reporter.record_skipped(&skip.id, &skip.reason);
                diagnostics.push(skip);
                continue;
            }
        };

        if let Some(since) = options.since
            && record.updated_at < since
        {
            continue;
        }

        if let Some(ref ticket) = options.ticket
            && !matches_ticket(ticket, &record.title, record.body.as_deref())
        {
            continue;
        }

        records.push(record);
    }

    // Stable by construction: Vec::sort_by is a stable sort, so records with
    // equal update times keep their original batch order.
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    if let Some(limit) = options.display_limit {
        records.truncate(limit);
    }

    let summary = summarize(&records);
    reporter.task_finished(&format!("Matched {} pull requests", summary.total));

    CorrelationResult {
        pull_requests: records,
        summary,
        diagnostics,
    }
}

/// Classification priority: head match wins over base match, so a PR whose
/// head and base both equal the target is `from`.
fn classify(head_ref: &str, base_ref: &str, target: &str) -> Option<PrRelation> {
    if head_ref.trim() == target {
        Some(PrRelation::From)
    } else if base_ref.trim() == target {
        Some(PrRelation::To)
    } else {
        None
    }
}

/// Uppercase exact-substring match against title and body.
fn matches_ticket(pattern: &str, title: &str, body: Option<&str>) -> bool {
    let needle = pattern.to_uppercase();
    title.to_uppercase().contains(&needle)
        || body.unwrap_or_default().to_uppercase().contains(&needle)
}

/// Parse a provider timestamp.
///
/// RFC 3339 input keeps its offset; input without timezone information is
/// treated as UTC. This makes later comparisons total, which is how the
/// include-on-comparison-error policy is honored: the only failure left is a
/// parse failure, and that marks the record malformed.
pub(crate) fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(format!("unparsable timestamp '{value}'"))
}

/// Normalize and classify one raw pull request.
///
/// `Ok(None)` means the PR is unrelated to the target branch; `Err` means
/// the record is malformed and should be skipped with its reason.
fn normalize_pull_request(
    raw: &RawPullRequest,
    target: &str,
) -> Result<Option<PullRequestRecord>, SkipReason> {
    let id = format!("#{}", raw.number);

    let Some(relation) = classify(&raw.head_ref, &raw.base_ref, target) else {
        return Ok(None);
    };

    let title = raw
        .title
        .clone()
        .ok_or_else(|| SkipReason::new(&id, "missing title"))?;

    let state = match raw.state.as_str() {
        "open" => PrState::Open,
        "closed" => PrState::Closed,
        other => {
            return Err(SkipReason::new(&id, format!("unknown state '{other}'")));
        }
    };

    let created_at = raw
        .created_at
        .as_deref()
        .ok_or_else(|| SkipReason::new(&id, "missing created_at"))
        .and_then(|v| parse_instant(v).map_err(|e| SkipReason::new(&id, e)))?;
    let updated_at = raw
        .updated_at
        .as_deref()
        .ok_or_else(|| SkipReason::new(&id, "missing updated_at"))
        .and_then(|v| parse_instant(v).map_err(|e| SkipReason::new(&id, e)))?;

    let author = raw
        .author_login
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(Some(PullRequestRecord {
        number: raw.number,
        title,
        state,
        author,
        created_at,
        updated_at,
        head_ref: raw.head_ref.trim().to_string(),
        base_ref: raw.base_ref.trim().to_string(),
        html_url: raw.html_url.clone(),
        relation,
        draft: raw.draft,
        mergeable: raw.mergeable,
        comment_count: raw.comment_count.unwrap_or(0),
        review_comment_count: raw.review_comment_count.unwrap_or(0),
        commit_count: raw.commit_count.unwrap_or(0),
        additions: raw.additions.unwrap_or(0),
        deletions: raw.deletions.unwrap_or(0),
        changed_file_count: raw.changed_file_count.unwrap_or(0),
        body: raw.body.clone(),
    }))
}

/// Counts over the final, post-truncation list.
fn summarize(records: &[PullRequestRecord]) -> CorrelationSummary {
    let mut summary = CorrelationSummary {
        total: records.len(),
        ..CorrelationSummary::default()
    };
    for record in records {
        match record.relation {
            PrRelation::From => summary.from_count += 1,
            PrRelation::To => summary.to_count += 1,
        }
        match record.state {
            PrState::Open => summary.open_count += 1,
            PrState::Closed => summary.closed_count += 1,
        }
        if record.draft {
            summary.draft_count += 1;
        }
    }
    summary
}
