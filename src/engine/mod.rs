//! The analysis engines
//!
//! Three stateless sub-engines over provider-supplied data: the commit
//! window fetcher, the branch diff, and the pull-request correlator. Data
//! flows one way, from provider through normalization to presentation, and
//! nothing here mutates provider state.

mod correlate;
mod diff;
mod fetch;

pub use correlate::{CorrelateOptions, DEFAULT_SCAN_LIMIT, correlate_pull_requests};
pub use diff::diff_branches;
pub use fetch::{fetch_commit_window, lookback_cutoff};
