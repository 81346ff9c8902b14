//! branch-drift: branch divergence and pull-request correlation for GitHub
//!
//! Three stateless engines over provider-supplied data:
//!
//! - [`engine::fetch_commit_window`]: the ordered commit window for one
//!   branch within a lookback window.
//! - [`engine::diff_branches`]: the partition of two commit windows into
//!   base-only, compare-only, and common, with per-branch stats.
//! - [`engine::correlate_pull_requests`]: classification, filtering, and
//!   ranking of pull requests against a target branch.
//!
//! The [`provider`] module supplies the data; the CLI and the [`web`] API
//! are thin presentation layers over the engine results.

pub mod auth;
pub mod engine;
pub mod error;
pub mod progress;
pub mod provider;
pub mod repo;
pub mod types;
pub mod web;
