//! Progress reporting
//!
//! The engines take an injected reporter instead of writing to a global
//! console, so the pure data transformation stays decoupled from whatever
//! surface (CLI spinner, web request, test) is driving it.

/// Observer for long-running fetch and correlation work
///
/// All methods have empty defaults; implementations override what they care
/// about. Implementations must be cheap; these are called per record.
pub trait Reporter: Send + Sync {
    /// A named task started (e.g. "fetching commits from main")
    fn task_started(&self, _description: &str) {}

    /// One record of the current task was processed
    fn record_processed(&self) {}

    /// A record was dropped as malformed
    fn record_skipped(&self, _id: &str, _reason: &str) {}

    /// The current task finished
    fn task_finished(&self, _description: &str) {}
}

/// Reporter that discards everything; used by the web API and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}
