use crate::core::outcome::RunSummary;
use tracing::info;

/// Run-level notices for the host UI.
///
/// Exactly one start notice and one end notice per run; individual document
/// failures are logged for diagnostics, never surfaced here one-by-one.
pub trait Notifier: Send + Sync {
    fn run_started(&self, total_documents: usize);
    fn run_finished(&self, summary: &RunSummary);
}

/// Default notifier, emits notices on the tracing pipeline.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn run_started(&self, total_documents: usize) {
        info!("Sorting run started for {} document(s)", total_documents);
    }

    fn run_finished(&self, summary: &RunSummary) {
        info!("Sorting run finished: {}", summary);
    }
}

/// No-op notifier for embedders that render their own progress UI.
#[derive(Debug, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn run_started(&self, _total_documents: usize) {}

    fn run_finished(&self, _summary: &RunSummary) {}
}
