pub mod ai;
pub mod config;
pub mod core;
pub mod error;
pub mod labels;
pub mod services;
pub mod store;

pub use ai::{ClassifierClient, Provider};
pub use config::{LabelSource, RunConfig};
pub use crate::core::{DocumentOutcome, Outcome, RunReport, RunSummary, SkipReason, SortEngine};
pub use error::{Result, SortError};
pub use labels::{CandidateLabelSet, MatchPolicy};
pub use services::{Notifier, SilentNotifier, TracingNotifier};
pub use store::{fs::FsStore, Document, DocumentStore, MemoryStore};

use std::sync::Arc;

/// Runs one full sorting pass over the store with the given configuration.
///
/// Builds the configured provider client (failing fast on a missing
/// credential, before any document is read), resolves the candidate label
/// set, lists the source documents and hands everything to the engine.
pub async fn run(
    config: &RunConfig,
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
) -> Result<RunReport> {
    config.validate()?;

    let classifier: Arc<dyn ClassifierClient> = Arc::from(ai::client_for(config)?);

    let labels = match &config.label_source {
        LabelSource::Explicit(list) => CandidateLabelSet::new(list.iter().cloned()),
        LabelSource::AutoDetect => CandidateLabelSet::new(store.list_locations().await?),
    };

    let documents = store.list_documents(&config.source_scope).await?;
    let engine = SortEngine::new(store, classifier, notifier, config);
    Ok(engine.run(documents, &labels).await)
}
