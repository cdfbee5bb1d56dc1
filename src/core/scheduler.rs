use crate::ai::ClassifierClient;
use crate::config::RunConfig;
use crate::core::outcome::{Outcome, RunSummary, SkipReason};
use crate::core::relocate::relocate;
use crate::labels::{CandidateLabelSet, MatchPolicy};
use crate::services::Notifier;
use crate::store::{Document, DocumentStore};
use futures::future;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One document paired with its terminal state.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub document: Document,
    pub outcome: Outcome,
}

/// Everything a run produced: per-document outcomes plus the folded totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<DocumentOutcome>,
    pub summary: RunSummary,
}

/// Windowed bounded-concurrency engine.
///
/// Documents are processed in consecutive windows of `concurrency` tasks;
/// window N+1 never starts before window N fully drains, which is the sole
/// backpressure bounding in-flight classification calls. A fixed pause
/// between windows paces the external provider. There is no cancellation
/// and no retry: every document reaches exactly one terminal state.
pub struct SortEngine {
    store: Arc<dyn DocumentStore>,
    classifier: Arc<dyn ClassifierClient>,
    notifier: Arc<dyn Notifier>,
    concurrency: usize,
    window_pause: Duration,
    match_policy: MatchPolicy,
}

impl SortEngine {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        classifier: Arc<dyn ClassifierClient>,
        notifier: Arc<dyn Notifier>,
        config: &RunConfig,
    ) -> Self {
        Self {
            store,
            classifier,
            notifier,
            concurrency: config.concurrency.max(1),
            window_pause: Duration::from_millis(config.window_pause_ms),
            match_policy: config.match_policy,
        }
    }

    /// Runs the full pipeline over `documents`.
    ///
    /// Per-document errors never escape: each is converted to an `Outcome`
    /// at the task boundary and counted. An empty document set or an empty
    /// label set yields a zero-work report immediately, with no network
    /// traffic and no pacing delay.
    pub async fn run(
        &self,
        documents: Vec<Document>,
        labels: &CandidateLabelSet,
    ) -> RunReport {
        self.notifier.run_started(documents.len());

        if labels.is_empty() {
            warn!("Candidate label set is empty, nothing to classify");
            let summary = RunSummary::default();
            self.notifier.run_finished(&summary);
            return RunReport::default();
        }

        info!(
            "Classifying {} document(s) into {} categories, {} at a time",
            documents.len(),
            labels.len(),
            self.concurrency
        );

        let window_count = documents.len().div_ceil(self.concurrency);
        let mut outcomes = Vec::with_capacity(documents.len());

        for (index, window) in documents.chunks(self.concurrency).enumerate() {
            debug!(
                "Processing window {}/{} ({} document(s))",
                index + 1,
                window_count,
                window.len()
            );

            let results = future::join_all(
                window
                    .iter()
                    .map(|document| self.process_document(document, labels)),
            )
            .await;

            outcomes.extend(
                window
                    .iter()
                    .cloned()
                    .zip(results)
                    .map(|(document, outcome)| DocumentOutcome { document, outcome }),
            );

            if index + 1 < window_count {
                tokio::time::sleep(self.window_pause).await;
            }
        }

        let summary = RunSummary::from_outcomes(outcomes.iter().map(|o| &o.outcome));
        info!("Run finished: {}", summary);
        self.notifier.run_finished(&summary);

        RunReport { outcomes, summary }
    }

    /// Read -> classify -> validate -> relocate, collapsing every failure
    /// into a terminal state so siblings in the window are never disturbed.
    async fn process_document(
        &self,
        document: &Document,
        labels: &CandidateLabelSet,
    ) -> Outcome {
        let identifier = document.identifier();

        let content = match self.store.read_content(document).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read '{}': {}", identifier, e);
                return Outcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        if content.trim().is_empty() {
            debug!("Skipping '{}': empty content", identifier);
            return Outcome::Skipped {
                reason: SkipReason::EmptyContent,
            };
        }

        let raw = match self.classifier.classify(&content, labels).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Classification failed for '{}': {}", identifier, e);
                return Outcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let Some(raw) = raw else {
            debug!("Skipping '{}': classifier returned no label", identifier);
            return Outcome::Skipped {
                reason: SkipReason::NoLabelReturned,
            };
        };

        let Some(label) = labels.validate(Some(&raw), self.match_policy) else {
            debug!(
                "Skipping '{}': label '{}' not in candidate set",
                identifier,
                raw.trim()
            );
            return Outcome::Skipped {
                reason: SkipReason::LabelNotInSet {
                    label: raw.trim().to_string(),
                },
            };
        };
        let label = label.to_string();

        match relocate(self.store.as_ref(), document, &label).await {
            Ok(destination) => {
                debug!("Moved '{}' -> '{}'", identifier, destination);
                Outcome::Moved { destination }
            }
            Err(e) => {
                warn!("Failed to move '{}' into '{}': {}", identifier, label, e);
                Outcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
