use crate::ai::{ClassifierClient, Provider};
use crate::config::{LabelSource, RunConfig};
use crate::core::outcome::{Outcome, RunSummary, SkipReason};
use crate::core::scheduler::SortEngine;
use crate::error::{Result, SortError};
use crate::labels::CandidateLabelSet;
use crate::services::{Notifier, SilentNotifier};
use crate::store::{DocumentStore, MemoryStore};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Classifier double with a fixed content -> label script plus counters for
/// call volume and the in-flight high-water mark.
#[derive(Default)]
struct ScriptedClassifier {
    labels_by_content: HashMap<String, String>,
    failing_contents: HashSet<String>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedClassifier {
    fn new(script: &[(&str, &str)]) -> Self {
        Self {
            labels_by_content: script
                .iter()
                .map(|(content, label)| (content.to_string(), label.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    fn failing_on(mut self, content: &str) -> Self {
        self.failing_contents.insert(content.to_string());
        self
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn high_water(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassifierClient for ScriptedClassifier {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn classify(
        &self,
        content: &str,
        _labels: &CandidateLabelSet,
    ) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        // Hold the slot briefly so window siblings overlap
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_contents.contains(content) {
            return Err(SortError::Transport { status: 500 });
        }
        Ok(self.labels_by_content.get(content).cloned())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl Notifier for RecordingNotifier {
    fn run_started(&self, _total_documents: usize) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn run_finished(&self, _summary: &RunSummary) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn engine_with(
    store: Arc<MemoryStore>,
    classifier: Arc<ScriptedClassifier>,
    concurrency: usize,
    window_pause_ms: u64,
) -> SortEngine {
    let config = RunConfig {
        concurrency,
        window_pause_ms,
        ..Default::default()
    };
    SortEngine::new(store, classifier, Arc::new(SilentNotifier), &config)
}

fn work_personal() -> CandidateLabelSet {
    CandidateLabelSet::new(["Work", "Personal"])
}

#[tokio::test]
async fn test_three_documents_two_windows_moves_two_skips_one() {
    init_tracing();

    let store = Arc::new(MemoryStore::new());
    store.insert_document("", "a.md", "alpha");
    store.insert_document("", "b.md", "beta");
    store.insert_document("", "c.md", "gamma");

    let classifier = Arc::new(ScriptedClassifier::new(&[
        ("alpha", "Work"),
        ("beta", "Unknown"),
        ("gamma", "Personal"),
    ]));

    let engine = engine_with(store.clone(), classifier.clone(), 2, 200);
    let documents = store.list_documents("").await.unwrap();

    let started = Instant::now();
    let report = engine.run(documents, &work_personal()).await;
    let elapsed = started.elapsed();

    assert_eq!(report.summary.moved, 2);
    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.summary.failed, 0);

    assert!(store.contains("Work/a.md"));
    assert!(store.contains("Personal/c.md"));
    // The unknown-label document stays where it was
    assert_eq!(store.location_of("b.md").unwrap(), "");

    // Two windows (2 + 1 documents) means exactly one pacing delay
    assert!(elapsed >= Duration::from_millis(200));
    assert_eq!(classifier.call_count(), 3);
}

#[tokio::test]
async fn test_empty_content_is_skipped_without_a_network_call() {
    let store = Arc::new(MemoryStore::new());
    store.insert_document("", "blank.md", "   \n\t  ");

    let classifier = Arc::new(ScriptedClassifier::default());
    let engine = engine_with(store.clone(), classifier.clone(), 2, 0);
    let documents = store.list_documents("").await.unwrap();

    let report = engine.run(documents, &work_personal()).await;

    assert_eq!(report.summary.skipped, 1);
    assert_eq!(classifier.call_count(), 0);
    assert!(matches!(
        report.outcomes[0].outcome,
        Outcome::Skipped {
            reason: SkipReason::EmptyContent
        }
    ));
}

#[tokio::test]
async fn test_in_flight_calls_never_exceed_concurrency() {
    let store = Arc::new(MemoryStore::new());
    let mut script = Vec::new();
    for i in 0..6 {
        let content = format!("content-{}", i);
        store.insert_document("", format!("doc-{}.md", i), content.clone());
        script.push((content, "Work".to_string()));
    }

    let classifier = Arc::new(ScriptedClassifier {
        labels_by_content: script.into_iter().collect(),
        ..Default::default()
    });

    let engine = engine_with(store.clone(), classifier.clone(), 2, 0);
    let documents = store.list_documents("").await.unwrap();
    let report = engine.run(documents, &work_personal()).await;

    assert_eq!(report.summary.moved, 6);
    assert_eq!(classifier.call_count(), 6);
    assert!(classifier.high_water() <= 2);
    // Windows do overlap their own members
    assert_eq!(classifier.high_water(), 2);
}

#[tokio::test]
async fn test_empty_document_set_reports_zero_work_without_pausing() {
    let store = Arc::new(MemoryStore::new());
    let classifier = Arc::new(ScriptedClassifier::default());
    let engine = engine_with(store, classifier.clone(), 2, 1000);

    let started = Instant::now();
    let report = engine.run(Vec::new(), &work_personal()).await;

    assert_eq!(report.summary.total(), 0);
    assert!(report.outcomes.is_empty());
    assert_eq!(classifier.call_count(), 0);
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_empty_label_set_reports_zero_work_without_classifying() {
    let store = Arc::new(MemoryStore::new());
    store.insert_document("", "a.md", "alpha");

    let classifier = Arc::new(ScriptedClassifier::new(&[("alpha", "Work")]));
    let engine = engine_with(store.clone(), classifier.clone(), 2, 0);
    let documents = store.list_documents("").await.unwrap();

    let report = engine.run(documents, &CandidateLabelSet::default()).await;

    assert_eq!(report.summary.total(), 0);
    assert_eq!(classifier.call_count(), 0);
    assert_eq!(store.location_of("a.md").unwrap(), "");
}

#[tokio::test]
async fn test_failed_document_never_cancels_window_siblings() {
    let store = Arc::new(MemoryStore::new());
    store.insert_document("", "good.md", "alpha");
    store.insert_document("", "bad.md", "boom");

    let classifier =
        Arc::new(ScriptedClassifier::new(&[("alpha", "Work")]).failing_on("boom"));
    let engine = engine_with(store.clone(), classifier, 2, 0);
    let documents = store.list_documents("").await.unwrap();

    let report = engine.run(documents, &work_personal()).await;

    assert_eq!(report.summary.moved, 1);
    assert_eq!(report.summary.failed, 1);
    assert!(store.contains("Work/good.md"));
    assert_eq!(store.location_of("bad.md").unwrap(), "");
}

#[tokio::test]
async fn test_move_collision_counts_as_failed() {
    let store = Arc::new(MemoryStore::new());
    store.insert_document("", "note.md", "alpha");
    store.insert_document("Work", "note.md", "already here");

    let classifier = Arc::new(ScriptedClassifier::new(&[("alpha", "Work")]));
    let engine = engine_with(store.clone(), classifier, 2, 0);
    let documents = store.list_documents("").await.unwrap();

    let report = engine.run(documents, &work_personal()).await;

    assert_eq!(report.summary.failed, 1);
    assert_eq!(store.location_of("note.md").unwrap(), "");
}

#[tokio::test]
async fn test_case_variant_label_is_skipped_under_exact_policy() {
    let store = Arc::new(MemoryStore::new());
    store.insert_document("", "a.md", "alpha");

    let classifier = Arc::new(ScriptedClassifier::new(&[("alpha", "work")]));
    let engine = engine_with(store.clone(), classifier, 1, 0);
    let documents = store.list_documents("").await.unwrap();

    let report = engine.run(documents, &work_personal()).await;

    assert_eq!(report.summary.moved, 0);
    assert_eq!(report.summary.skipped, 1);
    assert!(matches!(
        &report.outcomes[0].outcome,
        Outcome::Skipped {
            reason: SkipReason::LabelNotInSet { label }
        } if label == "work"
    ));
}

#[tokio::test]
async fn test_notifier_sees_exactly_one_start_and_one_end() {
    let store = Arc::new(MemoryStore::new());
    store.insert_document("", "a.md", "alpha");
    store.insert_document("", "b.md", "beta");

    let classifier = Arc::new(ScriptedClassifier::new(&[
        ("alpha", "Work"),
        ("beta", "Personal"),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());

    let config = RunConfig {
        concurrency: 1,
        window_pause_ms: 0,
        ..Default::default()
    };
    let engine = SortEngine::new(store.clone(), classifier, notifier.clone(), &config);
    let documents = store.list_documents("").await.unwrap();
    engine.run(documents, &work_personal()).await;

    assert_eq!(notifier.started.load(Ordering::SeqCst), 1);
    assert_eq!(notifier.finished.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_run_fails_fast_on_missing_credential() {
    let store = Arc::new(MemoryStore::new());
    store.insert_document("", "a.md", "alpha");

    // No credential configured for the selected provider
    let config = RunConfig {
        label_source: LabelSource::Explicit(vec!["Work".into(), "Personal".into()]),
        ..Default::default()
    };

    let err = crate::run(&config, store.clone(), Arc::new(SilentNotifier))
        .await
        .unwrap_err();

    assert!(matches!(err, SortError::MissingCredential { .. }));
    // Nothing was touched
    assert_eq!(store.location_of("a.md").unwrap(), "");
}

#[tokio::test]
async fn test_run_with_auto_detected_empty_label_set_is_zero_work() {
    // No top-level containers exist, so auto-detection yields nothing;
    // the engine returns before any classification is attempted.
    let store = Arc::new(MemoryStore::new());
    store.insert_document("", "a.md", "alpha");

    let config = RunConfig {
        openai_api_key: "sk-test".to_string(),
        label_source: LabelSource::AutoDetect,
        ..Default::default()
    };

    let report = crate::run(&config, store.clone(), Arc::new(SilentNotifier))
        .await
        .unwrap();

    assert_eq!(report.summary.total(), 0);
    assert_eq!(store.location_of("a.md").unwrap(), "");
}

#[tokio::test]
async fn test_run_rejects_invalid_configuration() {
    let store = Arc::new(MemoryStore::new());
    let config = RunConfig {
        concurrency: 0,
        openai_api_key: "sk-test".to_string(),
        ..Default::default()
    };

    let err = crate::run(&config, store, Arc::new(SilentNotifier))
        .await
        .unwrap_err();
    assert!(matches!(err, SortError::Config { .. }));
}
