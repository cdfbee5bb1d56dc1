use serde::{Deserialize, Serialize};

/// How a raw model answer is matched against the candidate set.
///
/// `Exact` is the reference policy; `IgnoreAsciiCase` tolerates the
/// capitalization drift models often produce and resolves to the canonical
/// spelling from the set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    #[default]
    Exact,
    IgnoreAsciiCase,
}

/// The closed, ordered set of legal classification outcomes for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLabelSet {
    labels: Vec<String>,
}

impl CandidateLabelSet {
    /// Builds a set from any string iterator, trimming entries, dropping
    /// empties and deduplicating while preserving first-seen order.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = Vec::new();
        for label in labels {
            let label = label.into();
            let trimmed = label.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !seen.iter().any(|existing: &String| existing == trimmed) {
                seen.push(trimmed.to_string());
            }
        }

        Self { labels: seen }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|candidate| candidate == label)
    }

    /// Normalizes a raw model answer against the set.
    ///
    /// Whitespace is trimmed first; `None`, empty and non-member answers all
    /// resolve to `None`. There is never partial or fuzzy matching. Under
    /// `IgnoreAsciiCase` the returned label is the set's canonical spelling,
    /// not the raw text.
    pub fn validate(&self, raw: Option<&str>, policy: MatchPolicy) -> Option<&str> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }

        match policy {
            MatchPolicy::Exact => self
                .labels
                .iter()
                .find(|candidate| candidate.as_str() == trimmed),
            MatchPolicy::IgnoreAsciiCase => self
                .labels
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(trimmed)),
        }
        .map(String::as_str)
    }
}
