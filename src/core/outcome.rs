use serde::Serialize;

/// Why a document was left in place without an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    EmptyContent,
    NoLabelReturned,
    LabelNotInSet { label: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "content is empty"),
            Self::NoLabelReturned => write!(f, "classifier returned no label"),
            Self::LabelNotInSet { label } => {
                write!(f, "label '{}' is not a known category", label)
            }
        }
    }
}

/// Terminal per-document state.
///
/// Skipped is distinct from Failed: a skip is an expected non-move (empty
/// content, unusable label), a failure is a transport or storage error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Moved { destination: String },
    Skipped { reason: SkipReason },
    Failed { reason: String },
}

/// Whole-run totals. Skipped documents are reported in their own bucket,
/// never folded into `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Pure fold over outcomes; result is independent of arrival order.
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a Outcome>,
    {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Moved { .. } => summary.moved += 1,
                Outcome::Skipped { .. } => summary.skipped += 1,
                Outcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.moved + self.skipped + self.failed
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} moved, {} skipped, {} failed",
            self.moved, self.skipped, self.failed
        )
    }
}
