pub mod outcome;
pub mod relocate;
pub mod scheduler;

#[cfg(test)]
mod scheduler_tests;

pub use outcome::{Outcome, RunSummary, SkipReason};
pub use relocate::relocate;
pub use scheduler::{DocumentOutcome, RunReport, SortEngine};
