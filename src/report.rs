//! Batch report data model.
//!
//! A failed locator is a first-class value in the report rather than a log
//! side effect, so failure handling is testable.

use serde::Serialize;

/// Which processing stage failed for a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network or HTTP error fetching the resource.
    Fetch,
    /// Payload was not a valid gzip stream.
    Decompress,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Fetch => "fetch_error",
            FailureKind::Decompress => "decompress_error",
        }
    }
}

/// Terminal state of one locator: measured, or failed at some stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    Measured { value: i64 },
    Failed { kind: FailureKind, message: String },
}

/// One processed locator and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceReport {
    pub locator: String,
    pub outcome: Outcome,
}

impl ResourceReport {
    pub fn measured(locator: impl Into<String>, value: i64) -> Self {
        Self {
            locator: locator.into(),
            outcome: Outcome::Measured { value },
        }
    }

    pub fn failed(locator: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            outcome: Outcome::Failed {
                kind,
                message: message.into(),
            },
        }
    }

    /// Last path segment of the locator, for display.
    pub fn short_name(&self) -> &str {
        self.locator
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.locator)
    }

    pub fn value(&self) -> Option<i64> {
        match &self.outcome {
            Outcome::Measured { value } => Some(*value),
            Outcome::Failed { .. } => None,
        }
    }
}

/// Ordered per-locator outcomes plus the running total over successes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub entries: Vec<ResourceReport>,
    pub total: i64,
    pub expected: Option<i64>,
}

impl BatchReport {
    pub fn new(expected: Option<i64>) -> Self {
        Self {
            entries: Vec::new(),
            total: 0,
            expected,
        }
    }

    /// Appends an entry, folding measured values into the total. Failed
    /// entries contribute zero but stay distinguishable from zero-valued
    /// successes.
    pub fn push(&mut self, entry: ResourceReport) {
        if let Outcome::Measured { value } = entry.outcome {
            self.total += value;
        }
        self.entries.push(entry);
    }

    pub fn measured_count(&self) -> usize {
        self.entries.iter().filter(|e| e.value().is_some()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.measured_count()
    }

    /// `None` when no expected value was supplied.
    pub fn matches_expected(&self) -> Option<bool> {
        self.expected.map(|e| e == self.total)
    }
}
