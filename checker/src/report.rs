//! Aggregated, severity-ordered report.

use crate::classifier::{ClassifiedMessage, Severity};

/// Messages of one run, most urgent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    messages: Vec<ClassifiedMessage>,
}

impl Report {
    /// Build a report; the sort is stable so arrival order is kept within a severity.
    #[must_use]
    pub fn new(mut messages: Vec<ClassifiedMessage>) -> Self {
        messages.sort_by_key(|m| m.severity);
        Self { messages }
    }

    /// Sorted messages.
    #[must_use]
    pub fn messages(&self) -> &[ClassifiedMessage] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the report has no messages at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether any message is more urgent than informational.
    #[must_use]
    pub fn has_actionable(&self) -> bool {
        self.messages.iter().any(|m| m.severity.is_actionable())
    }

    /// Count of messages with `severity`.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.messages.iter().filter(|m| m.severity == severity).count()
    }

    /// Rendered lines in report order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.messages.iter().map(ToString::to_string)
    }

    /// Rendered lines joined with newlines.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }
}

impl FromIterator<ClassifiedMessage> for Report {
    fn from_iter<I: IntoIterator<Item = ClassifiedMessage>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
