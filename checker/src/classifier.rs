//! Expiry classification of a single secret.
//!
//! A secret is either skipped (ignore-tag match), healthy, about to expire
//! within the fixed 31-day window, or already expired. Secrets without an
//! explicit expiry are assumed to expire one calendar year after creation
//! and get an informational note, except when that assumed date is already
//! in the past.

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use keyvault_client::SecretRecord;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Warning window: 31 days in milliseconds, not a calendar month.
pub const ONE_MONTH_MS: i64 = 31 * 24 * 60 * 60 * 1000;

/// Message urgency. The numeric values are part of the output contract;
/// 2 is intentionally unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    /// Already expired
    Critical = 0,
    /// Expires within the warning window
    Warning = 1,
    /// Informational, never actionable on its own
    Info = 3,
}

impl Severity {
    /// Raw severity value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Whether this severity warrants a notification.
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        (self as u8) < (Self::Info as u8)
    }

    /// Line prefix used in every sink.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "[CRIT]",
            Self::Warning => "[WARN]",
            Self::Info => "[INFO]",
        }
    }
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMessage {
    /// Urgency
    pub severity: Severity,
    /// Message text without the severity label
    pub text: String,
}

impl ClassifiedMessage {
    fn new(severity: Severity, text: String) -> Self {
        Self { severity, text }
    }
}

impl fmt::Display for ClassifiedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity.label(), self.text)
    }
}

/// Result of classifying one secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// An ignore tag matched; nothing is reported
    Skipped,
    /// Zero, one or two messages in emission order
    Classified(Vec<ClassifiedMessage>),
}

impl Verdict {
    /// Messages produced, empty when skipped.
    #[must_use]
    pub fn into_messages(self) -> Vec<ClassifiedMessage> {
        match self {
            Self::Skipped => Vec::new(),
            Self::Classified(messages) => messages,
        }
    }
}

/// A record with neither expiry nor creation time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("secret {name} has neither an expiry date nor a creation date")]
pub struct MissingCreationTime {
    /// Offending secret
    pub name: String,
}

/// Render a timestamp the way reports show it.
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// `at` with the year incremented by one. 29 February rolls over to 1 March.
#[must_use]
pub fn add_one_year(at: DateTime<Utc>) -> DateTime<Utc> {
    let next_year = at.year() + 1;
    at.with_year(next_year)
        .or_else(|| {
            at.with_day(28)
                .and_then(|d| d.with_year(next_year))
                .and_then(|d| d.checked_add_signed(TimeDelta::days(1)))
        })
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Classify `record` against `now`.
///
/// # Errors
///
/// Returns [`MissingCreationTime`] when the record has no expiry and no
/// creation time to derive one from.
pub fn classify(
    record: &SecretRecord,
    now: DateTime<Utc>,
    ignore_tags: &BTreeSet<String>,
) -> Result<Verdict, MissingCreationTime> {
    if record.tags.keys().any(|tag| ignore_tags.contains(tag)) {
        info!("Ignoring {}", record.name);
        return Ok(Verdict::Skipped);
    }

    let name = &record.name;
    let (expires_on, note) = match (record.expires_on, record.created_on) {
        (Some(expires_on), _) => (expires_on, None),
        (None, Some(created_on)) => (
            add_one_year(created_on),
            Some(ClassifiedMessage::new(
                Severity::Info,
                format!("{name} has no expiry date set, assuming createdDate + 1 year"),
            )),
        ),
        (None, None) => return Err(MissingCreationTime { name: name.clone() }),
    };

    let healthy = expires_on
        .checked_sub_signed(TimeDelta::milliseconds(ONE_MONTH_MS))
        .is_some_and(|window_start| window_start > now);

    let mut messages = Vec::with_capacity(2);
    if healthy {
        debug!(secret = %name, expires_on = %expires_on, "Secret is healthy");
        messages.extend(note);
    } else if expires_on < now {
        messages.push(ClassifiedMessage::new(
            Severity::Critical,
            format!("{name} expired at {}", format_timestamp(&expires_on)),
        ));
    } else {
        messages.push(ClassifiedMessage::new(
            Severity::Warning,
            format!(
                "{name} expires in less than 30 days ({})",
                format_timestamp(&expires_on)
            ),
        ));
        messages.extend(note);
    }

    Ok(Verdict::Classified(messages))
}
