//! Property-based tests for expiry classification and report ordering.
//!
//! Tests validate:
//! - Ignore-tagged secrets produce no messages
//! - The 31-day window splits healthy, warning and critical secrets
//! - The informational note is attached except in the critical branch
//! - At most two messages per secret
//! - The report sort is stable by severity

use chrono::{DateTime, TimeDelta, Utc};
use keyvault_checker::classifier::{ONE_MONTH_MS, add_one_year, format_timestamp};
use keyvault_checker::{ClassifiedMessage, Report, Severity, Verdict, classify};
use keyvault_client::SecretRecord;
use proptest::prelude::*;
use std::collections::BTreeSet;
use test_utils::{instant_strategy, offset_strategy, secret_name_strategy, secret_record_strategy};

fn window() -> TimeDelta {
    TimeDelta::milliseconds(ONE_MONTH_MS)
}

fn no_ignores() -> BTreeSet<String> {
    BTreeSet::new()
}

fn severities(messages: &[ClassifiedMessage]) -> Vec<Severity> {
    messages.iter().map(|m| m.severity).collect()
}

fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Critical),
        Just(Severity::Warning),
        Just(Severity::Info),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any secret carrying an ignored tag key is skipped, whatever its dates.
    #[test]
    fn prop_ignored_secrets_emit_nothing(
        record in secret_record_strategy(),
        now in instant_strategy(),
        extra in "[a-z]{3,8}",
    ) {
        let record = record.with_tag(extra.clone(), "x");
        let ignore: BTreeSet<String> = [extra].into();

        prop_assert_eq!(classify(&record, now, &ignore).unwrap(), Verdict::Skipped);
    }

    /// Explicit expiry beyond the window: no severity message.
    #[test]
    fn prop_healthy_explicit_expiry_is_silent(
        name in secret_name_strategy(),
        now in instant_strategy(),
        extra_ms in 1i64..(365 * 86_400_000),
    ) {
        let expires = now + window() + TimeDelta::milliseconds(extra_ms);
        let record = SecretRecord::new(name, Some(now), Some(expires));

        let messages = classify(&record, now, &no_ignores()).unwrap().into_messages();
        prop_assert!(messages.is_empty());
    }

    /// Explicit expiry inside [now, now + 31 days]: exactly one warning with the literal date.
    #[test]
    fn prop_expiry_in_window_warns(
        name in secret_name_strategy(),
        now in instant_strategy(),
        ahead_ms in 0i64..=ONE_MONTH_MS,
    ) {
        let expires = now + TimeDelta::milliseconds(ahead_ms);
        let record = SecretRecord::new(name.clone(), Some(now), Some(expires));

        let messages = classify(&record, now, &no_ignores()).unwrap().into_messages();
        prop_assert_eq!(severities(&messages), vec![Severity::Warning]);
        prop_assert!(messages[0].text.contains("expires in less than 30 days"));
        prop_assert!(messages[0].text.contains(&format_timestamp(&expires)));
        prop_assert!(messages[0].text.starts_with(&name));
    }

    /// Explicit expiry in the past: exactly one critical.
    #[test]
    fn prop_expired_is_critical(
        name in secret_name_strategy(),
        now in instant_strategy(),
        behind_ms in 1i64..(730 * 86_400_000),
    ) {
        let expires = now - TimeDelta::milliseconds(behind_ms);
        let record = SecretRecord::new(name.clone(), Some(expires - TimeDelta::days(1)), Some(expires));

        let messages = classify(&record, now, &no_ignores()).unwrap().into_messages();
        prop_assert_eq!(severities(&messages), vec![Severity::Critical]);
        prop_assert_eq!(
            &messages[0].text,
            &format!("{name} expired at {}", format_timestamp(&expires))
        );
    }

    /// Missing expiry: info note plus the branch message, but critical stands alone.
    #[test]
    fn prop_missing_expiry_attaches_note_except_when_expired(
        name in secret_name_strategy(),
        now in instant_strategy(),
        offset in offset_strategy(),
    ) {
        let created = now + offset;
        let assumed: DateTime<Utc> = add_one_year(created);
        let record = SecretRecord::new(name, Some(created), None);

        let messages = classify(&record, now, &no_ignores()).unwrap().into_messages();
        let got = severities(&messages);

        if assumed - window() > now {
            prop_assert_eq!(got, vec![Severity::Info]);
        } else if assumed < now {
            prop_assert_eq!(got, vec![Severity::Critical]);
        } else {
            prop_assert_eq!(got, vec![Severity::Warning, Severity::Info]);
        }
    }

    /// Never more than two messages, and at most one actionable one.
    #[test]
    fn prop_at_most_two_messages(
        record in secret_record_strategy(),
        now in instant_strategy(),
    ) {
        let messages = classify(&record, now, &no_ignores()).unwrap().into_messages();
        prop_assert!(messages.len() <= 2);
        prop_assert!(messages.iter().filter(|m| m.severity.is_actionable()).count() <= 1);
    }

    /// The report is sorted by severity and equal severities keep arrival order.
    #[test]
    fn prop_report_sort_is_stable(
        severities_in in prop::collection::vec(severity_strategy(), 0..30),
    ) {
        let messages: Vec<ClassifiedMessage> = severities_in
            .iter()
            .enumerate()
            .map(|(i, s)| ClassifiedMessage { severity: *s, text: i.to_string() })
            .collect();

        let report = Report::new(messages);
        let sorted = report.messages();

        for pair in sorted.windows(2) {
            prop_assert!(pair[0].severity <= pair[1].severity);
            if pair[0].severity == pair[1].severity {
                let a: usize = pair[0].text.parse().unwrap();
                let b: usize = pair[1].text.parse().unwrap();
                prop_assert!(a < b);
            }
        }

        let expected_actionable = severities_in.iter().any(|s| s.value() < 3);
        prop_assert_eq!(report.has_actionable(), expected_actionable);
    }
}

#[test]
fn test_documented_sort_example() {
    let input = [
        Severity::Warning,
        Severity::Critical,
        Severity::Info,
        Severity::Critical,
    ];
    let report: Report = input
        .iter()
        .enumerate()
        .map(|(i, s)| ClassifiedMessage {
            severity: *s,
            text: format!("m{i}"),
        })
        .collect();

    let order: Vec<(u8, &str)> = report
        .messages()
        .iter()
        .map(|m| (m.severity.value(), m.text.as_str()))
        .collect();
    assert_eq!(order, vec![(0, "m1"), (0, "m3"), (1, "m0"), (3, "m2")]);
}
