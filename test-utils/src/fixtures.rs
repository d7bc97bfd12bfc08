//! Test fixtures with sample secrets.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use keyvault_client::SecretRecord;

/// Reference instant used by the scenario fixtures: 2024-06-01T00:00:00Z.
#[must_use]
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Created 2023-01-01, no expiry: the assumed expiry 2024-01-01 is in the past.
#[must_use]
pub fn db_pass() -> SecretRecord {
    SecretRecord::new(
        "db-pass",
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).single(),
        None,
    )
}

/// Expires ten days after `now`.
#[must_use]
pub fn api_key(now: DateTime<Utc>) -> SecretRecord {
    SecretRecord::new(
        "api-key",
        Some(now - TimeDelta::days(200)),
        Some(now + TimeDelta::days(10)),
    )
}

/// Long expired but tagged `ignore`.
#[must_use]
pub fn legacy_token() -> SecretRecord {
    SecretRecord::new(
        "legacy-token",
        Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).single(),
        Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).single(),
    )
    .with_tag("ignore", "true")
}

/// Expires a year after `now`.
#[must_use]
pub fn healthy_cert(now: DateTime<Utc>) -> SecretRecord {
    SecretRecord::new(
        "tls-cert",
        Some(now - TimeDelta::days(30)),
        Some(now + TimeDelta::days(365)),
    )
    .with_tag("owner", "platform")
}

/// Created a month before `now`, no expiry: only an informational note.
#[must_use]
pub fn recent_without_expiry(now: DateTime<Utc>) -> SecretRecord {
    SecretRecord::new("storage-conn", Some(now - TimeDelta::days(30)), None)
}

/// All scenario secrets in listing order.
#[must_use]
pub fn scenario_vault(now: DateTime<Utc>) -> Vec<SecretRecord> {
    vec![
        healthy_cert(now),
        api_key(now),
        legacy_token(),
        recent_without_expiry(now),
        db_pass(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_now() {
        assert_eq!(reference_now().to_rfc3339(), "2024-06-01T00:00:00+00:00");
    }

    #[test]
    fn test_scenario_vault() {
        let now = reference_now();
        let vault = scenario_vault(now);
        assert_eq!(vault.len(), 5);
        assert!(db_pass().expires_on.is_none());
        assert!(legacy_token().tags.contains_key("ignore"));
        assert_eq!(api_key(now).expires_on, Some(now + TimeDelta::days(10)));
    }
}
