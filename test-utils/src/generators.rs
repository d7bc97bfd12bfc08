//! Shared proptest generators.

use chrono::{DateTime, TimeDelta, Utc};
use keyvault_client::SecretRecord;
use proptest::prelude::*;
use std::collections::HashMap;

/// 2020-01-01T00:00:00Z
const RANGE_START: i64 = 1_577_836_800;
/// 2030-01-01T00:00:00Z
const RANGE_END: i64 = 1_893_456_000;

/// Valid Key Vault secret names.
pub fn secret_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9-]{0,30}"
}

/// Tag keys, drawn from a small pool so collisions with ignore sets happen.
pub fn tag_key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ignore".to_string()),
        Just("owner".to_string()),
        Just("env".to_string()),
        Just("rotated-externally".to_string()),
        "[a-z]{3,10}",
    ]
}

/// Tag maps with up to four entries.
pub fn tags_strategy() -> impl Strategy<Value = HashMap<String, String>> {
    prop::collection::hash_map(tag_key_strategy(), "[a-z0-9]{0,8}", 0..4)
}

/// Instants between 2020 and 2030, second precision.
pub fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (RANGE_START..RANGE_END).prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap_or_default())
}

/// Offsets around a reference instant: from two years before to two years after.
pub fn offset_strategy() -> impl Strategy<Value = TimeDelta> {
    (-730i64 * 86_400..730 * 86_400).prop_map(TimeDelta::seconds)
}

/// Records with a creation date and an optional explicit expiry.
pub fn secret_record_strategy() -> impl Strategy<Value = SecretRecord> {
    (
        secret_name_strategy(),
        tags_strategy(),
        instant_strategy(),
        proptest::option::of(instant_strategy()),
    )
        .prop_map(|(name, tags, created_on, expires_on)| SecretRecord {
            name,
            tags,
            created_on: Some(created_on),
            expires_on,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_records_are_well_formed(record in secret_record_strategy()) {
            prop_assert!(!record.name.is_empty());
            prop_assert!(record.created_on.is_some());
            prop_assert!(record.tags.len() < 4);
        }
    }
}
