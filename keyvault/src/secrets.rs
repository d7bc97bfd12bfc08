//! Key Vault data-plane and token endpoint wire types.

use crate::error::{KeyVaultError, KeyVaultResult};
use crate::provider::SecretRecord;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// One page of `GET /secrets`.
#[derive(Debug, Deserialize)]
pub struct SecretListResponse {
    /// Secrets on this page
    #[serde(default)]
    pub value: Vec<SecretItem>,
    /// Absolute URL of the next page, absent or null on the last one
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

/// Secret entry in a listing page. Only the identifier is used; properties
/// are fetched per secret.
#[derive(Debug, Deserialize)]
pub struct SecretItem {
    /// Secret identifier URL
    pub id: String,
}

/// `GET /secrets/{name}` response. The `value` field is not mapped.
#[derive(Debug, Deserialize)]
pub struct SecretBundle {
    /// Secret identifier URL, including the version
    pub id: String,
    /// Management attributes
    #[serde(default)]
    pub attributes: SecretAttributes,
    /// User tags; the service sends `null` when there are none
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
}

/// Secret management attributes; timestamps are Unix seconds.
#[derive(Debug, Default, Deserialize)]
pub struct SecretAttributes {
    /// Creation time
    #[serde(default)]
    pub created: Option<i64>,
    /// Expiry time
    #[serde(default)]
    pub exp: Option<i64>,
}

/// OAuth2 token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

const fn default_expires_in() -> u64 {
    3600
}

/// Secret name from an identifier such as
/// `https://kv.vault.azure.net/secrets/db-pass/0123abcd`.
#[must_use]
pub fn name_from_id(id: &str) -> Option<&str> {
    let mut segments = id.split('/').skip_while(|segment| *segment != "secrets");
    segments.next()?;
    segments.next().filter(|name| !name.is_empty())
}

fn timestamp(field: &str, secs: i64) -> KeyVaultResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| KeyVaultError::malformed(format!("{field} out of range: {secs}")))
}

impl TryFrom<SecretBundle> for SecretRecord {
    type Error = KeyVaultError;

    fn try_from(bundle: SecretBundle) -> KeyVaultResult<Self> {
        let name = name_from_id(&bundle.id)
            .ok_or_else(|| KeyVaultError::malformed(format!("no secret name in id {}", bundle.id)))?
            .to_string();

        let created_on = bundle
            .attributes
            .created
            .map(|secs| timestamp("created", secs))
            .transpose()?;
        let expires_on = bundle
            .attributes
            .exp
            .map(|secs| timestamp("exp", secs))
            .transpose()?;

        Ok(Self {
            name,
            tags: bundle.tags.unwrap_or_default(),
            created_on,
            expires_on,
        })
    }
}
