//! Secret source abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Properties of one secret, as needed for expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRecord {
    /// Secret name
    pub name: String,
    /// Tags attached to the secret
    pub tags: HashMap<String, String>,
    /// Creation time
    pub created_on: Option<DateTime<Utc>>,
    /// Expiry time, if one is set
    pub expires_on: Option<DateTime<Utc>>,
}

impl SecretRecord {
    /// Create a record without tags.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        created_on: Option<DateTime<Utc>>,
        expires_on: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: name.into(),
            tags: HashMap::new(),
            created_on,
            expires_on,
        }
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// One page of secret names from a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretPage {
    /// Secret names in listing order
    pub names: Vec<String>,
    /// Cursor for the next page, `None` on the last page
    pub next: Option<String>,
}

/// Paginated, read-only access to secret properties.
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Error returned by the source.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one listing page; `cursor` is `None` for the first page.
    async fn list_page(&self, cursor: Option<&str>) -> Result<SecretPage, Self::Error>;

    /// Fetch the full properties of secret `name`.
    async fn get_secret(&self, name: &str) -> Result<SecretRecord, Self::Error>;
}
