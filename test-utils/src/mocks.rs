//! Mock implementations for testing.

use async_trait::async_trait;
use keyvault_client::{SecretPage, SecretRecord, SecretSource};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Failure injected by [`InMemorySecretSource`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockSourceError {
    /// Listing failed
    #[error("listing failed: {0}")]
    List(String),
    /// Fetching a secret failed
    #[error("fetch of {0} failed")]
    Fetch(String),
    /// Cursor not produced by this source
    #[error("unknown cursor {0}")]
    BadCursor(String),
}

/// Paginated in-memory secret source that records every call.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretSource {
    records: Vec<SecretRecord>,
    page_size: usize,
    fail_listing: Option<String>,
    fail_fetch: Option<String>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl InMemorySecretSource {
    /// Source serving `records` in order, two per page.
    #[must_use]
    pub fn new(records: Vec<SecretRecord>) -> Self {
        Self {
            records,
            page_size: 2,
            ..Self::default()
        }
    }

    /// Change the page size (minimum 1).
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make every listing call fail with `message`.
    #[must_use]
    pub fn failing_listing(mut self, message: impl Into<String>) -> Self {
        self.fail_listing = Some(message.into());
        self
    }

    /// Make fetching secret `name` fail.
    #[must_use]
    pub fn failing_fetch(mut self, name: impl Into<String>) -> Self {
        self.fail_fetch = Some(name.into());
        self
    }

    /// Calls seen so far, as `list:<offset>` and `get:<name>`.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl SecretSource for InMemorySecretSource {
    type Error = MockSourceError;

    async fn list_page(&self, cursor: Option<&str>) -> Result<SecretPage, MockSourceError> {
        let offset = match cursor {
            None => 0,
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| MockSourceError::BadCursor(c.to_string()))?,
        };
        self.calls.write().await.push(format!("list:{offset}"));

        if let Some(message) = &self.fail_listing {
            return Err(MockSourceError::List(message.clone()));
        }

        let end = (offset + self.page_size).min(self.records.len());
        let names = self
            .records
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        let next = (end < self.records.len()).then(|| end.to_string());

        Ok(SecretPage { names, next })
    }

    async fn get_secret(&self, name: &str) -> Result<SecretRecord, MockSourceError> {
        self.calls.write().await.push(format!("get:{name}"));

        if self.fail_fetch.as_deref() == Some(name) {
            return Err(MockSourceError::Fetch(name.to_string()));
        }

        self.records
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| MockSourceError::Fetch(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<SecretRecord> {
        (0..n)
            .map(|i| SecretRecord::new(format!("s{i}"), None, None))
            .collect()
    }

    #[tokio::test]
    async fn test_pagination() {
        let source = InMemorySecretSource::new(records(5)).with_page_size(2);

        let first = source.list_page(None).await.unwrap();
        assert_eq!(first.names, vec!["s0", "s1"]);
        assert_eq!(first.next.as_deref(), Some("2"));

        let last = source.list_page(Some("4")).await.unwrap();
        assert_eq!(last.names, vec!["s4"]);
        assert!(last.next.is_none());
    }

    #[tokio::test]
    async fn test_empty_source() {
        let page = InMemorySecretSource::new(Vec::new()).list_page(None).await.unwrap();
        assert!(page.names.is_empty());
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn test_failures_and_call_log() {
        let source = InMemorySecretSource::new(records(2)).failing_fetch("s1");

        assert!(source.get_secret("s0").await.is_ok());
        assert_eq!(
            source.get_secret("s1").await,
            Err(MockSourceError::Fetch("s1".into()))
        );
        assert!(matches!(
            source.list_page(Some("x")).await,
            Err(MockSourceError::BadCursor(_))
        ));
        assert_eq!(source.calls().await, vec!["get:s0", "get:s1"]);
    }
}
