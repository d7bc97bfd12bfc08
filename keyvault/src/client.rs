//! Key Vault HTTP client with cached bearer token and logging integration.

use crate::{
    config::{KEYVAULT_SCOPE, KeyVaultConfig},
    credentials::ServicePrincipal,
    error::{KeyVaultError, KeyVaultResult},
    provider::{SecretPage, SecretRecord, SecretSource},
    secrets::{SecretBundle, SecretListResponse, TokenResponse, name_from_id},
};
use async_trait::async_trait;
use checker_common::build_http_client;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Tokens closer than this to expiry are refreshed before use.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on the lifetime trusted from a token response.
const MAX_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Read-only Key Vault client.
pub struct KeyVaultClient {
    config: KeyVaultConfig,
    http: Client,
    credentials: Option<ServicePrincipal>,
    token: RwLock<Option<AccessToken>>,
}

impl KeyVaultClient {
    /// Create a new client. Without credentials every call fails with
    /// [`KeyVaultError::MissingCredentials`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: KeyVaultConfig, credentials: Option<ServicePrincipal>) -> KeyVaultResult<Self> {
        let http = build_http_client(&config.http)?;

        Ok(Self {
            config,
            http,
            credentials,
            token: RwLock::new(None),
        })
    }

    /// Acquire a token with the client-credentials grant.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::MissingCredentials`] without a service
    /// principal, or an authentication error when the token endpoint refuses.
    #[instrument(skip(self), fields(vault = %self.config.vault_url))]
    pub async fn authenticate(&self) -> KeyVaultResult<()> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            KeyVaultError::MissingCredentials(
                "AZURE_CLIENT_ID, AZURE_CLIENT_SECRET and AZURE_TENANT_ID must be set".to_string(),
            )
        })?;

        let url = self.config.token_url(&credentials.tenant_id);
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.expose_secret()),
            ("scope", KEYVAULT_SCOPE),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| KeyVaultError::unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(KeyVaultError::auth_failed(format!("Status {status}: {text}")));
        }

        let token: TokenResponse = response.json().await?;
        let ttl = Duration::from_secs(token.expires_in).min(MAX_TOKEN_TTL);

        *self.token.write().await = Some(AccessToken {
            value: token.access_token,
            expires_at: Instant::now().checked_add(ttl).unwrap_or_else(Instant::now),
        });

        info!(ttl_secs = ttl.as_secs(), "Authenticated with Key Vault");
        Ok(())
    }

    async fn get_token(&self) -> KeyVaultResult<String> {
        let needs_auth = self.token.read().await.as_ref().is_none_or(|token| {
            token.expires_at.saturating_duration_since(Instant::now()) < TOKEN_REFRESH_MARGIN
        });

        if needs_auth {
            self.authenticate().await?;
        }

        self.token
            .read()
            .await
            .as_ref()
            .map(|token| token.value.clone())
            .ok_or_else(|| KeyVaultError::auth_failed("No token available"))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, subject: &str) -> KeyVaultResult<T> {
        let token = self.get_token().await?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| KeyVaultError::unavailable(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                let text = response.text().await.unwrap_or_default();
                return Err(KeyVaultError::auth_failed(format!("Status {status}: {text}")));
            }
            StatusCode::FORBIDDEN => return Err(KeyVaultError::PermissionDenied(subject.to_string())),
            StatusCode::NOT_FOUND => return Err(KeyVaultError::not_found(subject)),
            _ if !status.is_success() => {
                let text = response.text().await.unwrap_or_default();
                return Err(KeyVaultError::unavailable(format!("Status {status}: {text}")));
            }
            _ => {}
        }

        response.json().await.map_err(KeyVaultError::from)
    }

    /// Reject continuation links that leave the vault host, the bearer token
    /// is attached to every request.
    fn checked_next_link(&self, link: &str) -> KeyVaultResult<String> {
        let parsed = Url::parse(link)
            .map_err(|e| KeyVaultError::malformed(format!("invalid nextLink {link:?}: {e}")))?;
        let vault = &self.config.vault_url;
        if parsed.scheme() != vault.scheme()
            || parsed.host_str() != vault.host_str()
            || parsed.port_or_known_default() != vault.port_or_known_default()
        {
            warn!(next_link = link, "nextLink points outside the vault");
            return Err(KeyVaultError::malformed(format!(
                "nextLink {link} does not belong to {vault}"
            )));
        }
        Ok(parsed.into())
    }
}

#[async_trait]
impl SecretSource for KeyVaultClient {
    type Error = KeyVaultError;

    #[instrument(skip(self))]
    async fn list_page(&self, cursor: Option<&str>) -> KeyVaultResult<SecretPage> {
        let url = match cursor {
            Some(link) => self.checked_next_link(link)?,
            None => self.config.list_url(),
        };

        let page: SecretListResponse = self.get_json(&url, "secrets").await?;

        let names = page
            .value
            .iter()
            .map(|item| {
                name_from_id(&item.id)
                    .map(String::from)
                    .ok_or_else(|| KeyVaultError::malformed(format!("no secret name in id {}", item.id)))
            })
            .collect::<KeyVaultResult<Vec<_>>>()?;

        debug!(count = names.len(), more = page.next_link.is_some(), "Listed secrets page");

        Ok(SecretPage {
            names,
            next: page.next_link.filter(|link| !link.is_empty()),
        })
    }

    #[instrument(skip(self))]
    async fn get_secret(&self, name: &str) -> KeyVaultResult<SecretRecord> {
        debug!(name, "Getting secret properties");

        let bundle: SecretBundle = self.get_json(&self.config.secret_url(name), name).await?;
        SecretRecord::try_from(bundle)
    }
}
