//! Key Vault client configuration.

use crate::error::{KeyVaultError, KeyVaultResult};
use checker_common::HttpConfig;
use url::Url;

/// Public Azure cloud authority.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Data-plane API version used for all secret calls.
pub const DEFAULT_API_VERSION: &str = "7.4";

/// OAuth scope for the Key Vault data plane.
pub const KEYVAULT_SCOPE: &str = "https://vault.azure.net/.default";

/// Key Vault client configuration.
#[derive(Debug, Clone)]
pub struct KeyVaultConfig {
    /// Vault base URL, e.g. `https://my-vault.vault.azure.net`
    pub vault_url: Url,
    /// Entra ID authority host for token requests
    pub authority_host: Url,
    /// Data-plane API version
    pub api_version: String,
    /// Page size hint for secret listing
    pub max_results: u32,
    /// HTTP transport settings
    pub http: HttpConfig,
}

impl KeyVaultConfig {
    /// Configuration for the public-cloud vault named `vault_name`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::InvalidConfig`] unless the name follows the
    /// Azure naming rule: 3 to 24 ASCII letters, digits and hyphens, starting
    /// with a letter, not ending with a hyphen, no consecutive hyphens.
    pub fn for_vault(vault_name: &str) -> KeyVaultResult<Self> {
        let name = vault_name.trim();
        if !is_valid_vault_name(name) {
            return Err(KeyVaultError::InvalidConfig(format!(
                "invalid vault name: {vault_name:?}"
            )));
        }
        Self::with_vault_url(&format!("https://{name}.vault.azure.net"))
    }

    /// Configuration for an explicit vault URL.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::InvalidConfig`] if the URL does not parse.
    pub fn with_vault_url(vault_url: &str) -> KeyVaultResult<Self> {
        Ok(Self {
            vault_url: parse_url(vault_url)?,
            authority_host: parse_url(DEFAULT_AUTHORITY_HOST)?,
            api_version: DEFAULT_API_VERSION.to_string(),
            max_results: 25,
            http: HttpConfig::default(),
        })
    }

    /// Override the authority host.
    ///
    /// # Errors
    ///
    /// Returns [`KeyVaultError::InvalidConfig`] if the URL does not parse.
    pub fn with_authority_host(mut self, authority_host: &str) -> KeyVaultResult<Self> {
        self.authority_host = parse_url(authority_host)?;
        Ok(self)
    }

    /// URL of the first secret listing page.
    #[must_use]
    pub fn list_url(&self) -> String {
        format!(
            "{}/secrets?api-version={}&maxresults={}",
            self.vault_base(),
            self.api_version,
            self.max_results
        )
    }

    /// URL of the latest version of secret `name`.
    #[must_use]
    pub fn secret_url(&self, name: &str) -> String {
        format!(
            "{}/secrets/{name}?api-version={}",
            self.vault_base(),
            self.api_version
        )
    }

    /// Token endpoint for `tenant_id`.
    #[must_use]
    pub fn token_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/{tenant_id}/oauth2/v2.0/token",
            self.authority_host.as_str().trim_end_matches('/')
        )
    }

    fn vault_base(&self) -> &str {
        self.vault_url.as_str().trim_end_matches('/')
    }
}

fn is_valid_vault_name(name: &str) -> bool {
    (3..=24).contains(&name.len())
        && name.starts_with(|c: char| c.is_ascii_alphabetic())
        && !name.ends_with('-')
        && !name.contains("--")
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn parse_url(raw: &str) -> KeyVaultResult<Url> {
    Url::parse(raw).map_err(|e| KeyVaultError::InvalidConfig(format!("invalid URL {raw:?}: {e}")))
}
