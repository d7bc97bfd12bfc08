//! Run-level error taxonomy. Every variant is fatal for the run.

use keyvault_client::KeyVaultError;
use std::process::ExitCode;
use thiserror::Error;

/// Boxed collaborator error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that end a check run.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Missing vault name, bad channel, missing channel argument
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required environment variables for the notifier or vault auth are missing
    #[error("Missing credentials: {0}")]
    Credential(String),

    /// Listing or fetching secrets failed, or the vault returned an unusable record
    #[error("Unable to get the secret-list from your keyvault: {0}")]
    VaultAccess(#[source] BoxError),

    /// Mail or webhook send failed, or the mail transport did not verify
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Result type for check runs.
pub type CheckResult<T> = Result<T, CheckError>;

impl CheckError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a credential error.
    #[must_use]
    pub fn credential(msg: impl Into<String>) -> Self {
        Self::Credential(msg.into())
    }

    /// Create a delivery error.
    #[must_use]
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Wrap a collaborator error as a vault access failure.
    pub fn vault_access<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::VaultAccess(Box::new(err))
    }

    /// Check if this is a vault access failure.
    #[must_use]
    pub const fn is_vault_access(&self) -> bool {
        matches!(self, Self::VaultAccess(_))
    }

    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::FAILURE
    }
}

impl From<KeyVaultError> for CheckError {
    fn from(err: KeyVaultError) -> Self {
        match err {
            KeyVaultError::InvalidConfig(msg) => Self::Config(msg),
            other => Self::vault_access(other),
        }
    }
}
