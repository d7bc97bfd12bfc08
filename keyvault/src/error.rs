//! Key Vault error types using thiserror 2.0.

use thiserror::Error;

/// Key Vault client errors.
#[derive(Error, Debug)]
pub enum KeyVaultError {
    /// Key Vault or the token endpoint unreachable or failing
    #[error("Key Vault unavailable: {0}")]
    Unavailable(String),

    /// Token acquisition or bearer token rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No service principal configured
    #[error("Missing service principal credentials: {0}")]
    MissingCredentials(String),

    /// Secret not found
    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The vault returned a record that cannot be interpreted
    #[error("Malformed secret record: {0}")]
    MalformedRecord(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Key Vault operations.
pub type KeyVaultResult<T> = Result<T, KeyVaultError>;

impl KeyVaultError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create a secret not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::SecretNotFound(name.into())
    }

    /// Create a malformed record error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KeyVaultError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Key Vault unavailable: connection refused");

        let err = KeyVaultError::not_found("db-pass");
        assert_eq!(err.to_string(), "Secret not found: db-pass");
    }
}
