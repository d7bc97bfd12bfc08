//! Azure Key Vault client for the expiry checker.
//!
//! Read-only: lists secrets page by page and fetches the properties of each
//! one. Secret values are never requested into a typed field.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod provider;
pub mod secrets;

pub use client::KeyVaultClient;
pub use config::KeyVaultConfig;
pub use credentials::ServicePrincipal;
pub use error::{KeyVaultError, KeyVaultResult};
pub use provider::{SecretPage, SecretRecord, SecretSource};
