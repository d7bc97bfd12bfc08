//! Service principal credentials for the client-credentials flow.

use secrecy::SecretString;
use std::fmt;

/// Environment variables the service principal is read from.
pub const SERVICE_PRINCIPAL_ENV_VARS: [&str; 3] =
    ["AZURE_CLIENT_ID", "AZURE_CLIENT_SECRET", "AZURE_TENANT_ID"];

/// Entra ID application credentials.
#[derive(Clone)]
pub struct ServicePrincipal {
    /// Directory (tenant) ID
    pub tenant_id: String,
    /// Application (client) ID
    pub client_id: String,
    /// Client secret
    pub client_secret: SecretString,
}

impl fmt::Debug for ServicePrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePrincipal")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl ServicePrincipal {
    /// Create credentials from explicit values.
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    /// Read credentials through `lookup`; `None` unless all three variables are set.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Some(Self::new(
            get("AZURE_TENANT_ID")?,
            get("AZURE_CLIENT_ID")?,
            get("AZURE_CLIENT_SECRET")?,
        ))
    }

    /// Read credentials from the process environment.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Names of the service principal variables that `lookup` cannot resolve.
pub fn missing_env_vars<F>(lookup: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    SERVICE_PRINCIPAL_ENV_VARS
        .into_iter()
        .filter(|name| lookup(name).is_none_or(|v| v.trim().is_empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_complete() {
        let sp = ServicePrincipal::from_lookup(lookup_from(&[
            ("AZURE_TENANT_ID", "tenant"),
            ("AZURE_CLIENT_ID", "client"),
            ("AZURE_CLIENT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(sp.tenant_id, "tenant");
        assert_eq!(sp.client_id, "client");
        assert_eq!(sp.client_secret.expose_secret(), "s3cret");
    }

    #[test]
    fn test_from_lookup_partial_is_none() {
        let lookup = lookup_from(&[("AZURE_TENANT_ID", "tenant"), ("AZURE_CLIENT_ID", "")]);
        assert!(ServicePrincipal::from_lookup(&lookup).is_none());
        assert_eq!(
            missing_env_vars(&lookup),
            vec!["AZURE_CLIENT_ID", "AZURE_CLIENT_SECRET"]
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let sp = ServicePrincipal::new("tenant", "client", "very-secret-value");
        let debug = format!("{sp:?}");
        assert!(!debug.contains("very-secret-value"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("client"));
    }
}
