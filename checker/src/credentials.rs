//! Credentials resolved from the environment once at startup.
//!
//! Collaborators receive what they need from the [`CredentialBundle`]
//! instead of reading the environment at the point of use.

use crate::config::NotifyChannel;
use crate::error::{CheckError, CheckResult};
use keyvault_client::ServicePrincipal;
use keyvault_client::credentials::missing_env_vars;
use secrecy::SecretString;
use std::fmt;

const DEFAULT_MAIL_HOST: &str = "localhost";
const DEFAULT_MAIL_PORT: u16 = 25;
const DEFAULT_MAIL_FROM: &str = "Azure Keyvault Notifier <noreply@localhost>";

/// SMTP relay settings.
#[derive(Clone)]
pub struct MailSettings {
    /// Relay host
    pub host: String,
    /// Relay port
    pub port: u16,
    /// Relay user
    pub user: String,
    /// Relay password
    pub password: SecretString,
    /// Sender mailbox
    pub from: String,
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

/// Credentials and endpoints for the vault and the notifiers.
#[derive(Debug, Clone, Default)]
pub struct CredentialBundle {
    /// Key Vault service principal, if fully configured
    pub service_principal: Option<ServicePrincipal>,
    /// Authority host override (`AZURE_AUTHORITY_HOST`)
    pub authority_host: Option<String>,
    /// `MAILSERVER_USER`
    pub mail_user: Option<String>,
    /// `MAILSERVER_PASSWORD`
    pub mail_password: Option<SecretString>,
    /// `MAILSERVER_HOST`
    pub mail_host: Option<String>,
    /// `MAILSERVER_PORT`, unparsed
    pub mail_port: Option<String>,
    /// `MAIL_FROM`
    pub mail_from: Option<String>,
    /// `SLACK_WEBHOOK_URL`
    pub slack_webhook_url: Option<String>,
    /// Service principal variables that were not set
    pub missing_vault_vars: Vec<&'static str>,
}

impl CredentialBundle {
    /// Read everything through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            service_principal: ServicePrincipal::from_lookup(&lookup),
            authority_host: get("AZURE_AUTHORITY_HOST"),
            mail_user: get("MAILSERVER_USER"),
            mail_password: get("MAILSERVER_PASSWORD").map(SecretString::from),
            mail_host: get("MAILSERVER_HOST"),
            mail_port: get("MAILSERVER_PORT"),
            mail_from: get("MAIL_FROM"),
            slack_webhook_url: get("SLACK_WEBHOOK_URL"),
            missing_vault_vars: missing_env_vars(&lookup),
        }
    }

    /// Read from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Whether any service principal variable is unset.
    #[must_use]
    pub fn vault_credentials_incomplete(&self) -> bool {
        !self.missing_vault_vars.is_empty()
    }

    /// Check that the variables `channel` depends on are present.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Credential`] naming the first missing variable.
    pub fn require_for(&self, channel: NotifyChannel) -> CheckResult<()> {
        match channel {
            NotifyChannel::Console => Ok(()),
            NotifyChannel::Email => self.mail_settings().map(|_| ()),
            NotifyChannel::Chat => self.slack_webhook().map(|_| ()),
        }
    }

    /// SMTP settings for the email notifier.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Credential`] when user or password is missing and
    /// [`CheckError::Config`] when the port does not parse.
    pub fn mail_settings(&self) -> CheckResult<MailSettings> {
        let password = self.mail_password.clone().ok_or_else(|| {
            CheckError::credential(
                "Missing password for mail-relay. Please set MAILSERVER_PASSWORD in your environment",
            )
        })?;
        let user = self.mail_user.clone().ok_or_else(|| {
            CheckError::credential(
                "Missing user for mail-relay. Please set MAILSERVER_USER in your environment",
            )
        })?;
        let port = match &self.mail_port {
            Some(raw) => raw
                .parse()
                .map_err(|e| CheckError::config(format!("Invalid MAILSERVER_PORT {raw:?}: {e}")))?,
            None => DEFAULT_MAIL_PORT,
        };

        Ok(MailSettings {
            host: self
                .mail_host
                .clone()
                .unwrap_or_else(|| DEFAULT_MAIL_HOST.to_string()),
            port,
            user,
            password,
            from: self
                .mail_from
                .clone()
                .unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
        })
    }

    /// Slack incoming webhook URL.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Credential`] when `SLACK_WEBHOOK_URL` is unset.
    pub fn slack_webhook(&self) -> CheckResult<&str> {
        self.slack_webhook_url.as_deref().ok_or_else(|| {
            CheckError::credential(
                "No webhook url defined. Please set SLACK_WEBHOOK_URL in your environment",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn bundle(pairs: &[(&str, &str)]) -> CredentialBundle {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        CredentialBundle::from_lookup(|name| map.get(name).map(|v| (*v).to_string()))
    }

    #[test]
    fn test_console_needs_nothing() {
        assert!(bundle(&[]).require_for(NotifyChannel::Console).is_ok());
    }

    #[test]
    fn test_email_requires_user_and_password() {
        let err = bundle(&[("MAILSERVER_USER", "relay")])
            .require_for(NotifyChannel::Email)
            .unwrap_err();
        assert!(matches!(err, CheckError::Credential(msg) if msg.contains("MAILSERVER_PASSWORD")));

        let err = bundle(&[("MAILSERVER_PASSWORD", "pw")])
            .require_for(NotifyChannel::Email)
            .unwrap_err();
        assert!(matches!(err, CheckError::Credential(msg) if msg.contains("MAILSERVER_USER")));
    }

    #[test]
    fn test_mail_settings_defaults_and_overrides() {
        let settings = bundle(&[("MAILSERVER_USER", "relay"), ("MAILSERVER_PASSWORD", "pw")])
            .mail_settings()
            .unwrap();
        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.port, 25);
        assert_eq!(settings.password.expose_secret(), "pw");
        assert!(settings.from.contains("Azure Keyvault Notifier"));

        let settings = bundle(&[
            ("MAILSERVER_USER", "relay"),
            ("MAILSERVER_PASSWORD", "pw"),
            ("MAILSERVER_HOST", "smtp.example.com"),
            ("MAILSERVER_PORT", "587"),
            ("MAIL_FROM", "Alerts <alerts@example.com>"),
        ])
        .mail_settings()
        .unwrap();
        assert_eq!(settings.host, "smtp.example.com");
        assert_eq!(settings.port, 587);
        assert_eq!(settings.from, "Alerts <alerts@example.com>");
    }

    #[test]
    fn test_bad_mail_port() {
        let err = bundle(&[
            ("MAILSERVER_USER", "relay"),
            ("MAILSERVER_PASSWORD", "pw"),
            ("MAILSERVER_PORT", "smtp"),
        ])
        .mail_settings()
        .unwrap_err();
        assert!(matches!(err, CheckError::Config(_)));
    }

    #[test]
    fn test_slack_requires_webhook() {
        let err = bundle(&[]).require_for(NotifyChannel::Chat).unwrap_err();
        assert!(matches!(err, CheckError::Credential(msg) if msg.contains("SLACK_WEBHOOK_URL")));

        let creds = bundle(&[("SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/T/B/X")]);
        assert!(creds.require_for(NotifyChannel::Chat).is_ok());
    }

    #[test]
    fn test_vault_credentials_tracking() {
        let creds = bundle(&[("AZURE_CLIENT_ID", "id")]);
        assert!(creds.service_principal.is_none());
        assert!(creds.vault_credentials_incomplete());
        assert_eq!(
            creds.missing_vault_vars,
            vec!["AZURE_CLIENT_SECRET", "AZURE_TENANT_ID"]
        );

        let creds = bundle(&[
            ("AZURE_CLIENT_ID", "id"),
            ("AZURE_CLIENT_SECRET", "secret"),
            ("AZURE_TENANT_ID", "tenant"),
        ]);
        assert!(creds.service_principal.is_some());
        assert!(!creds.vault_credentials_incomplete());
    }

    #[test]
    fn test_debug_redacts_mail_password() {
        let settings = bundle(&[("MAILSERVER_USER", "relay"), ("MAILSERVER_PASSWORD", "hunter2")])
            .mail_settings()
            .unwrap();
        assert!(!format!("{settings:?}").contains("hunter2"));
    }
}
