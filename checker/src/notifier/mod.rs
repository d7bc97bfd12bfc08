//! Notification sinks. Exactly one is active per run, chosen from configuration.

pub mod console;
pub mod email;
pub mod slack;

use crate::config::{EffectiveConfig, NotifyChannel};
use crate::credentials::CredentialBundle;
use crate::error::{CheckError, CheckResult};
use crate::report::Report;

pub use console::ConsoleNotifier;
pub use email::EmailNotifier;
pub use slack::SlackNotifier;

/// The selected sink.
#[derive(Debug, Clone)]
pub enum Notifier {
    /// Print to stdout
    Console(ConsoleNotifier),
    /// Send one mail
    Email(EmailNotifier),
    /// Post to Slack
    Slack(SlackNotifier),
}

impl Notifier {
    /// Build the sink for `config`, validating its credentials and arguments.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Credential`] or [`CheckError::Config`] when the
    /// selected channel cannot be set up.
    pub fn from_config(config: &EffectiveConfig, credentials: &CredentialBundle) -> CheckResult<Self> {
        credentials.require_for(config.notify_channel)?;

        match config.notify_channel {
            NotifyChannel::Console => Ok(Self::Console(ConsoleNotifier)),
            NotifyChannel::Email => Ok(Self::Email(EmailNotifier::new(
                credentials.mail_settings()?,
                &config.recipients,
            )?)),
            NotifyChannel::Chat => {
                let channel = config.chat_channel().ok_or_else(|| {
                    CheckError::config("When setting notifyBy to slack, the argument \"to\" is required.")
                })?;
                Ok(Self::Slack(SlackNotifier::new(credentials.slack_webhook()?, channel)?))
            }
        }
    }

    /// Channel name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Console(_) => "console",
            Self::Email(_) => "email",
            Self::Slack(_) => "slack",
        }
    }

    /// Check the sink is reachable before any vault work. Only the mail relay is checked.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Delivery`] if the mail transport does not verify.
    pub async fn verify(&self) -> CheckResult<()> {
        match self {
            Self::Email(email) => email.verify().await,
            Self::Console(_) | Self::Slack(_) => Ok(()),
        }
    }

    /// Deliver `report`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Delivery`] when the sink fails.
    pub async fn deliver(&self, report: &Report) -> CheckResult<()> {
        match self {
            Self::Console(console) => console.deliver(report),
            Self::Email(email) => email.deliver(report).await,
            Self::Slack(slack) => slack.deliver(report).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashMap};

    fn config(channel: NotifyChannel, recipients: &[&str]) -> EffectiveConfig {
        EffectiveConfig {
            vault_name: "kv".to_string(),
            ignore_tags: BTreeSet::new(),
            notify_channel: channel,
            recipients: recipients.iter().map(|r| (*r).to_string()).collect(),
            debug: false,
        }
    }

    fn credentials(pairs: &[(&str, &str)]) -> CredentialBundle {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        CredentialBundle::from_lookup(|name| map.get(name).map(|v| (*v).to_string()))
    }

    #[test]
    fn test_console_selected_by_default() {
        let notifier = Notifier::from_config(&config(NotifyChannel::Console, &[]), &credentials(&[])).unwrap();
        assert_eq!(notifier.name(), "console");
    }

    #[test]
    fn test_email_selection() {
        let creds = credentials(&[("MAILSERVER_USER", "relay"), ("MAILSERVER_PASSWORD", "pw")]);
        let notifier =
            Notifier::from_config(&config(NotifyChannel::Email, &["ops@example.com"]), &creds).unwrap();
        assert_eq!(notifier.name(), "email");
    }

    #[test]
    fn test_email_without_credentials_fails() {
        let err = Notifier::from_config(
            &config(NotifyChannel::Email, &["ops@example.com"]),
            &credentials(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, CheckError::Credential(_)));
    }

    #[test]
    fn test_slack_selection_uses_first_recipient() {
        let creds = credentials(&[("SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/T/B/X")]);
        let notifier =
            Notifier::from_config(&config(NotifyChannel::Chat, &["#ops", "#ignored"]), &creds).unwrap();

        let Notifier::Slack(slack) = notifier else {
            panic!("expected slack notifier");
        };
        assert_eq!(slack.format_payload(&Report::default()).channel, "#ops");
    }

    #[test]
    fn test_slack_without_webhook_fails() {
        let err = Notifier::from_config(&config(NotifyChannel::Chat, &["#ops"]), &credentials(&[]))
            .unwrap_err();
        assert!(matches!(err, CheckError::Credential(msg) if msg.contains("SLACK_WEBHOOK_URL")));
    }
}
