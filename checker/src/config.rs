//! Effective configuration resolved from command line flags and host inputs.
//!
//! Host inputs (GitHub Actions `INPUT_*` variables) win over flags for the
//! same setting; ignore-tags from both sources are merged.

use crate::cli::Args;
use crate::error::{CheckError, CheckResult};
use checker_common::ActionInputs;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Notification sink selected for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyChannel {
    /// Print to stdout
    #[default]
    Console,
    /// Send one email to all recipients
    Email,
    /// Post to a Slack incoming webhook
    Chat,
}

impl NotifyChannel {
    /// Name as accepted on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Email => "email",
            Self::Chat => "slack",
        }
    }
}

impl fmt::Display for NotifyChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotifyChannel {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "console" => Ok(Self::Console),
            "email" => Ok(Self::Email),
            "slack" => Ok(Self::Chat),
            other => Err(CheckError::config(format!(
                "Invalid notifyBy value {other:?}, expected slack, email or blank"
            ))),
        }
    }
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    /// Vault to check
    pub vault_name: String,
    /// Tag keys that suppress reporting for a secret
    pub ignore_tags: BTreeSet<String>,
    /// Selected notification sink
    pub notify_channel: NotifyChannel,
    /// Email recipients, or the Slack channel as first entry
    pub recipients: Vec<String>,
    /// Verbose logging
    pub debug: bool,
}

impl EffectiveConfig {
    /// Merge `args` with host `inputs` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Config`] when no vault name is given, the channel
    /// is unknown, or email/Slack is selected without a recipient.
    pub fn resolve(args: &Args, inputs: &ActionInputs) -> CheckResult<Self> {
        let vault_name = inputs
            .get("vault")
            .map(String::from)
            .or_else(|| {
                args.vault
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from)
            })
            .ok_or_else(|| CheckError::config("No vault specified, bailing..."))?;

        let notify_channel = inputs
            .get("notify-via")
            .unwrap_or(&args.notify_by)
            .parse::<NotifyChannel>()?;

        let input_recipients = inputs.get_list("to");
        let recipients = if input_recipients.is_empty() {
            args.to
                .iter()
                .map(|r| r.trim())
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect()
        } else {
            input_recipients
        };

        let ignore_tags = args
            .ignore_tags
            .iter()
            .map(|t| t.trim().to_string())
            .chain(inputs.get_list("ignore-tags"))
            .filter(|t| !t.is_empty())
            .collect();

        let debug = args.debug || inputs.get_bool("debug");

        let config = Self {
            vault_name,
            ignore_tags,
            notify_channel,
            recipients,
            debug,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CheckResult<()> {
        if self.notify_channel != NotifyChannel::Console && self.recipients.is_empty() {
            return Err(CheckError::config(format!(
                "When setting notifyBy to {}, the argument \"to\" is required.",
                self.notify_channel
            )));
        }
        Ok(())
    }

    /// Slack channel, the first recipient.
    #[must_use]
    pub fn chat_channel(&self) -> Option<&str> {
        self.recipients.first().map(String::as_str)
    }
}
