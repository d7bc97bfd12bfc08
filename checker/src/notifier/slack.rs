//! Slack sink - incoming webhook integration.

use crate::error::{CheckError, CheckResult};
use crate::report::Report;
use checker_common::{HttpConfig, build_http_client};
use serde::Serialize;
use tracing::info;

const USERNAME: &str = "KeyvaultAlerts";
const ICON_EMOJI: &str = ":warning:";

/// Incoming-webhook payload.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SlackPayload<'a> {
    /// Message text, one report line per line
    pub text: String,
    /// Target channel
    pub channel: &'a str,
    /// Display name
    pub username: &'a str,
    /// Display icon
    pub icon_emoji: &'a str,
}

/// Posts the report to one Slack channel.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
    channel: String,
}

impl SlackNotifier {
    /// Create a notifier posting to `channel` through `webhook_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Config`] if the HTTP client cannot be built.
    pub fn new(webhook_url: impl Into<String>, channel: impl Into<String>) -> CheckResult<Self> {
        let client = build_http_client(&HttpConfig::default())
            .map_err(|e| CheckError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
            channel: channel.into(),
        })
    }

    /// Payload for `report`. Plain rendered lines, no color codes.
    #[must_use]
    pub fn format_payload(&self, report: &Report) -> SlackPayload<'_> {
        SlackPayload {
            text: report.plain_text(),
            channel: &self.channel,
            username: USERNAME,
            icon_emoji: ICON_EMOJI,
        }
    }

    /// Post `report`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Delivery`] on transport failure or a non-2xx status.
    pub async fn deliver(&self, report: &Report) -> CheckResult<()> {
        let payload = self.format_payload(report);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CheckError::delivery(format!("Slack webhook request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CheckError::delivery(format!(
                "Slack webhook returned status {status}: {body}"
            )));
        }

        info!(channel = %self.channel, "Posted messages to slack");
        Ok(())
    }
}
