//! Email sink - using lettre over an authenticated SMTP relay.

use crate::classifier::Severity;
use crate::credentials::MailSettings;
use crate::error::{CheckError, CheckResult};
use crate::report::Report;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;
use tracing::{debug, info};

/// Subject of every alert mail.
pub const SUBJECT: &str = "[Alert] Keyvault secrets are about to expire";

/// Sends the report as one multipart mail.
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    settings: MailSettings,
    from: Mailbox,
    recipients: Vec<Mailbox>,
}

impl EmailNotifier {
    /// Create the notifier, parsing sender and recipients up front.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Config`] for unparsable addresses or an empty recipient list.
    pub fn new(settings: MailSettings, recipients: &[String]) -> CheckResult<Self> {
        if recipients.is_empty() {
            return Err(CheckError::config(
                "When setting notifyBy to email, the argument \"to\" is required.",
            ));
        }

        let from = settings
            .from
            .parse::<Mailbox>()
            .map_err(|e| CheckError::config(format!("Invalid sender {:?}: {e}", settings.from)))?;

        let recipients = recipients
            .iter()
            .map(|r| {
                r.parse::<Mailbox>()
                    .map_err(|e| CheckError::config(format!("Invalid recipient {r:?}: {e}")))
            })
            .collect::<CheckResult<Vec<_>>>()?;

        Ok(Self {
            settings,
            from,
            recipients,
        })
    }

    /// Build the mail for `report`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Delivery`] if lettre rejects the message.
    pub fn build_message(&self, report: &Report) -> CheckResult<Message> {
        let mut builder = Message::builder().from(self.from.clone()).subject(SUBJECT);

        for to in &self.recipients {
            builder = builder.to(to.clone());
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                Self::format_text_body(report),
                Self::format_html_body(report),
            ))
            .map_err(|e| CheckError::delivery(format!("Failed to build email: {e}")))
    }

    /// Plain-text body: one rendered line per message.
    #[must_use]
    pub fn format_text_body(report: &Report) -> String {
        report.plain_text()
    }

    /// HTML body: a list with critical lines in red and warnings in green-yellow.
    #[must_use]
    pub fn format_html_body(report: &Report) -> String {
        let items = report
            .messages()
            .iter()
            .map(|m| {
                let style = match m.severity {
                    Severity::Critical => "color: red;",
                    Severity::Warning => "color: #99cc33;",
                    Severity::Info => "",
                };
                format!("<li style=\"{style}\">{}</li>", escape_html(&m.to_string()))
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!("<ul>\n{items}\n</ul>")
    }

    fn transport(&self) -> CheckResult<SmtpTransport> {
        let tls = TlsParameters::new(self.settings.host.clone())
            .map_err(|e| CheckError::delivery(format!("TLS setup for {}: {e}", self.settings.host)))?;

        let credentials = Credentials::new(
            self.settings.user.clone(),
            self.settings.password.expose_secret().to_string(),
        );

        Ok(SmtpTransport::builder_dangerous(&self.settings.host)
            .port(self.settings.port)
            .tls(Tls::Opportunistic(tls))
            .credentials(credentials)
            .build())
    }

    /// Check that the relay accepts connections.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Delivery`] when the relay is unreachable.
    pub async fn verify(&self) -> CheckResult<()> {
        let transport = self.transport()?;
        let host = self.settings.host.clone();

        let connected = tokio::task::spawn_blocking(move || transport.test_connection())
            .await
            .map_err(|e| CheckError::delivery(format!("SMTP check aborted: {e}")))?
            .map_err(|e| CheckError::delivery(format!("Transporter not working: {e}")))?;

        if !connected {
            return Err(CheckError::delivery(format!(
                "Transporter not working: {host} refused the connection"
            )));
        }

        info!(host = %self.settings.host, port = self.settings.port, "Transporter OK");
        Ok(())
    }

    /// Send `report` to all recipients.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Delivery`] on any send failure.
    pub async fn deliver(&self, report: &Report) -> CheckResult<()> {
        let message = self.build_message(report)?;
        let transport = self.transport()?;

        let response = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| CheckError::delivery(format!("SMTP send aborted: {e}")))?
            .map_err(|e| CheckError::delivery(format!("Failed to send email: {e}")))?;

        debug!(code = %response.code(), "SMTP response");
        info!(recipients = self.recipients.len(), "Mail sent");
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
