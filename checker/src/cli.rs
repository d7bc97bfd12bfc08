//! Command line flags.

use clap::Parser;

const AFTER_HELP: &str = "\
Ensure you have the required authentication set up in your environment:
  $ export AZURE_CLIENT_ID=[SERVICE_PRINCIPAL_ID]
  $ export AZURE_CLIENT_SECRET=[SERVICE_PRINCIPAL_PASSWORD]
  $ export AZURE_TENANT_ID=[AZURE_TENANT_ID]

To send email:
  $ export MAILSERVER_PASSWORD=PASSWORD
  $ export MAILSERVER_USER=USER
  (optional: MAILSERVER_HOST, MAILSERVER_PORT, MAIL_FROM)

To send via Slack:
  $ export SLACK_WEBHOOK_URL=URL

Send alert via mail:
  $ keyvault-checker -v keyvault-name --notifyBy email --to mail@mail.com [--to mail2@mail.com]

Send alert via Slack:
  $ keyvault-checker -v keyvault-name --notifyBy slack --to channel

If notifyBy is omitted, warnings are printed to the console:
  $ keyvault-checker -v keyvault-name

When run as a GitHub Action, the inputs vault, notify-via, to, ignore-tags
and debug take precedence over these flags.";

/// Check Azure Key Vault secrets for expired and soon-expiring entries.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "keyvault-checker", version, about, after_help = AFTER_HELP)]
pub struct Args {
    /// Print debug info
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Name of the keyvault to check
    #[arg(short = 'v', long, value_name = "VAULT_NAME")]
    pub vault: Option<String>,

    /// If a secret has any of these tags, it is ignored (repeatable)
    #[arg(long = "ignoreTags", visible_alias = "it", value_name = "TAG")]
    pub ignore_tags: Vec<String>,

    /// How to send alerts. Prints to console if blank
    #[arg(long = "notifyBy", value_name = "slack|email", default_value = "")]
    pub notify_by: String,

    /// Where to send alerts (recipient or slack channel). Repeatable for email
    #[arg(long, value_name = "RECIPIENT|CHANNEL")]
    pub to: Vec<String>,
}
