//! One check run: set up the sink, enumerate, classify, aggregate, deliver.

use crate::classifier::{Severity, classify};
use crate::config::EffectiveConfig;
use crate::credentials::CredentialBundle;
use crate::error::{CheckError, CheckResult};
use crate::notifier::Notifier;
use crate::report::Report;
use chrono::{DateTime, Utc};
use keyvault_client::{KeyVaultClient, KeyVaultConfig, SecretSource};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No critical or warning messages; nothing was sent
    NothingToReport,
    /// The report went out through `channel`
    Delivered {
        /// Sink name
        channel: &'static str,
        /// Messages in the report
        messages: usize,
    },
}

/// Walk every page of `source` in order and classify each secret against `now`.
///
/// # Errors
///
/// Returns [`CheckError::VaultAccess`] on any listing or fetch failure and
/// for records the classifier cannot interpret.
#[instrument(skip(source, ignore_tags))]
pub async fn collect_report<S>(
    source: &S,
    ignore_tags: &BTreeSet<String>,
    now: DateTime<Utc>,
) -> CheckResult<Report>
where
    S: SecretSource + ?Sized,
{
    let mut messages = Vec::new();
    let mut cursor: Option<String> = None;
    let mut scanned = 0usize;

    loop {
        let page = source
            .list_page(cursor.as_deref())
            .await
            .map_err(CheckError::vault_access)?;

        for name in &page.names {
            let record = source
                .get_secret(name)
                .await
                .map_err(CheckError::vault_access)?;
            let verdict = classify(&record, now, ignore_tags).map_err(CheckError::vault_access)?;
            messages.extend(verdict.into_messages());
            scanned += 1;
        }

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    let report = Report::new(messages);
    debug!(
        scanned,
        critical = report.count(Severity::Critical),
        warning = report.count(Severity::Warning),
        info = report.count(Severity::Info),
        "Classified secrets"
    );
    Ok(report)
}

/// Deliver `report` through `notifier` if it has anything actionable.
///
/// # Errors
///
/// Returns [`CheckError::Delivery`] when the sink fails.
pub async fn dispatch(report: &Report, notifier: &Notifier) -> CheckResult<Outcome> {
    if !report.has_actionable() {
        return Ok(Outcome::NothingToReport);
    }

    notifier.deliver(report).await?;
    Ok(Outcome::Delivered {
        channel: notifier.name(),
        messages: report.len(),
    })
}

/// Key Vault client for `config`, honouring an authority host override.
///
/// # Errors
///
/// Returns [`CheckError::Config`] for an invalid vault name or authority URL.
pub fn keyvault_client(config: &EffectiveConfig, credentials: &CredentialBundle) -> CheckResult<KeyVaultClient> {
    let mut kv_config = KeyVaultConfig::for_vault(&config.vault_name)?;
    if let Some(authority) = &credentials.authority_host {
        kv_config = kv_config.with_authority_host(authority)?;
    }
    Ok(KeyVaultClient::new(kv_config, credentials.service_principal.clone())?)
}

/// Run a full check against `source`.
///
/// The notifier is built and verified before the vault is touched.
///
/// # Errors
///
/// Returns the first fatal [`CheckError`].
pub async fn run_with_source<S>(
    config: &EffectiveConfig,
    credentials: &CredentialBundle,
    source: &S,
    now: DateTime<Utc>,
) -> CheckResult<Outcome>
where
    S: SecretSource + ?Sized,
{
    let notifier = Notifier::from_config(config, credentials)?;
    notifier.verify().await?;

    info!(vault = %config.vault_name, channel = notifier.name(), "Checking secrets");
    let report = collect_report(source, &config.ignore_tags, now).await?;
    dispatch(&report, &notifier).await
}

/// Run a full check against the configured Azure Key Vault.
///
/// # Errors
///
/// Returns the first fatal [`CheckError`].
pub async fn run(config: &EffectiveConfig, credentials: &CredentialBundle) -> CheckResult<Outcome> {
    let client = keyvault_client(config, credentials)?;
    run_with_source(config, credentials, &client, Utc::now()).await
}

/// Extra diagnostic lines for a vault access failure.
#[must_use]
pub fn vault_access_hint(error: &CheckError, credentials: &CredentialBundle) -> Vec<String> {
    let CheckError::VaultAccess(source) = error else {
        return Vec::new();
    };

    if credentials.vault_credentials_incomplete() {
        vec![
            "It seems like you have not set the required authentication-related environment variables"
                .to_string(),
            format!("Missing: {}", credentials.missing_vault_vars.join(", ")),
            "See usage (--help) to figure out which are required".to_string(),
        ]
    } else {
        vec![
            "The error stack was as follows:".to_string(),
            format!("{source:?}"),
        ]
    }
}
