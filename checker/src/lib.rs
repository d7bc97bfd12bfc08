//! Key vault expiry checker.
//!
//! Lists every secret of an Azure Key Vault, classifies it as expired,
//! expiring within 31 days, or healthy, and sends the resulting report to
//! the console, an email relay or a Slack webhook.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classifier;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod notifier;
pub mod report;
pub mod runner;

pub use classifier::{ClassifiedMessage, Severity, Verdict, classify};
pub use cli::Args;
pub use config::{EffectiveConfig, NotifyChannel};
pub use credentials::CredentialBundle;
pub use error::{CheckError, CheckResult};
pub use notifier::Notifier;
pub use report::Report;
pub use runner::{Outcome, collect_report, run, run_with_source};
