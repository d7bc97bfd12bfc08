//! `keyvault-checker` command-line entry point.

use checker_common::{ActionInputs, HostEnvironment, TracingConfig, init_tracing};
use clap::Parser;
use colored::Colorize;
use keyvault_checker::runner::vault_access_hint;
use keyvault_checker::{Args, CheckError, CredentialBundle, EffectiveConfig, Outcome, run};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let inputs = load_inputs(None);
    let args = Args::parse();
    let host = HostEnvironment::detect();

    let resolved = EffectiveConfig::resolve(&args, &inputs);
    let debug = resolved.as_ref().is_ok_and(|config| config.debug);
    init_tracing(&TracingConfig::from_env().with_debug(debug));

    let config = match resolved {
        Ok(config) => config,
        Err(err) => return fail(host, &err, &[]),
    };
    let credentials = CredentialBundle::from_env();

    match run(&config, &credentials).await {
        Ok(Outcome::NothingToReport) => {
            println!("{}", "No secrets expired / soon expiring".green());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Delivered { channel, messages }) => {
            info!(channel, messages, "Report delivered");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let hint = vault_access_hint(&err, &credentials);
            fail(host, &err, &hint)
        }
    }
}

/// Apply `.env` (or `env_file`) to the process environment, then read host inputs.
/// Everything read from the environment afterwards sees the file's values.
fn load_inputs(env_file: Option<&Path>) -> ActionInputs {
    if let Some(path) = env_file {
        dotenvy::from_path(path).ok();
    } else {
        dotenvy::dotenv().ok();
    }
    ActionInputs::from_env()
}

fn fail(host: HostEnvironment, err: &CheckError, hint: &[String]) -> ExitCode {
    error!("{err}");
    host.report_failure(&err.to_string());
    for line in hint {
        error!("{line}");
        host.report_failure(line);
    }
    err.exit_code()
}
