//! GitHub Actions host integration.
//!
//! When the checker runs as an action step, the workflow passes its inputs as
//! `INPUT_<NAME>` environment variables and expects failures to be reported
//! as `::error::` workflow commands on stdout.

use std::collections::HashMap;

const INPUT_PREFIX: &str = "INPUT_";

/// Inputs supplied by the host workflow.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    values: HashMap<String, String>,
}

impl ActionInputs {
    /// Collect all `INPUT_*` variables from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Collect inputs from arbitrary `(key, value)` pairs; keys without the
    /// `INPUT_` prefix are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(INPUT_PREFIX))
            .collect();
        Self { values }
    }

    /// Environment variable name carrying input `name`.
    #[must_use]
    pub fn variable_name(name: &str) -> String {
        format!("{INPUT_PREFIX}{}", name.replace(' ', "_").to_uppercase())
    }

    /// Trimmed value of input `name`; empty values count as absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(&Self::variable_name(name))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Input `name` as a list split on commas and newlines.
    #[must_use]
    pub fn get_list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .map(|raw| {
                raw.split([',', '\n'])
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Input `name` as a boolean; only `true` (any case) is truthy.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}

/// Where the process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEnvironment {
    /// Inside a GitHub Actions job.
    GitHubActions,
    /// Anywhere else.
    Local,
}

impl HostEnvironment {
    /// Detect the host from `GITHUB_ACTIONS`.
    #[must_use]
    pub fn detect() -> Self {
        match std::env::var("GITHUB_ACTIONS") {
            Ok(v) if v == "true" => Self::GitHubActions,
            _ => Self::Local,
        }
    }

    /// Workflow command that marks the step as failed, if the host has one.
    #[must_use]
    pub fn failure_annotation(self, message: &str) -> Option<String> {
        match self {
            Self::GitHubActions => Some(format!("::error::{}", escape_data(message))),
            Self::Local => None,
        }
    }

    /// Print the failure annotation for `message` on stdout.
    pub fn report_failure(self, message: &str) {
        if let Some(line) = self.failure_annotation(message) {
            println!("{line}");
        }
    }
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, &str)]) -> ActionInputs {
        ActionInputs::from_vars(pairs.iter().copied())
    }

    #[test]
    fn test_variable_name() {
        assert_eq!(ActionInputs::variable_name("notify-via"), "INPUT_NOTIFY-VIA");
        assert_eq!(ActionInputs::variable_name("ignore tags"), "INPUT_IGNORE_TAGS");
    }

    #[test]
    fn test_empty_input_is_absent() {
        let inputs = inputs(&[("INPUT_VAULT", "   "), ("PATH", "/usr/bin")]);
        assert_eq!(inputs.get("vault"), None);
        assert_eq!(inputs.get("path"), None);
    }

    #[test]
    fn test_get_trims() {
        let inputs = inputs(&[("INPUT_VAULT", " my-vault\n")]);
        assert_eq!(inputs.get("vault"), Some("my-vault"));
    }

    #[test]
    fn test_get_list_splits_commas_and_newlines() {
        let inputs = inputs(&[("INPUT_TO", "a@example.com, b@example.com\nc@example.com,,")]);
        assert_eq!(
            inputs.get_list("to"),
            vec!["a@example.com", "b@example.com", "c@example.com"]
        );
        assert!(inputs.get_list("ignore-tags").is_empty());
    }

    #[test]
    fn test_get_bool() {
        assert!(inputs(&[("INPUT_DEBUG", "TRUE")]).get_bool("debug"));
        assert!(!inputs(&[("INPUT_DEBUG", "yes")]).get_bool("debug"));
        assert!(!inputs(&[]).get_bool("debug"));
    }

    #[test]
    fn test_failure_annotation() {
        assert_eq!(
            HostEnvironment::GitHubActions.failure_annotation("bad 100%\nvault"),
            Some("::error::bad 100%25%0Avault".to_string())
        );
        assert_eq!(HostEnvironment::Local.failure_annotation("bad"), None);
    }
}
