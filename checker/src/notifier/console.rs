//! Console sink: colored lines on stdout.

use crate::classifier::{ClassifiedMessage, Severity};
use crate::error::{CheckError, CheckResult};
use crate::report::Report;
use colored::{ColoredString, Colorize};
use std::io::{self, Write};

/// Prints the report to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Style a rendered message according to its severity.
    #[must_use]
    pub fn styled(message: &ClassifiedMessage) -> ColoredString {
        let line = message.to_string();
        match message.severity {
            Severity::Critical => line.red().bold(),
            Severity::Warning => line.yellow(),
            Severity::Info => line.magenta(),
        }
    }

    /// Write every line of `report` to `out`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub fn write_report<W: Write>(&self, report: &Report, out: &mut W) -> io::Result<()> {
        for message in report.messages() {
            writeln!(out, "{}", Self::styled(message))?;
        }
        out.flush()
    }

    /// Print `report` to stdout.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Delivery`] if stdout cannot be written.
    pub fn deliver(&self, report: &Report) -> CheckResult<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_report(report, &mut handle)
            .map_err(|e| CheckError::delivery(format!("writing to stdout: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_lines_in_report_order() {
        colored::control::set_override(false);

        let report = Report::new(vec![
            ClassifiedMessage {
                severity: Severity::Warning,
                text: "api-key expires in less than 30 days (2024-06-11 00:00:00 UTC)".into(),
            },
            ClassifiedMessage {
                severity: Severity::Critical,
                text: "db-pass expired at 2024-01-01 00:00:00 UTC".into(),
            },
        ]);

        let mut out = Vec::new();
        ConsoleNotifier.write_report(&report, &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert_eq!(
            printed,
            "[CRIT] db-pass expired at 2024-01-01 00:00:00 UTC\n\
             [WARN] api-key expires in less than 30 days (2024-06-11 00:00:00 UTC)\n"
        );
    }
}
