//! Final report: grouped bucket listing plus the shell reminder.
use std::io::{self, Write};

use crate::pipeline::Outcome;

/// Printed after every report.
pub const RELOAD_REMINDER: &str = "Changes will take effect after sourcing your .*shrc";

/// Write the report for `outcome` to `out`.
///
/// Non-empty buckets are printed in a fixed order (commands, successes,
/// failures, errors), each under a `Label:` header with one item per line.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn render(outcome: &Outcome, out: &mut impl Write) -> io::Result<()> {
    let sections = [
        ("Commands", &outcome.commands),
        ("Successes", &outcome.successes),
        ("Failures", &outcome.failures),
        ("Errors", &outcome.errors),
    ];
    for (label, items) in sections {
        if items.is_empty() {
            continue;
        }
        writeln!(out, "{label}:")?;
        for item in items {
            writeln!(out, "{item}")?;
        }
    }
    writeln!(out, "{RELOAD_REMINDER}")
}

/// Write the report to standard output.
///
/// # Errors
///
/// Returns an error if standard output cannot be written.
pub fn print(outcome: &Outcome) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    render(outcome, &mut stdout)?;
    stdout.flush()
}
