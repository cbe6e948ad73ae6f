//! # Console Report
//!
//! Renders run events as they happen:
//!
//! ```text
//! -> strings
//!   -> a string is valid
//!   -> a number is valid
//!     Expected data to validate as: True
//!     42
//!
//!
//! 1 passes, 1 failures
//! ```
//!
//! Case headers are bold, passing tests green, failing tests red. Write
//! errors never affect the tally; the first one is logged and the rest of
//! the output is dropped.
//!
//! Failing data is printed in the Python `json.dumps` layout used by the
//! existing suite tooling: `", "` and `": "` separators, non-ASCII
//! characters escaped as `\uXXXX`. Object keys come out sorted, since
//! `serde_json::Value` does not keep file order.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;

use crate::runner::{Outcome, Reporter, Tally, TestResult};
use crate::suite::{Case, Test};

const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// `serde_json` formatter producing Python `json.dumps` output.
struct DumpsFormatter;

impl Formatter for DumpsFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                // Astral characters become a surrogate pair.
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Render `data` the way `json.dumps` would.
fn dumps(data: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, DumpsFormatter);
    match data.serialize(&mut ser) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| data.to_string()),
        Err(_) => data.to_string(),
    }
}

/// Python spelling of a boolean.
fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Streams human-readable results to a writer.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
    show_violations: bool,
    write_error: Option<io::ErrorKind>,
}

impl<W: Write> ConsoleReporter<W> {
    /// Create a reporter writing to `out`.
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            show_violations: false,
            write_error: None,
        }
    }

    /// Also print each schema violation under a failing test.
    pub fn with_violations(mut self, show: bool) -> Self {
        self.show_violations = show;
        self
    }

    /// The first write error encountered, if any.
    pub fn write_error(&self) -> Option<io::ErrorKind> {
        self.write_error
    }

    /// Consume the reporter and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, text: &str) {
        if self.write_error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "console output failed; dropping remaining output");
            self.write_error = Some(e.kind());
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn case_started(&mut self, case: &Case) {
        let header = self.paint(BOLD, &format!("-> {}", case.description));
        self.line(&header);
    }

    fn test_finished(&mut self, test: &Test, result: &TestResult) {
        let label = format!("  -> {}", test.description);
        match result.outcome {
            Outcome::Pass => {
                let text = self.paint(GREEN, &label);
                self.line(&text);
            }
            Outcome::Fail => {
                let text = self.paint(RED, &label);
                self.line(&text);
                self.line(&format!(
                    "    Expected data to validate as: {}",
                    py_bool(test.valid)
                ));
                self.line(&format!("    {}", dumps(&test.data)));
                if self.show_violations {
                    if let Some(violations) = &result.violations {
                        for v in violations.violations() {
                            self.line(&format!("      {v}"));
                        }
                    }
                }
                self.line("");
            }
        }
    }

    fn case_finished(&mut self, _case: &Case) {
        self.line("");
    }

    fn run_finished(&mut self, tally: &Tally) {
        self.line(&format!("{} passes, {} failures", tally.passes, tally.failures));
        if self.write_error.is_none() {
            if let Err(e) = self.out.flush() {
                tracing::warn!(error = %e, "failed to flush console output");
                self.write_error = Some(e.kind());
            }
        }
    }
}
