//! # refract-cli — Refract Schema Conformance CLI
//!
//! Provides the `refract-schema-tests` command. Run from the repository
//! root with no arguments, it validates every suite in
//! `refract-schema-tests/` against `refract-schema.json`, prints per-test
//! results, and exits non-zero if any test failed:
//!
//! ```bash
//! refract-schema-tests
//! refract-schema-tests --schema other.json --suites other-tests --color never
//! ```
//!
//! ## Exit Status
//!
//! - `0` — every test matched its expectation.
//! - `1` — at least one test failed.
//! - `2` — the schema or a suite file could not be loaded.
//!
//! ## Crate Policy
//!
//! - Argument parsing and phase ordering live here; loading, execution, and
//!   rendering are delegated to `refract-suite`.
//! - Stdout carries only the report. Logs go to stderr.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use refract_suite::{
    load_suites, ColorChoice, ConsoleReporter, RunConfig, Schema, SchemaDraft, SuiteRunner,
    DEFAULT_SCHEMA_PATH, DEFAULT_SUITE_DIR, DEFAULT_SUITE_EXTENSION,
};

/// Exit status when every test passed.
pub const EXIT_SUCCESS: u8 = 0;

/// Exit status when at least one test failed.
pub const EXIT_TEST_FAILURE: u8 = 1;

/// Exit status when the schema or a suite could not be loaded.
pub const EXIT_LOAD_ERROR: u8 = 2;

/// Run the Refract JSON Schema conformance suites.
///
/// Validates every test's example data against the schema and reports
/// whether each outcome matched the test's expectation.
#[derive(Parser, Debug)]
#[command(name = "refract-schema-tests", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging on stderr. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the schema document.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SCHEMA_PATH)]
    pub schema: PathBuf,

    /// Directory containing the suite files.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_SUITE_DIR)]
    pub suites: PathBuf,

    /// File name suffix identifying suite files.
    #[arg(long, value_name = "EXT", default_value = DEFAULT_SUITE_EXTENSION)]
    pub extension: String,

    /// JSON Schema draft to compile with (default: detect from `$schema`).
    #[arg(long, value_enum)]
    pub draft: Option<DraftArg>,

    /// When to color the output.
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorArg,

    /// Print each schema violation under a failing test.
    #[arg(long)]
    pub show_violations: bool,

    /// Also write the structured results as JSON to this path.
    #[arg(long, value_name = "PATH")]
    pub report_json: Option<PathBuf>,
}

/// `--draft` values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftArg {
    #[value(name = "4")]
    Draft4,
    #[value(name = "6")]
    Draft6,
    #[value(name = "7")]
    Draft7,
    #[value(name = "2019-09")]
    Draft201909,
    #[value(name = "2020-12")]
    Draft202012,
}

impl From<DraftArg> for SchemaDraft {
    fn from(arg: DraftArg) -> Self {
        match arg {
            DraftArg::Draft4 => SchemaDraft::Draft4,
            DraftArg::Draft6 => SchemaDraft::Draft6,
            DraftArg::Draft7 => SchemaDraft::Draft7,
            DraftArg::Draft201909 => SchemaDraft::Draft201909,
            DraftArg::Draft202012 => SchemaDraft::Draft202012,
        }
    }
}

/// `--color` values.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

impl Cli {
    /// Build the run configuration from parsed arguments.
    pub fn to_config(&self) -> RunConfig {
        RunConfig {
            schema_path: self.schema.clone(),
            suite_dir: self.suites.clone(),
            suite_extension: self.extension.clone(),
            draft: self.draft.map(Into::into),
            color: self.color.into(),
            show_violations: self.show_violations,
            report_json: self.report_json.clone(),
        }
    }
}

/// Load, execute, and report, writing the console report to `out`.
///
/// Returns [`EXIT_SUCCESS`] or [`EXIT_TEST_FAILURE`]. Load errors are
/// returned as `Err` before anything is written to `out`.
pub fn run(config: &RunConfig, out: &mut dyn Write) -> Result<u8> {
    let schema = Schema::load(&config.schema_path, config.draft)
        .context("failed to load the schema document")?;
    let suites = load_suites(&config.suite_dir, &config.suite_extension)
        .context("failed to load the suite files")?;

    let mut reporter = ConsoleReporter::new(&mut *out, config.color.enabled())
        .with_violations(config.show_violations);
    let report = SuiteRunner::new(&schema).execute(&suites, &mut reporter);

    if let Some(path) = &config.report_json {
        let json =
            serde_json::to_string_pretty(&report).context("failed to serialize the run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write run report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote JSON run report");
    }

    if report.tally.is_success() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_TEST_FAILURE)
    }
}
