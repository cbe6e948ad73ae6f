//! # refract-suite — Refract Schema Conformance Runner
//!
//! Loads the Refract JSON Schema, loads every conformance suite from a
//! directory, validates each test's example data against the schema, and
//! tallies whether the outcome matched the test's declared expectation.
//!
//! ## Phases
//!
//! 1. **Load** — [`Schema::load`] reads and compiles the schema;
//!    [`load_suites`] discovers and parses the suite files. Any failure here
//!    is fatal and surfaces as a [`LoadError`].
//! 2. **Execute** — [`SuiteRunner::execute`] runs every test of every case,
//!    streaming results to a [`Reporter`] and accumulating a [`RunReport`].
//! 3. **Report** — the reporter prints the summary; the caller maps
//!    [`Tally::is_success`] onto the process exit status.
//!
//! A test whose outcome disagrees with its expectation is a recorded
//! failure, never an error: the run always continues to the next test.
//!
//! ## Crate Policy
//!
//! - No process-global state. The tally is owned by the run.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - The JSON Schema algorithm itself is delegated to `jsonschema`.

pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod schema;
pub mod suite;

pub use config::{
    ColorChoice, RunConfig, DEFAULT_SCHEMA_PATH, DEFAULT_SUITE_DIR, DEFAULT_SUITE_EXTENSION,
};
pub use error::LoadError;
pub use report::ConsoleReporter;
pub use runner::{
    CaseResult, NullReporter, Outcome, Reporter, RunReport, SuiteResult, SuiteRunner, Tally,
    TestResult,
};
pub use schema::{Schema, SchemaDraft, ValidationViolations, Violation};
pub use suite::{discover_suite_files, load_suites, Case, Suite, Test};
