//! # Error Types
//!
//! The runner has exactly one error kind: a fatal load error. It covers the
//! schema document and the suite files, and aborts the run before any tally
//! is reported.
//!
//! A test whose validation outcome disagrees with its expectation is not an
//! error. It is recorded as [`crate::Outcome::Fail`].

use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading the schema or a suite file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The schema file is missing or unreadable.
    #[error("cannot read schema '{}': {source}", path.display())]
    SchemaRead {
        /// Path of the schema document.
        path: PathBuf,
        /// Underlying IO failure.
        source: std::io::Error,
    },

    /// The schema file is not valid JSON.
    #[error("schema '{}' is not valid JSON: {source}", path.display())]
    SchemaParse {
        /// Path of the schema document.
        path: PathBuf,
        /// Underlying parse failure.
        source: serde_json::Error,
    },

    /// The schema is JSON but cannot be compiled into a validator.
    #[error("schema '{}' cannot be compiled: {reason}", path.display())]
    SchemaCompile {
        /// Path of the schema document.
        path: PathBuf,
        /// Reason reported by the validator builder.
        reason: String,
    },

    /// The suite directory cannot be listed.
    #[error("cannot list suite directory '{}': {source}", path.display())]
    SuiteDirectory {
        /// Path of the suite directory.
        path: PathBuf,
        /// Underlying IO failure.
        source: std::io::Error,
    },

    /// A suite file is missing or unreadable.
    #[error("cannot read suite '{}': {source}", path.display())]
    SuiteRead {
        /// Path of the suite file.
        path: PathBuf,
        /// Underlying IO failure.
        source: std::io::Error,
    },

    /// A suite file is not a JSON array of cases.
    #[error("suite '{}' is malformed: {source}", path.display())]
    SuiteParse {
        /// Path of the suite file.
        path: PathBuf,
        /// Underlying parse failure.
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Path of the file or directory that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::SchemaRead { path, .. }
            | Self::SchemaParse { path, .. }
            | Self::SchemaCompile { path, .. }
            | Self::SuiteDirectory { path, .. }
            | Self::SuiteRead { path, .. }
            | Self::SuiteParse { path, .. } => path,
        }
    }
}
