//! # Suites, Cases, and Tests
//!
//! A suite file is a JSON array of cases:
//!
//! ```json
//! [
//!   {
//!     "description": "strings",
//!     "tests": [
//!       { "description": "a string is valid", "data": "hello", "valid": true }
//!     ]
//!   }
//! ]
//! ```
//!
//! Suite files are discovered in a single directory by file extension and
//! loaded in filename order. Any read or parse failure is fatal.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::LoadError;

/// One example value and whether it is expected to conform.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Test {
    /// Human-readable label.
    pub description: String,
    /// The value validated against the schema.
    pub data: Value,
    /// Expected validity of `data`.
    pub valid: bool,
}

/// A named group of related tests.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Case {
    /// Human-readable label.
    pub description: String,
    /// Tests in reporting order.
    pub tests: Vec<Test>,
}

/// The ordered cases loaded from one suite file.
#[derive(Debug, Clone, PartialEq)]
pub struct Suite {
    /// File the suite was loaded from.
    pub path: PathBuf,
    /// Cases in file order.
    pub cases: Vec<Case>,
}

impl Suite {
    /// Read and parse the suite file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::SuiteRead`] if the file cannot be read and
    /// [`LoadError::SuiteParse`] if it is not a JSON array of cases.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|source| LoadError::SuiteRead {
            path: path.clone(),
            source,
        })?;
        let cases: Vec<Case> =
            serde_json::from_str(&content).map_err(|source| LoadError::SuiteParse {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %path.display(),
            cases = cases.len(),
            "loaded suite"
        );
        Ok(Self { path, cases })
    }

    /// Suite name: the file stem, or the full path if there is none.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Number of tests across all cases.
    pub fn test_count(&self) -> usize {
        self.cases.iter().map(|c| c.tests.len()).sum()
    }
}

/// List the suite files in `dir`, sorted by filename.
///
/// A suite file is a regular file directly inside `dir` whose name ends
/// with `extension` (e.g. `".json"`). Subdirectories are not searched.
///
/// # Errors
///
/// Returns [`LoadError::SuiteDirectory`] if `dir` cannot be listed.
pub fn discover_suite_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, LoadError> {
    let dir_error = |source| LoadError::SuiteDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Discover and load every suite file in `dir`.
///
/// # Errors
///
/// Fails on the first directory, read, or parse error.
pub fn load_suites(dir: &Path, extension: &str) -> Result<Vec<Suite>, LoadError> {
    let files = discover_suite_files(dir, extension)?;
    tracing::info!(
        dir = %dir.display(),
        count = files.len(),
        "discovered suite files"
    );
    if files.is_empty() {
        tracing::warn!(
            dir = %dir.display(),
            extension,
            "no suite files found"
        );
    }
    files.iter().map(Suite::load).collect()
}
