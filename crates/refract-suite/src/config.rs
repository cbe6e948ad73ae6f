//! # Run Configuration
//!
//! Where the schema and suites live and how results are rendered. The
//! defaults reproduce a run from the repository root: `refract-schema.json`
//! and the `.json` files in `refract-schema-tests/`.

use std::io::IsTerminal;
use std::path::PathBuf;

use crate::schema::SchemaDraft;

/// Default schema document path, relative to the working directory.
pub const DEFAULT_SCHEMA_PATH: &str = "refract-schema.json";

/// Default suite directory, relative to the working directory.
pub const DEFAULT_SUITE_DIR: &str = "refract-schema-tests";

/// Default suite file name suffix.
pub const DEFAULT_SUITE_EXTENSION: &str = ".json";

/// When to emit ANSI color codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl ColorChoice {
    /// Resolve to a yes/no decision for stdout.
    pub fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Schema document to validate against.
    pub schema_path: PathBuf,
    /// Directory holding the suite files.
    pub suite_dir: PathBuf,
    /// Suite file name suffix.
    pub suite_extension: String,
    /// Draft override; `None` detects the draft from `$schema`.
    pub draft: Option<SchemaDraft>,
    /// Console color mode.
    pub color: ColorChoice,
    /// Print schema violations under failing tests.
    pub show_violations: bool,
    /// Write the structured run report as JSON to this path.
    pub report_json: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            suite_dir: PathBuf::from(DEFAULT_SUITE_DIR),
            suite_extension: DEFAULT_SUITE_EXTENSION.to_string(),
            draft: None,
            color: ColorChoice::default(),
            show_violations: false,
            report_json: None,
        }
    }
}
