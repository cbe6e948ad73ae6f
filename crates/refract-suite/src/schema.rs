//! # Schema Loading & Validation
//!
//! Loads the Refract JSON Schema once at startup and compiles it into a
//! `jsonschema` validator. The compiled schema is the validation capability
//! the runner delegates to: [`Schema::validate`] returns `Ok(())` when a value
//! conforms and the list of violations otherwise.
//!
//! ## Reference Resolution
//!
//! Internal `$ref`s (`#`, `#/definitions/<name>`) are resolved by the
//! jsonschema crate natively. External `$ref`s are resolved by a local
//! retriever that maps the final path segment of the URI onto a sibling file
//! of the schema document. The retriever never makes network requests; an
//! unresolvable reference fails schema compilation.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri, Validator};
use serde::Serialize;
use serde_json::Value;

use crate::error::LoadError;

/// JSON Schema draft to compile the schema with.
///
/// When no draft is configured, the draft is detected from the schema's
/// `$schema` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDraft {
    /// Draft 4.
    Draft4,
    /// Draft 6.
    Draft6,
    /// Draft 7.
    Draft7,
    /// Draft 2019-09.
    Draft201909,
    /// Draft 2020-12.
    Draft202012,
}

impl From<SchemaDraft> for jsonschema::Draft {
    fn from(draft: SchemaDraft) -> Self {
        match draft {
            SchemaDraft::Draft4 => jsonschema::Draft::Draft4,
            SchemaDraft::Draft6 => jsonschema::Draft::Draft6,
            SchemaDraft::Draft7 => jsonschema::Draft::Draft7,
            SchemaDraft::Draft201909 => jsonschema::Draft::Draft201909,
            SchemaDraft::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

/// Resolves external `$ref` URIs to files next to the schema document.
struct SiblingFileRetriever {
    base_dir: PathBuf,
}

impl Retrieve for SiblingFileRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let filename = uri_str
            .split(['#', '?'])
            .next()
            .and_then(|s| s.rsplit('/').next())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("cannot resolve '{uri_str}' to a local file"))?;

        let path = self.base_dir.join(filename);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot resolve '{uri_str}' ({}): {e}", path.display()))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer path to the violating location in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the violation.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Everything the validator rejected about one value, in report order.
///
/// [`Schema::validate`] only hands one out when at least one violation
/// was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations(Vec<Violation>);

impl ValidationViolations {
    /// No violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recorded violations.
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }
}

/// The loaded, compiled schema. Immutable for the lifetime of a run.
pub struct Schema {
    path: PathBuf,
    document: Value,
    validator: Validator,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("path", &self.path)
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl Schema {
    /// Read, parse, and compile the schema document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::SchemaRead`] if the file cannot be read,
    /// [`LoadError::SchemaParse`] if it is not JSON, and
    /// [`LoadError::SchemaCompile`] if it is not a usable JSON Schema.
    pub fn load(path: impl AsRef<Path>, draft: Option<SchemaDraft>) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|source| LoadError::SchemaRead {
            path: path.clone(),
            source,
        })?;
        let document: Value =
            serde_json::from_str(&content).map_err(|source| LoadError::SchemaParse {
                path: path.clone(),
                source,
            })?;

        let schema = Self::from_document(path, document, draft)?;
        tracing::info!(
            path = %schema.path.display(),
            draft = ?draft,
            "loaded schema"
        );
        Ok(schema)
    }

    /// Compile an already-parsed schema document.
    ///
    /// `path` identifies the document in errors and anchors external `$ref`
    /// resolution to its parent directory.
    pub fn from_document(
        path: impl Into<PathBuf>,
        document: Value,
        draft: Option<SchemaDraft>,
    ) -> Result<Self, LoadError> {
        let path = path.into();
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut opts = jsonschema::options();
        if let Some(draft) = draft {
            opts.with_draft(draft.into());
        }
        opts.with_retriever(SiblingFileRetriever { base_dir });

        let validator = opts
            .build(&document)
            .map_err(|e| LoadError::SchemaCompile {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            path,
            document,
            validator,
        })
    }

    /// The parsed schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Validate `instance` against the schema.
    ///
    /// # Errors
    ///
    /// Returns every violation reported by the validator when the value does
    /// not conform. The list is never empty.
    pub fn validate(&self, instance: &Value) -> Result<(), ValidationViolations> {
        let violations = ValidationViolations(
            self.validator
                .iter_errors(instance)
                .map(|e| Violation {
                    instance_path: e.instance_path.to_string(),
                    schema_path: e.schema_path.to_string(),
                    message: e.to_string(),
                })
                .collect(),
        );

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn string_schema() -> Schema {
        Schema::from_document("inline.json", json!({"type": "string"}), None).unwrap()
    }

    #[test]
    fn validate_accepts_conforming_value() {
        assert!(string_schema().validate(&json!("hello")).is_ok());
    }

    #[test]
    fn validate_rejects_with_violations() {
        let err = string_schema().validate(&json!(42)).unwrap_err();
        assert!(!err.is_empty());
        assert_eq!(err.violations()[0].instance_path, "");
        assert!(err.violations()[0].schema_path.contains("type"));
    }

    #[test]
    fn every_violation_is_kept_and_serializes_as_a_list() {
        let schema = Schema::from_document(
            "inline.json",
            json!({
                "type": "object",
                "required": ["element"],
                "properties": {"content": {"type": "string"}}
            }),
            None,
        )
        .unwrap();
        let err = schema.validate(&json!({"content": 1})).unwrap_err();
        assert_eq!(err.violations().len(), 2);

        let serialized = serde_json::to_value(&err).unwrap();
        let items = serialized.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().any(|v| v["instance_path"] == "/content"));
    }

    #[test]
    fn validate_reports_nested_instance_path() {
        let schema = Schema::from_document(
            "inline.json",
            json!({
                "type": "object",
                "properties": {"element": {"type": "string"}}
            }),
            None,
        )
        .unwrap();
        let err = schema.validate(&json!({"element": 1})).unwrap_err();
        assert_eq!(err.violations()[0].instance_path, "/element");
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Schema::load(dir.path().join("absent.json"), None).unwrap_err();
        assert!(matches!(err, LoadError::SchemaRead { .. }), "got: {err}");
    }

    #[test]
    fn load_malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, "{\"type\": ").unwrap();
        let err = Schema::load(&path, None).unwrap_err();
        assert!(matches!(err, LoadError::SchemaParse { .. }), "got: {err}");
    }

    #[test]
    fn load_invalid_schema_is_compile_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, r#"{"type": 12}"#).unwrap();
        let err = Schema::load(&path, None).unwrap_err();
        assert!(matches!(err, LoadError::SchemaCompile { .. }), "got: {err}");
    }

    #[test]
    fn external_ref_resolves_to_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("name.json"),
            r#"{"type": "string", "minLength": 1}"#,
        )
        .unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(
            &path,
            r#"{
                "$id": "https://example.com/schemas/schema.json",
                "type": "object",
                "properties": {"element": {"$ref": "name.json"}}
            }"#,
        )
        .unwrap();

        let schema = Schema::load(&path, None).unwrap();
        assert!(schema.validate(&json!({"element": "string"})).is_ok());
        assert!(schema.validate(&json!({"element": ""})).is_err());
    }

    #[test]
    fn explicit_draft_compiles_schema_without_dollar_schema() {
        let schema = Schema::from_document(
            "inline.json",
            json!({"type": "object", "required": ["element"]}),
            Some(SchemaDraft::Draft7),
        )
        .unwrap();
        assert!(schema.validate(&json!({"element": "string"})).is_ok());
        assert!(schema.validate(&json!({})).is_err());
    }

    #[test]
    fn violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/type".to_string(),
            message: r#"42 is not of type "string""#.to_string(),
        };
        assert_eq!(v.to_string(), r#"(root): 42 is not of type "string""#);
    }

    #[test]
    fn violation_display_nested() {
        let v = Violation {
            instance_path: "/meta/id".to_string(),
            schema_path: "/properties/meta/properties/id/anyOf".to_string(),
            message: "1 is not valid under any of the schemas listed in the 'anyOf' keyword"
                .to_string(),
        };
        assert!(v.to_string().starts_with("/meta/id: "));
    }
}
