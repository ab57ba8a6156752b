use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic severity level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// A structured, non-fatal message produced while building a form.
///
/// Schema authoring mistakes that the engine can recover from (a malformed
/// `allOf` entry, for instance) end up here instead of aborting the build.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn warning(code: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: DiagnosticSeverity::Warning,
            code: code.to_string(),
            path: Some(path.into()),
            message: message.into(),
        }
    }
}

/// Error kind for parse failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    Syntax,
    TypeMismatch,
}

/// Produced by [`parse`](crate::parse::parse) when schema text cannot be read.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
}

/// Produced by [`HeadlessForm::build`](crate::form::HeadlessForm::build) when
/// the schema cannot be turned into a field list.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The root schema is not a JSON object.
    #[error("schema root must be an object")]
    RootNotObject,
    /// A `properties` keyword holds something other than an object.
    #[error("`properties` at {path} must be an object")]
    PropertiesNotObject {
        /// Path of the schema holding the bad keyword (empty for the root).
        path: String,
    },
    /// Strict input types were requested and a field has none.
    #[error("field {field} has no x-jsf-presentation.inputType (strict_input_type is on)")]
    MissingInputType {
        /// Name of the offending field.
        field: String,
    },
}

/// Misuse of a built form. Never produced for bad form data, which surfaces
/// as `form_errors` instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    /// The value snapshot handed to `validate` is not a JSON object.
    #[error("form values must be a JSON object, got {found}")]
    NonObjectValues {
        /// JSON type name of what was received.
        found: &'static str,
    },
}

/// Serialization error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SerializeError {
    pub message: String,
}

/// Combined error type for the [`create_headless_form`](crate::create_headless_form)
/// entry point.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum JsfError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Build error: {0}")]
    Build(#[from] BuildError),
}
