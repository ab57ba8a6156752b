use crate::error::{ParseError, ParseErrorKind};
use serde_json::Value;

/// Parse JSON or YAML schema text into a JSON value.
///
/// Performs deserialization and the root-shape check only. Does NOT look at
/// keywords; that happens when the form is built.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError {
            kind: ParseErrorKind::Syntax,
            message: "empty input".to_string(),
        });
    }

    let value: Value = if input.trim_start().starts_with('{') {
        serde_json::from_str(input).map_err(|e| ParseError {
            kind: ParseErrorKind::Syntax,
            message: e.to_string(),
        })?
    } else {
        serde_saphyr::from_str(input).map_err(|e| ParseError {
            kind: ParseErrorKind::Syntax,
            message: e.to_string(),
        })?
    };

    if !value.is_object() {
        return Err(ParseError {
            kind: ParseErrorKind::TypeMismatch,
            message: "schema root must be a mapping".to_string(),
        });
    }

    Ok(value)
}
