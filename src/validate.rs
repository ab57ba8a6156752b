//! Leaf-level constraint checking and collection of form errors.
//!
//! The conditional engine never validates by itself; after each cycle it
//! hands every visible field's live attributes to a [`LeafValidator`]. The
//! crate ships [`DefaultLeafValidator`], which runs them through `jsonschema`
//! and produces the messages a host form shows next to the input.

use crate::enums::JsonType;
use crate::primitives::{resolve_simple_path, value_to_text};
use crate::types::{FieldDescriptor, FieldOption};
use jsonschema::{Draft, Validator};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

pub const REQUIRED_MESSAGE: &str = "Required field";

/// Field name → message, for visible fields that currently fail.
pub type FormErrors = BTreeMap<String, String>;

/// Live attributes checked against the value, in reporting order.
const CHECKED_KEYWORDS: &[&str] = &[
    "const",
    "enum",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "pattern",
    "format",
];

/// The constraint set a leaf check runs against.
#[derive(Clone, Copy, Debug)]
pub struct LeafConstraints<'a> {
    /// Declared or inferred type; picks the wording of type messages.
    pub json_type: JsonType,
    /// The `type` keyword as written. `None` accepts values of any type.
    pub declared_type: Option<&'a Value>,
    /// The field's live attributes, conditional patches included.
    pub attributes: &'a Map<String, Value>,
    pub options: &'a [FieldOption],
}

impl<'a> LeafConstraints<'a> {
    pub fn of(field: &'a FieldDescriptor) -> Self {
        LeafConstraints {
            json_type: field.json_type,
            declared_type: field.schema.get("type"),
            attributes: &field.live_attributes,
            options: &field.options,
        }
    }

    /// The custom message for `keyword` from the `errorMessage` attribute.
    pub fn custom_message(&self, keyword: &str) -> Option<String> {
        self.attributes
            .get("errorMessage")
            .and_then(|m| m.get(keyword))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// One single-keyword schema per constraint, in reporting order.
    fn checks(&self) -> Vec<(&'static str, Value)> {
        let mut checks = Vec::new();
        if let Some(declared) = self.declared_type {
            checks.push(("type", json!({ "type": declared })));
        }
        for keyword in CHECKED_KEYWORDS {
            if *keyword == "enum" && !self.options.is_empty() {
                let values: Vec<&Value> = self.options.iter().map(|o| &o.value).collect();
                checks.push(("enum", json!({ "enum": values })));
            }
            if let Some(argument) = self.attributes.get(*keyword) {
                let mut schema = Map::new();
                schema.insert(keyword.to_string(), argument.clone());
                checks.push((keyword, Value::Object(schema)));
            }
        }
        checks
    }
}

/// Extension point for leaf validation.
///
/// Called once per visible field with a present value, every cycle. Returns
/// the message for the first failing constraint, or `None`.
pub trait LeafValidator: Send + Sync {
    fn check_leaf(&self, constraints: &LeafConstraints<'_>, value: &Value) -> Option<String>;
}

/// Checks type, `const`, options/`enum`, numeric bounds, string lengths,
/// `pattern` and `format` with a JSON Schema validator, in that order.
///
/// Compiled validators are cached by schema, so each constraint is only
/// compiled the first time it is seen. Constraints that do not compile
/// (a non-numeric bound, an invalid regex) are skipped.
#[derive(Default)]
pub struct DefaultLeafValidator {
    compiled: Mutex<HashMap<String, Option<Arc<Validator>>>>,
}

impl DefaultLeafValidator {
    fn validator(&self, schema: &Value) -> Option<Arc<Validator>> {
        let key = schema.to_string();
        let mut compiled = self.compiled.lock().unwrap_or_else(PoisonError::into_inner);
        compiled
            .entry(key)
            .or_insert_with(|| match compile(schema) {
                Ok(validator) => Some(Arc::new(validator)),
                Err(message) => {
                    debug!(schema = %schema, error = %message, "skipping uncompilable constraint");
                    None
                }
            })
            .clone()
    }

    fn accepts(&self, schema: &Value, value: &Value) -> bool {
        self.validator(schema).is_none_or(|v| v.is_valid(value))
    }
}

impl fmt::Debug for DefaultLeafValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self.compiled.lock().map(|c| c.len()).unwrap_or_default();
        f.debug_struct("DefaultLeafValidator").field("cached", &cached).finish()
    }
}

impl LeafValidator for DefaultLeafValidator {
    fn check_leaf(&self, constraints: &LeafConstraints<'_>, value: &Value) -> Option<String> {
        let checks = constraints.checks();
        let (keyword, schema) = checks
            .iter()
            .find(|(_, schema)| !self.accepts(schema, value))?;
        let message = describe_failure(keyword, &schema[*keyword], constraints.json_type, value);
        Some(constraints.custom_message(keyword).unwrap_or(message))
    }
}

fn compile(schema: &Value) -> Result<Validator, String> {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .should_validate_formats(true)
        .build(schema)
        .map_err(|err| err.to_string())
}

fn describe_failure(keyword: &str, argument: &Value, json_type: JsonType, value: &Value) -> String {
    match keyword {
        "type" => type_message(json_type, value),
        "const" => format!("The only accepted value is {}.", value_to_text(argument)),
        "enum" => format!("The option {} is not valid.", value),
        "minimum" => format!("Must be greater or equal to {}", argument),
        "maximum" => format!("Must be smaller or equal to {}", argument),
        "exclusiveMinimum" => format!("Must be greater than {}", argument),
        "exclusiveMaximum" => format!("Must be smaller than {}", argument),
        "minLength" => format!("Please insert at least {} characters", argument),
        "maxLength" => format!("Please insert up to {} characters", argument),
        "pattern" => "Must have a valid format".to_string(),
        "format" => match argument.as_str() {
            Some("email") => "Please insert a valid email address".to_string(),
            Some("date") => "Must be a valid date in yyyy-mm-dd format. e.g. 2020-12-31".to_string(),
            _ => format!("Must be a valid {} format", value_to_text(argument)),
        },
        _ => "Invalid value".to_string(),
    }
}

fn type_message(json_type: JsonType, value: &Value) -> String {
    match json_type {
        JsonType::Integer if value.is_number() => {
            "Must not contain decimal points. E.g. 3 instead of 3.14".to_string()
        }
        JsonType::Number | JsonType::Integer => "The value must be a number".to_string(),
        JsonType::String => "The value must be a string".to_string(),
        JsonType::Boolean => "The value must be a boolean".to_string(),
        JsonType::Object => "The value must be an object".to_string(),
        JsonType::Array => "The value must be an array".to_string(),
        JsonType::Null => "The value must be null".to_string(),
    }
}

/// Validates the visible fields against `values`.
///
/// Missing (absent or `null`) required fields report [`REQUIRED_MESSAGE`]
/// (or their `errorMessage.required`). Fields nested in an object are only
/// checked when the enclosing object value is present. Returns `None` when
/// nothing fails.
pub fn collect_form_errors(
    fields: &[FieldDescriptor],
    values: &Value,
    validator: &dyn LeafValidator,
) -> Option<FormErrors> {
    let mut errors = FormErrors::new();

    for field in fields.iter().filter(|f| f.is_visible) {
        if let Some(parent) = field.parent()
            && resolve_simple_path(parent, values).is_none_or(Value::is_null)
        {
            continue;
        }

        let constraints = LeafConstraints::of(field);
        match resolve_simple_path(&field.name, values) {
            None | Some(Value::Null) => {
                if field.required {
                    let message = constraints
                        .custom_message("required")
                        .unwrap_or_else(|| REQUIRED_MESSAGE.to_string());
                    errors.insert(field.name.clone(), message);
                }
            }
            Some(value) => {
                if let Some(message) = validator.check_leaf(&constraints, value) {
                    errors.insert(field.name.clone(), message);
                }
            }
        }
    }

    if errors.is_empty() { None } else { Some(errors) }
}
