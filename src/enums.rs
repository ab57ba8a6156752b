//! Closed enumerations used by field descriptors.
//!
//! These are closed enums: only the defined variants are valid. Input
//! types outside the known set survive as [`InputType::Other`] so custom
//! widgets declared through `x-jsf-presentation` are not lost.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON Schema primitive type of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl JsonType {
    /// Reads the `type` keyword of a property schema, if there is one.
    ///
    /// Type unions (`["string", "null"]`) resolve to their first non-null
    /// member.
    pub fn declared(schema: &Value) -> Option<JsonType> {
        match schema.get("type")? {
            Value::String(s) => JsonType::from_name(s),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(JsonType::from_name)
                .find(|t| *t != JsonType::Null)
                .or(Some(JsonType::Null)),
            _ => None,
        }
    }

    /// The declared type, or a best guess from the schema's shape.
    ///
    /// Without a `type`, `properties`/`items` mean object/array, and
    /// otherwise the first `const`/`enum` value decides. The guess only
    /// picks a widget; it never constrains values.
    pub fn from_schema(schema: &Value) -> JsonType {
        JsonType::declared(schema).unwrap_or_else(|| {
            if schema.get("properties").is_some() {
                JsonType::Object
            } else if schema.get("items").is_some() {
                JsonType::Array
            } else {
                first_listed_value(schema)
                    .and_then(|v| JsonType::from_name(value_type_name(v)))
                    .unwrap_or(JsonType::String)
            }
        })
    }

    pub fn from_name(name: &str) -> Option<JsonType> {
        match name {
            "string" => Some(JsonType::String),
            "number" => Some(JsonType::Number),
            "integer" => Some(JsonType::Integer),
            "boolean" => Some(JsonType::Boolean),
            "object" => Some(JsonType::Object),
            "array" => Some(JsonType::Array),
            "null" => Some(JsonType::Null),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::Boolean => "boolean",
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Null => "null",
        }
    }

    /// Whether `value` is an instance of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            JsonType::String => value.is_string(),
            JsonType::Number => value.is_number(),
            JsonType::Integer => value
                .as_f64()
                .is_some_and(|n| n.fract() == 0.0),
            JsonType::Boolean => value.is_boolean(),
            JsonType::Object => value.is_object(),
            JsonType::Array => value.is_array(),
            JsonType::Null => value.is_null(),
        }
    }
}

fn first_listed_value(schema: &Value) -> Option<&Value> {
    if let Some(value) = schema.get("const") {
        return Some(value);
    }
    if let Some(first) = schema.get("enum").and_then(Value::as_array).and_then(|v| v.first()) {
        return Some(first);
    }
    schema
        .get("oneOf")
        .and_then(Value::as_array)?
        .iter()
        .find_map(|item| item.get("const"))
}

/// JSON type name of an arbitrary value, as used in messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Widget kind a host renders for a field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputType {
    Text,
    Textarea,
    Number,
    Money,
    Email,
    Date,
    Radio,
    Select,
    Checkbox,
    Fieldset,
    GroupArray,
    File,
    Other(String),
}

impl InputType {
    pub fn parse(name: &str) -> InputType {
        match name {
            "text" => InputType::Text,
            "textarea" => InputType::Textarea,
            "number" => InputType::Number,
            "money" => InputType::Money,
            "email" => InputType::Email,
            "date" => InputType::Date,
            "radio" => InputType::Radio,
            "select" => InputType::Select,
            "checkbox" => InputType::Checkbox,
            "fieldset" => InputType::Fieldset,
            "group-array" => InputType::GroupArray,
            "file" => InputType::File,
            other => InputType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InputType::Text => "text",
            InputType::Textarea => "textarea",
            InputType::Number => "number",
            InputType::Money => "money",
            InputType::Email => "email",
            InputType::Date => "date",
            InputType::Radio => "radio",
            InputType::Select => "select",
            InputType::Checkbox => "checkbox",
            InputType::Fieldset => "fieldset",
            InputType::GroupArray => "group-array",
            InputType::File => "file",
            InputType::Other(name) => name,
        }
    }
}

impl Serialize for InputType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InputType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(InputType::parse(&name))
    }
}
