//! Schema → ordered field list.
//!
//! Runs once per form. Produces base state only; nothing here depends on
//! form values.

use crate::enums::{InputType, JsonType};
use crate::error::BuildError;
use crate::merge::extract_attributes;
use crate::primitives::value_to_text;
use crate::types::{FieldDescriptor, FieldOption, FormOptions};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Flattens the root schema's properties, depth first, into field
/// descriptors. Object properties are followed directly by their children,
/// named `parent.child`.
pub fn flatten(schema: &Value, options: &FormOptions) -> Result<Vec<FieldDescriptor>, BuildError> {
    let root = schema.as_object().ok_or(BuildError::RootNotObject)?;
    let mut fields = Vec::new();
    flatten_object(root, None, options, &mut fields)?;
    Ok(fields)
}

fn flatten_object(
    schema: &Map<String, Value>,
    parent: Option<&str>,
    options: &FormOptions,
    out: &mut Vec<FieldDescriptor>,
) -> Result<(), BuildError> {
    let properties = match schema.get("properties") {
        None => return Ok(()),
        Some(Value::Object(properties)) => properties,
        Some(_) => {
            return Err(BuildError::PropertiesNotObject {
                path: parent.unwrap_or_default().to_string(),
            });
        }
    };

    let required: HashSet<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    for key in ordered_keys(schema, properties) {
        let property = &properties[key];
        let name = match parent {
            Some(p) => format!("{}.{}", p, key),
            None => key.to_string(),
        };
        let Some(property_schema) = property.as_object() else {
            debug!(field = %name, "skipping non-object property schema");
            continue;
        };

        let json_type = JsonType::from_schema(property);
        let input_type = input_type_for(&name, property_schema, json_type, options.strict_input_type)?;
        let base_attributes = extract_attributes(property_schema);
        let base_required = required.contains(key);

        out.push(FieldDescriptor {
            name: name.clone(),
            parent: parent.map(str::to_string),
            json_type,
            input_type,
            options: field_options(property_schema),
            schema: property.clone(),
            base_required,
            live_attributes: base_attributes.clone(),
            base_attributes,
            required: base_required,
            is_visible: true,
            external: options.custom_properties.get(&name).cloned().unwrap_or_default(),
        });

        if json_type == JsonType::Object {
            flatten_object(property_schema, Some(&name), options, out)?;
        }
    }

    Ok(())
}

/// `x-jsf-order` names first (unknown ones ignored), then the remaining
/// properties in declaration order.
fn ordered_keys<'a>(schema: &'a Map<String, Value>, properties: &'a Map<String, Value>) -> Vec<&'a str> {
    let declared = properties.keys().map(String::as_str);
    let listed = schema
        .get("x-jsf-order")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .filter(|k| properties.contains_key(*k));

    let mut seen = HashSet::new();
    listed.chain(declared).filter(|k| seen.insert(*k)).collect()
}

fn input_type_for(
    name: &str,
    schema: &Map<String, Value>,
    json_type: JsonType,
    strict: bool,
) -> Result<InputType, BuildError> {
    let declared = ["x-jsf-presentation", "presentation"]
        .iter()
        .find_map(|group| schema.get(*group)?.get("inputType")?.as_str());

    if let Some(declared) = declared {
        return Ok(InputType::parse(declared));
    }
    if strict {
        return Err(BuildError::MissingInputType {
            field: name.to_string(),
        });
    }

    let has_const_options = schema
        .get("oneOf")
        .and_then(Value::as_array)
        .is_some_and(|items| items.iter().any(|i| i.get("const").is_some()));

    let inferred = match json_type {
        JsonType::Object => InputType::Fieldset,
        JsonType::Array => {
            let items = schema.get("items");
            if items.is_some_and(|i| i.get("anyOf").is_some() || i.get("oneOf").is_some()) {
                InputType::Select
            } else {
                InputType::GroupArray
            }
        }
        _ if has_const_options => InputType::Radio,
        _ if schema.contains_key("enum") => InputType::Select,
        JsonType::Number | JsonType::Integer => InputType::Number,
        JsonType::Boolean => InputType::Checkbox,
        _ => match schema.get("format").and_then(Value::as_str) {
            Some("email") => InputType::Email,
            Some("date") => InputType::Date,
            _ => InputType::Text,
        },
    };
    Ok(inferred)
}

fn field_options(schema: &Map<String, Value>) -> Vec<FieldOption> {
    if let Some(items) = schema.get("oneOf").and_then(Value::as_array) {
        return items
            .iter()
            .filter_map(|item| {
                let value = item.get("const")?;
                let label = item
                    .get("title")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| value_to_text(value));
                Some(FieldOption {
                    label,
                    value: value.clone(),
                })
            })
            .collect();
    }

    schema
        .get("enum")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|value| FieldOption {
                    label: value_to_text(value),
                    value: value.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}
