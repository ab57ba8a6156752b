//! Field descriptors → the flat shape hosts consume.

use crate::error::SerializeError;
use crate::types::{ExternalAttribute, FieldDescriptor};
use serde_json::{Map, Value, json};

/// Flattens a field into one object: internal slots, then live attributes,
/// then external data slots. Capability slots are left out.
///
/// `inputType` is also exposed under its older name `type`.
pub fn field_to_value(field: &FieldDescriptor) -> Value {
    let mut obj = Map::new();
    obj.insert("name".to_string(), json!(field.name()));
    obj.insert("required".to_string(), json!(field.required()));
    obj.insert("isVisible".to_string(), json!(field.is_visible()));
    obj.insert("jsonType".to_string(), json!(field.json_type().as_str()));
    obj.insert("inputType".to_string(), json!(field.input_type().as_str()));
    obj.insert("type".to_string(), json!(field.input_type().as_str()));
    if !field.options().is_empty() {
        obj.insert("options".to_string(), json!(field.options()));
    }

    for (key, value) in field.live_attributes() {
        obj.insert(key.clone(), value.clone());
    }

    for (key, attribute) in field.external() {
        if let ExternalAttribute::Data(value) = attribute {
            obj.insert(key.clone(), value.clone());
        }
    }

    Value::Object(obj)
}

/// All fields, in order, as a JSON array.
pub fn fields_to_value(fields: &[FieldDescriptor]) -> Value {
    Value::Array(fields.iter().map(field_to_value).collect())
}

/// Serialize the exposed field list to a YAML string.
pub fn serialize_fields(fields: &[FieldDescriptor]) -> Result<String, SerializeError> {
    serde_saphyr::to_string(&fields_to_value(fields)).map_err(|e| SerializeError {
        message: format!("failed to serialize fields to YAML: {}", e),
    })
}
