//! Attribute bags and the per-cycle overlay of branch patches.
//!
//! Live attributes are never edited incrementally. Each cycle starts again
//! from the base attributes captured at build time and replays the patches
//! of the branches that match right now, so nothing contributed by a branch
//! that stopped matching can survive.

use crate::branch::BranchDelta;
use crate::types::FieldDescriptor;
use serde_json::{Map, Value};
use tracing::debug;

/// Schema keywords that describe structure rather than presentation.
/// They never become attributes.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "type",
    "properties",
    "required",
    "oneOf",
    "anyOf",
    "items",
    "allOf",
    "if",
    "then",
    "else",
    "x-jsf-order",
    "additionalProperties",
    "$ref",
    "$defs",
    "definitions",
];

/// Slots owned by the flattener. Branches cannot touch them.
pub const INTERNAL_KEYS: &[&str] = &[
    "name",
    "type",
    "inputType",
    "jsonType",
    "options",
    "schema",
    "required",
    "isVisible",
];

const PRESENTATION_KEYWORDS: &[&str] = &["x-jsf-presentation", "presentation"];

/// Turns a property schema (or a branch's patch for it) into an attribute bag.
///
/// `title` surfaces as `label` and `x-jsf-errorMessage` as `errorMessage`.
/// Presentation groups are flattened into the bag so a patch touching one
/// presentation key lands on the same slot as the base value.
pub fn extract_attributes(schema: &Map<String, Value>) -> Map<String, Value> {
    let mut attributes = Map::new();

    for (key, value) in schema {
        let key = key.as_str();
        if STRUCTURAL_KEYWORDS.contains(&key) || INTERNAL_KEYS.contains(&key) {
            continue;
        }
        match key {
            "title" => merge_entry(&mut attributes, "label", value),
            "x-jsf-errorMessage" => merge_entry(&mut attributes, "errorMessage", value),
            k if PRESENTATION_KEYWORDS.contains(&k) => {
                if let Some(group) = value.as_object() {
                    for (inner, inner_value) in group {
                        if !INTERNAL_KEYS.contains(&inner.as_str()) {
                            merge_entry(&mut attributes, inner, inner_value);
                        }
                    }
                }
            }
            _ => merge_entry(&mut attributes, key, value),
        }
    }

    attributes
}

/// Merges `overlay` into `base`: objects merge key by key, anything else
/// is replaced.
pub fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            merge_attributes(base_map, overlay_map);
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}

/// Map-level form of [`merge_json_values`].
pub fn merge_attributes(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        merge_entry(base, key, value);
    }
}

fn merge_entry(base: &mut Map<String, Value>, key: &str, value: &Value) {
    match base.get_mut(key) {
        Some(existing) => merge_json_values(existing, value),
        None => {
            base.insert(key.to_string(), value.clone());
        }
    }
}

/// Recomputes every field's live attributes from its base attributes and
/// the active deltas, applied in rule declaration order (later rules win).
pub fn apply(fields: &mut [FieldDescriptor], deltas: &[BranchDelta]) {
    for field in fields.iter_mut() {
        let mut live = field.base_attributes.clone();
        for delta in deltas {
            if let Some(patch) = delta.attribute_patches.get(&field.name) {
                merge_attributes(&mut live, patch);
            }
        }
        field.live_attributes = live;
    }

    for target in deltas.iter().flat_map(|d| d.attribute_patches.keys()) {
        if !fields.iter().any(|f| &f.name == target) {
            debug!(field = %target, "patch targets an unknown field");
        }
    }
}
