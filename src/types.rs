use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::enums::*;
use crate::validate::LeafValidator;

// ─── Options ────────────────────────────────────────────────────────────────

/// One selectable choice of a field, taken from `oneOf` consts or `enum`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: Value,
}

// ─── External attributes ────────────────────────────────────────────────────

/// Caller-provided behavior attached to a field.
///
/// The engine stores and hands these back without looking inside. Closures
/// of the matching shape implement the trait.
pub trait FieldCapability: Send + Sync {
    /// Runs the capability for `field` against the current form values.
    fn evaluate(&self, field: &FieldDescriptor, values: &Value) -> Value;
}

impl<F> FieldCapability for F
where
    F: Fn(&FieldDescriptor, &Value) -> Value + Send + Sync,
{
    fn evaluate(&self, field: &FieldDescriptor, values: &Value) -> Value {
        self(field, values)
    }
}

/// A single caller-attached slot on a field.
#[derive(Clone)]
pub enum ExternalAttribute {
    Data(Value),
    Capability(Arc<dyn FieldCapability>),
}

impl ExternalAttribute {
    pub fn capability<F>(f: F) -> Self
    where
        F: Fn(&FieldDescriptor, &Value) -> Value + Send + Sync + 'static,
    {
        ExternalAttribute::Capability(Arc::new(f))
    }

    pub fn as_data(&self) -> Option<&Value> {
        match self {
            ExternalAttribute::Data(v) => Some(v),
            ExternalAttribute::Capability(_) => None,
        }
    }

    pub fn is_capability(&self) -> bool {
        matches!(self, ExternalAttribute::Capability(_))
    }
}

impl From<Value> for ExternalAttribute {
    fn from(value: Value) -> Self {
        ExternalAttribute::Data(value)
    }
}

impl fmt::Debug for ExternalAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalAttribute::Data(v) => f.debug_tuple("Data").field(v).finish(),
            ExternalAttribute::Capability(_) => f.write_str("Capability(..)"),
        }
    }
}

/// The caller-owned bag of extension slots on a field.
///
/// Resolution cycles never add, remove, or replace entries here.
pub type ExternalAttributes = BTreeMap<String, ExternalAttribute>;

// ─── FieldDescriptor ────────────────────────────────────────────────────────

/// The flattened, caller-visible representation of one schema property.
///
/// Live state (`required`, `is_visible`, live attributes) is owned by the
/// form and recomputed on every cycle; only the external bag is writable
/// from outside, through [`HeadlessForm::external_mut`](crate::form::HeadlessForm::external_mut).
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) parent: Option<String>,
    pub(crate) json_type: JsonType,
    pub(crate) input_type: InputType,
    pub(crate) options: Vec<FieldOption>,
    pub(crate) schema: Value,
    pub(crate) base_required: bool,
    pub(crate) base_attributes: Map<String, Value>,
    pub(crate) live_attributes: Map<String, Value>,
    pub(crate) required: bool,
    pub(crate) is_visible: bool,
    pub(crate) external: ExternalAttributes,
}

impl FieldDescriptor {
    /// Dotted property path, unique within a form.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the enclosing object field, for nested properties.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Declared type, or the type guessed from the schema's shape.
    pub fn json_type(&self) -> JsonType {
        self.json_type
    }

    /// The type the schema actually declares. `None` means any type is
    /// accepted.
    pub fn declared_type(&self) -> Option<JsonType> {
        JsonType::declared(&self.schema)
    }

    pub fn input_type(&self) -> &InputType {
        &self.input_type
    }

    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    /// The property's own schema fragment, as declared.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Attributes captured at build time. Never changes afterwards.
    pub fn base_attributes(&self) -> &Map<String, Value> {
        &self.base_attributes
    }

    /// Attributes currently in effect: base overlaid by every matching branch.
    pub fn live_attributes(&self) -> &Map<String, Value> {
        &self.live_attributes
    }

    /// Shorthand for a single live attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.live_attributes.get(key)
    }

    pub fn label(&self) -> Option<&str> {
        self.live_attributes.get("label").and_then(Value::as_str)
    }

    pub fn external(&self) -> &ExternalAttributes {
        &self.external
    }
}

// ─── FormOptions ────────────────────────────────────────────────────────────

/// Build-time configuration of a form.
#[derive(Clone)]
pub struct FormOptions {
    /// Require every field to declare `x-jsf-presentation.inputType`.
    pub strict_input_type: bool,
    /// Extension slots merged into fields at build time, keyed by field name.
    pub custom_properties: HashMap<String, ExternalAttributes>,
    /// Upper bound on cycles run by `validate_to_fixed_point`.
    pub max_fixed_point_iterations: usize,
    /// Replaces the default leaf constraint checker.
    pub leaf_validator: Option<Arc<dyn LeafValidator>>,
}

impl Default for FormOptions {
    fn default() -> Self {
        FormOptions {
            strict_input_type: true,
            custom_properties: HashMap::new(),
            max_fixed_point_iterations: 5,
            leaf_validator: None,
        }
    }
}

impl FormOptions {
    pub fn with_strict_input_type(mut self, strict: bool) -> Self {
        self.strict_input_type = strict;
        self
    }

    pub fn with_custom_property(
        mut self,
        field: &str,
        slot: &str,
        attribute: impl Into<ExternalAttribute>,
    ) -> Self {
        self.custom_properties
            .entry(field.to_string())
            .or_default()
            .insert(slot.to_string(), attribute.into());
        self
    }

    pub fn with_max_fixed_point_iterations(mut self, max: usize) -> Self {
        self.max_fixed_point_iterations = max;
        self
    }

    pub fn with_leaf_validator(mut self, validator: Arc<dyn LeafValidator>) -> Self {
        self.leaf_validator = Some(validator);
        self
    }
}

impl fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOptions")
            .field("strict_input_type", &self.strict_input_type)
            .field("custom_properties", &self.custom_properties)
            .field("max_fixed_point_iterations", &self.max_fixed_point_iterations)
            .field("leaf_validator", &self.leaf_validator.is_some())
            .finish()
    }
}
