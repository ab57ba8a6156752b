use crate::enums::value_type_name;
use crate::error::{BuildError, Diagnostic, FormError};
use crate::flatten::flatten;
use crate::resolve::{Resolution, resolve, resolve_to_fixed_point};
use crate::rules::{ConditionalRule, parse_rules};
use crate::types::{ExternalAttribute, ExternalAttributes, FieldDescriptor, FormOptions};
use crate::validate::{DefaultLeafValidator, FormErrors, LeafValidator, collect_form_errors};
use serde_json::{Value, json};
use std::sync::Arc;

/// A form session: the flattened fields of one schema plus its parsed rules.
///
/// Every call to [`validate`](HeadlessForm::validate) re-resolves the fields
/// in place against the given snapshot. Separate sessions share nothing.
pub struct HeadlessForm {
    fields: Vec<FieldDescriptor>,
    rules: Vec<ConditionalRule>,
    diagnostics: Vec<Diagnostic>,
    validator: Arc<dyn LeafValidator>,
    max_fixed_point_iterations: usize,
}

/// Result of a validation call.
#[derive(Debug)]
pub struct Validation<'a> {
    /// `None` when no visible field fails.
    pub form_errors: Option<FormErrors>,
    /// Fields whose live state changed during this call.
    pub changed: Vec<String>,
    /// Which rules selected `then`, in declaration order.
    pub matched: Vec<bool>,
    pub fields: &'a [FieldDescriptor],
}

impl HeadlessForm {
    /// Flattens `schema`, parses its conditional rules, and resolves the
    /// fields once against an empty snapshot so the initial state already
    /// reflects the conditionals.
    pub fn build(schema: &Value, options: FormOptions) -> Result<Self, BuildError> {
        let mut fields = flatten(schema, &options)?;
        let (rules, diagnostics) = parse_rules(schema);

        resolve(&mut fields, &rules, &json!({}));

        let validator = options
            .leaf_validator
            .clone()
            .unwrap_or_else(|| Arc::new(DefaultLeafValidator::default()));

        Ok(HeadlessForm {
            fields,
            rules,
            diagnostics,
            validator,
            max_fixed_point_iterations: options.max_fixed_point_iterations.max(1),
        })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The caller-owned extension slots of a field. Resolution never touches
    /// them, so anything set here survives every later cycle.
    pub fn external_mut(&mut self, name: &str) -> Option<&mut ExternalAttributes> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .map(|f| &mut f.external)
    }

    pub fn rules(&self) -> &[ConditionalRule] {
        &self.rules
    }

    /// Warnings collected at build time, e.g. ignored `allOf` entries.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Runs one resolution cycle for `values`, then validates visible fields.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NonObjectValues`] when `values` is not an object.
    pub fn validate(&mut self, values: &Value) -> Result<Validation<'_>, FormError> {
        check_snapshot(values)?;
        let resolution = resolve(&mut self.fields, &self.rules, values);
        Ok(self.finish(resolution, values))
    }

    /// Like [`validate`](HeadlessForm::validate), but repeats resolution with
    /// the values of invisible fields removed until the fields settle.
    ///
    /// Form errors are computed against the trimmed snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NonObjectValues`] when `values` is not an object.
    pub fn validate_to_fixed_point(&mut self, values: &Value) -> Result<Validation<'_>, FormError> {
        check_snapshot(values)?;
        let (resolution, trimmed) = resolve_to_fixed_point(
            &mut self.fields,
            &self.rules,
            values,
            self.max_fixed_point_iterations,
        );
        Ok(self.finish(resolution, &trimmed))
    }

    /// Invokes the capability stored in `slot` of `field`.
    ///
    /// Returns `None` if the field or slot does not exist or the slot holds
    /// plain data.
    pub fn evaluate_capability(&self, field: &str, slot: &str, values: &Value) -> Option<Value> {
        let descriptor = self.field(field)?;
        match descriptor.external.get(slot)? {
            ExternalAttribute::Capability(capability) => Some(capability.evaluate(descriptor, values)),
            ExternalAttribute::Data(_) => None,
        }
    }

    fn finish(&self, resolution: Resolution, values: &Value) -> Validation<'_> {
        let form_errors = collect_form_errors(&self.fields, values, self.validator.as_ref());
        Validation {
            form_errors,
            changed: resolution.changed,
            matched: resolution.matched,
            fields: &self.fields,
        }
    }
}

fn check_snapshot(values: &Value) -> Result<(), FormError> {
    if values.is_object() {
        Ok(())
    } else {
        Err(FormError::NonObjectValues {
            found: value_type_name(values),
        })
    }
}
