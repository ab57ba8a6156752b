//! Headless forms from JSON Schema.
//!
//! A schema is flattened once into an ordered list of field descriptors.
//! Every validation call then re-resolves the schema's conditionals
//! (`allOf[].if/then/else`) against the current form values, recomputing each
//! field's live attributes, visibility and required-ness from scratch, and
//! checks the visible fields:
//!
//! ```text
//! parse(text) → schema → HeadlessForm::build → fields
//!                                  └─ validate(values) → form_errors + updated fields
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use jsf::{FormOptions, HeadlessForm};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "properties": {
//!         "is_full_time": { "type": "string", "oneOf": [{ "const": "yes" }, { "const": "no" }] },
//!         "hours": { "type": "number" }
//!     },
//!     "allOf": [{
//!         "if": { "properties": { "is_full_time": { "const": "yes" } }, "required": ["is_full_time"] },
//!         "then": { "properties": { "hours": { "const": 8, "default": 8 } } },
//!         "else": { "properties": { "hours": { "maximum": 4 } } }
//!     }]
//! });
//!
//! let options = FormOptions::default().with_strict_input_type(false);
//! let mut form = HeadlessForm::build(&schema, options).expect("valid schema");
//!
//! let result = form.validate(&json!({ "is_full_time": "yes", "hours": 4 })).unwrap();
//! let errors = result.form_errors.expect("hours is not 8");
//! assert_eq!(errors["hours"], "The only accepted value is 8.");
//!
//! let result = form.validate(&json!({ "is_full_time": "no", "hours": 4 })).unwrap();
//! assert!(result.form_errors.is_none());
//! assert_eq!(form.fields()[1].attribute("maximum"), Some(&json!(4)));
//! ```

pub mod branch;
pub mod condition;
pub mod enums;
pub mod error;
pub mod flatten;
pub mod form;
pub mod merge;
pub mod parse;
pub mod primitives;
pub mod resolve;
pub mod rules;
pub mod serialize;
pub mod types;
pub mod validate;
pub mod visibility;

pub use error::*;
pub use form::{HeadlessForm, Validation};
pub use types::*;

// Re-export entry-point functions at the crate root for convenience.
pub use parse::parse;
pub use serialize::serialize_fields;

/// Convenience entry point composing parse → build.
///
/// # Errors
///
/// Returns [`JsfError::Parse`] if the text is not a JSON/YAML mapping and
/// [`JsfError::Build`] if the schema cannot be flattened.
///
/// # Example
///
/// ```rust
/// let yaml = r#"
/// properties:
///   name:
///     type: string
///     x-jsf-presentation:
///       inputType: text
/// required: [name]
/// "#;
///
/// let mut form = jsf::create_headless_form(yaml, jsf::FormOptions::default()).unwrap();
/// let result = form.validate(&serde_json::json!({})).unwrap();
/// assert_eq!(result.form_errors.unwrap()["name"], "Required field");
/// ```
pub fn create_headless_form(input: &str, options: FormOptions) -> Result<HeadlessForm, JsfError> {
    let schema = parse::parse(input)?;
    Ok(HeadlessForm::build(&schema, options)?)
}
