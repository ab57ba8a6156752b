use super::common::*;
use jsf::FormOptions;
use jsf::types::ExternalAttribute;
use serde_json::{Value, json};

// ─── Scenario A: const/default vs maximum ──────────────────────────────────

#[test]
fn const_and_default_replace_maximum_and_back() {
    let mut form = lenient_form(&hours_schema());

    let result = form.validate(&json!({ "is_full_time": "yes", "hours": 4 })).unwrap();
    assert_eq!(
        result.form_errors,
        Some(errors(&[("hours", "The only accepted value is 8.")]))
    );
    let hours = &form.fields()[1];
    assert_eq!(hours.attribute("const"), Some(&json!(8)));
    assert_eq!(hours.attribute("default"), Some(&json!(8)));
    assert_eq!(hours.attribute("maximum"), None);

    let result = form.validate(&json!({ "is_full_time": "no", "hours": 4 })).unwrap();
    assert_eq!(result.form_errors, None);
    let hours = &form.fields()[1];
    assert_eq!(hours.attribute("maximum"), Some(&json!(4)));
    assert_eq!(hours.attribute("const"), None);
    assert_eq!(hours.attribute("default"), None);

    assert_eq!(form.validate(&json!({})).unwrap().form_errors, None);
    let result = form.validate(&json!({ "is_full_time": "yes", "hours": 8 })).unwrap();
    assert_eq!(result.form_errors, None);
    let hours = &form.fields()[1];
    assert_eq!(hours.attribute("maximum"), None);
    assert_eq!(hours.attribute("const"), Some(&json!(8)));
    assert_eq!(hours.attribute("default"), Some(&json!(8)));
}

#[test]
fn conditional_maximum_is_what_gets_checked() {
    let mut form = lenient_form(&hours_schema());
    let result = form.validate(&json!({ "is_full_time": "no", "hours": 5 })).unwrap();
    assert_eq!(
        result.form_errors,
        Some(errors(&[("hours", "Must be smaller or equal to 4")]))
    );
}

fn description_schema(base: Option<&str>) -> Value {
    let mut hours = json!({ "type": "number" });
    if let Some(text) = base {
        hours["description"] = json!(text);
    }
    json!({
        "properties": { "is_full_time": yes_no(), "hours": hours },
        "allOf": [{
            "if": { "properties": { "is_full_time": { "const": "yes" } }, "required": ["is_full_time"] },
            "then": { "properties": { "hours": { "description": "We recommend 8 hours." } } }
        }]
    })
}

#[test]
fn new_attribute_comes_and_goes_with_its_branch() {
    let mut form = lenient_form(&description_schema(None));
    assert_eq!(form.fields()[1].attribute("description"), None);

    assert_eq!(form.validate(&json!({ "is_full_time": "yes" })).unwrap().form_errors, None);
    assert_eq!(
        form.fields()[1].attribute("description"),
        Some(&json!("We recommend 8 hours."))
    );

    assert_eq!(form.validate(&json!({ "is_full_time": "no" })).unwrap().form_errors, None);
    assert_eq!(form.fields()[1].attribute("description"), None);

    form.validate(&json!({ "is_full_time": "yes" })).unwrap();
    assert_eq!(
        form.fields()[1].attribute("description"),
        Some(&json!("We recommend 8 hours."))
    );
}

#[test]
fn existing_attribute_falls_back_to_base_value() {
    let mut form = lenient_form(&description_schema(Some("Any value works.")));
    assert_eq!(form.fields()[1].attribute("description"), Some(&json!("Any value works.")));

    form.validate(&json!({ "is_full_time": "yes", "hours": 4 })).unwrap();
    assert_eq!(
        form.fields()[1].attribute("description"),
        Some(&json!("We recommend 8 hours."))
    );

    form.validate(&json!({ "is_full_time": "no", "hours": 4 })).unwrap();
    assert_eq!(form.fields()[1].attribute("description"), Some(&json!("Any value works.")));

    form.validate(&json!({ "is_full_time": "yes", "hours": 8 })).unwrap();
    assert_eq!(
        form.fields()[1].attribute("description"),
        Some(&json!("We recommend 8 hours."))
    );
    // base is never touched
    assert_eq!(
        form.fields()[1].base_attributes().get("description"),
        Some(&json!("Any value works."))
    );
}

#[test]
fn nested_presentation_key_merges_without_erasing_siblings() {
    let schema = json!({
        "properties": {
            "is_full_time": yes_no(),
            "hours": {
                "type": "number",
                "presentation": { "inputType": "number", "anything": "info", "hint": "per day" }
            }
        },
        "allOf": [{
            "if": { "properties": { "is_full_time": { "const": "yes" } }, "required": ["is_full_time"] },
            "then": { "properties": { "hours": { "presentation": { "anything": "danger" } } } }
        }]
    });
    let mut form = lenient_form(&schema);
    assert_eq!(form.fields()[1].attribute("anything"), Some(&json!("info")));

    form.validate(&json!({ "is_full_time": "yes" })).unwrap();
    assert_eq!(form.fields()[1].attribute("anything"), Some(&json!("danger")));
    assert_eq!(form.fields()[1].attribute("hint"), Some(&json!("per day")));

    form.validate(&json!({ "is_full_time": "no" })).unwrap();
    assert_eq!(form.fields()[1].attribute("anything"), Some(&json!("info")));

    form.validate(&json!({ "is_full_time": "yes" })).unwrap();
    assert_eq!(form.fields()[1].attribute("anything"), Some(&json!("danger")));
}

#[test]
fn generic_nested_attribute_group_merges_key_by_key() {
    let schema = json!({
        "properties": {
            "is_full_time": yes_no(),
            "hours": { "type": "number", "x-meta": { "tone": "neutral", "icon": "clock" } }
        },
        "allOf": [{
            "if": { "properties": { "is_full_time": { "const": "yes" } }, "required": ["is_full_time"] },
            "then": { "properties": { "hours": { "x-meta": { "tone": "warning" } } } }
        }]
    });
    let mut form = lenient_form(&schema);
    form.validate(&json!({ "is_full_time": "yes" })).unwrap();
    assert_eq!(
        form.fields()[1].attribute("x-meta"),
        Some(&json!({ "tone": "warning", "icon": "clock" }))
    );
}

#[test]
fn hidden_field_keeps_base_attributes() {
    let schema = json!({
        "properties": {
            "is_full_time": yes_no(),
            "hours": { "type": "number", "description": "Any value works." }
        },
        "allOf": [{
            "if": { "properties": { "is_full_time": { "const": "yes" } }, "required": ["is_full_time"] },
            "then": { "required": ["hours"] },
            "else": { "properties": { "hours": false } }
        }]
    });
    let mut form = lenient_form(&schema);
    assert_eq!(form.fields()[1].attribute("description"), Some(&json!("Any value works.")));
    assert!(!form.fields()[1].is_visible());

    let result = form.validate(&json!({ "is_full_time": "yes" })).unwrap();
    assert_eq!(result.form_errors, Some(errors(&[("hours", "Required field")])));
    assert_eq!(form.fields()[1].attribute("description"), Some(&json!("Any value works.")));
    assert!(form.fields()[1].is_visible());

    let result = form.validate(&json!({ "is_full_time": "no" })).unwrap();
    assert_eq!(result.form_errors, None);
    assert_eq!(form.fields()[1].attribute("description"), Some(&json!("Any value works.")));
    assert!(!form.fields()[1].is_visible());
}

fn salary_period_schema() -> Value {
    json!({
        "properties": {
            "is_full_time": yes_no(),
            "salary_period": {
                "type": "string",
                "title": "Salary period",
                "oneOf": [
                    { "title": "Weekly", "const": "weekly" },
                    { "title": "Monthly", "const": "monthly" }
                ]
            }
        },
        "allOf": [{
            "if": { "properties": { "is_full_time": { "const": "yes" } }, "required": ["is_full_time"] },
            "then": {
                "properties": {
                    "salary_period": {
                        "description": "We recommend montlhy.",
                        "type": "number",
                        "x-jsf-presentation": { "inputType": "text" }
                    }
                }
            }
        }]
    })
}

#[test]
fn internal_slots_survive_conditionals() {
    let mut form = lenient_form(&salary_period_schema());
    form.validate(&json!({ "is_full_time": "yes" })).unwrap();

    let field = &form.fields()[1];
    assert_eq!(field.name(), "salary_period");
    assert_eq!(field.label(), Some("Salary period"));
    assert!(!field.required());
    assert!(field.is_visible());
    assert_eq!(field.input_type().as_str(), "radio");
    assert_eq!(field.json_type(), jsf::enums::JsonType::String);
    assert_eq!(field.attribute("description"), Some(&json!("We recommend montlhy.")));
    assert_eq!(field.attribute("type"), None);
    assert_eq!(field.attribute("inputType"), None);

    let options: Vec<(&str, &Value)> = field
        .options()
        .iter()
        .map(|o| (o.label.as_str(), &o.value))
        .collect();
    assert_eq!(
        options,
        vec![("Weekly", &json!("weekly")), ("Monthly", &json!("monthly"))]
    );
    assert!(field.schema().get("oneOf").is_some());
}

#[test]
fn custom_properties_are_kept_across_cycles() {
    let options = FormOptions::default()
        .with_strict_input_type(false)
        .with_custom_property("salary_period", "Component", json!("<A React Component>"))
        .with_custom_property(
            "salary_period",
            "calculateDynamicProperties",
            ExternalAttribute::capability(|_, _| json!(true)),
        );
    let mut form = jsf::HeadlessForm::build(&salary_period_schema(), options).unwrap();

    let check = |form: &jsf::HeadlessForm| {
        let external = form.fields()[1].external();
        assert_eq!(
            external.get("Component").and_then(ExternalAttribute::as_data),
            Some(&json!("<A React Component>"))
        );
        assert!(external["calculateDynamicProperties"].is_capability());
    };

    check(&form);
    form.validate(&json!({ "is_full_time": "yes" })).unwrap();
    check(&form);
    form.validate(&json!({ "is_full_time": "no" })).unwrap();
    check(&form);

    assert!(form.fields()[1].external().get("visibilityCondition").is_none());
    form.external_mut("salary_period").unwrap().insert(
        "visibilityCondition".to_string(),
        ExternalAttribute::capability(|_, _| json!(false)),
    );
    form.validate(&json!({ "is_full_time": "no" })).unwrap();
    assert!(form.fields()[1].external()["visibilityCondition"].is_capability());
    check(&form);
}

#[test]
fn capabilities_are_invoked_on_request() {
    let options = FormOptions::default()
        .with_strict_input_type(false)
        .with_custom_property(
            "salary_period",
            "calculateDynamicProperties",
            ExternalAttribute::capability(|field, values| {
                json!({ "field": field.name(), "full_time": values["is_full_time"] })
            }),
        )
        .with_custom_property("salary_period", "Component", json!("Select"));
    let form = jsf::HeadlessForm::build(&salary_period_schema(), options).unwrap();

    let values = json!({ "is_full_time": "yes" });
    assert_eq!(
        form.evaluate_capability("salary_period", "calculateDynamicProperties", &values),
        Some(json!({ "field": "salary_period", "full_time": "yes" }))
    );
    assert_eq!(form.evaluate_capability("salary_period", "Component", &values), None);
    assert_eq!(form.evaluate_capability("salary_period", "missing", &values), None);
    assert_eq!(form.evaluate_capability("nope", "Component", &values), None);
}
