#![no_main]

use jsf::{FormOptions, HeadlessForm};
use libfuzzer_sys::fuzz_target;
use serde_json::{Value, json};

fn schema() -> Value {
    json!({
        "properties": {
            "has_pet": { "type": "string", "oneOf": [{ "const": "yes" }, { "const": "no" }] },
            "pet_age": { "type": "integer", "minimum": 0 },
            "dietary_needs": { "type": "string", "maxLength": 20, "pattern": "^[a-z ]*$" },
            "address": {
                "type": "object",
                "properties": { "city": { "type": "string" } }
            }
        },
        "required": ["has_pet"],
        "allOf": [
            {
                "if": { "properties": { "has_pet": { "const": "yes" } }, "required": ["has_pet"] },
                "then": { "required": ["pet_age"] },
                "else": { "properties": { "pet_age": false, "dietary_needs": false } }
            },
            {
                "if": { "properties": { "pet_age": { "minimum": 5 } }, "required": ["pet_age"] },
                "then": { "required": ["dietary_needs"], "properties": { "address": { "required": ["city"] } } },
                "else": { "properties": { "dietary_needs": false } }
            }
        ]
    })
}

fuzz_target!(|data: &[u8]| {
    let values: Value = match serde_json::from_slice(data) {
        Ok(v) => v,
        Err(_) => return,
    };

    let options = FormOptions::default().with_strict_input_type(false);
    let Ok(mut form) = HeadlessForm::build(&schema(), options) else {
        return;
    };

    let single = form.validate(&values).map(|v| v.form_errors);
    let again = form.validate(&values).map(|v| v.form_errors);
    assert_eq!(single, again, "validation must be idempotent");

    let _ = form.validate_to_fixed_point(&values);
});
