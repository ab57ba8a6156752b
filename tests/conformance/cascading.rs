use super::common::*;
use serde_json::json;

// ─── Scenario C: two chained rules ─────────────────────────────────────────

#[test]
fn pet_fields_progress_with_answers() {
    let mut form = lenient_form(&pets_schema());

    let result = form.validate(&json!({})).unwrap();
    assert_eq!(result.form_errors, Some(errors(&[("has_pet", "Required field")])));
    assert_eq!(
        visibility_table(&form),
        vec![
            "has_pet: true",
            "pet_name: false",
            "pet_age: false",
            "dietary_needs: false"
        ]
    );

    let result = form.validate(&json!({ "has_pet": "yes", "pet_name": "Woofy" })).unwrap();
    assert_eq!(result.form_errors, Some(errors(&[("pet_age", "Required field")])));
    assert_eq!(
        visibility_table(&form),
        vec![
            "has_pet: true",
            "pet_name: true",
            "pet_age: true",
            "dietary_needs: false"
        ]
    );

    let result = form
        .validate(&json!({ "has_pet": "yes", "pet_name": "Woofy", "pet_age": 6 }))
        .unwrap();
    assert_eq!(result.form_errors, Some(errors(&[("dietary_needs", "Required field")])));
    assert_eq!(
        visibility_table(&form),
        vec![
            "has_pet: true",
            "pet_name: true",
            "pet_age: true",
            "dietary_needs: true"
        ]
    );
}

#[test]
fn required_moves_along_the_chain() {
    let mut form = lenient_form(&pets_schema());
    fn required(form: &jsf::HeadlessForm) -> Vec<&str> {
        form.fields()
            .iter()
            .filter(|f| f.required())
            .map(|f| f.name())
            .collect()
    }

    form.validate(&json!({})).unwrap();
    assert_eq!(required(&form), vec!["has_pet"]);

    form.validate(&json!({ "has_pet": "yes", "pet_name": "Woofy" })).unwrap();
    assert_eq!(required(&form), vec!["has_pet", "pet_name", "pet_age"]);

    form.validate(&json!({ "has_pet": "yes", "pet_name": "Woofy", "pet_age": 6 }))
        .unwrap();
    assert_eq!(
        required(&form),
        vec!["has_pet", "pet_name", "pet_age", "dietary_needs"]
    );
}

#[test]
fn switching_back_hides_everything_in_one_cycle() {
    let mut form = lenient_form(&pets_schema());
    form.validate(&json!({ "has_pet": "yes", "pet_name": "Woofy", "pet_age": 6 }))
        .unwrap();

    // pet_age still satisfies the second rule, but the first rule hides
    // dietary_needs and a hidden field is never required.
    let result = form
        .validate(&json!({ "has_pet": "no", "pet_name": "Woofy", "pet_age": 6 }))
        .unwrap();
    assert_eq!(result.matched, vec![false, true]);
    assert_eq!(result.form_errors, None);
    assert_eq!(
        visibility_table(&form),
        vec![
            "has_pet: true",
            "pet_name: false",
            "pet_age: false",
            "dietary_needs: false"
        ]
    );
    assert!(form.fields().iter().filter(|f| !f.is_visible()).all(|f| !f.required()));
}

#[test]
fn stricter_second_condition_settles_in_one_cycle() {
    let mut schema = pets_schema();
    schema["allOf"][1]["if"] = json!({
        "properties": { "has_pet": { "const": "yes" }, "pet_age": { "minimum": 5 } },
        "required": ["has_pet", "pet_age"]
    });
    let mut form = lenient_form(&schema);

    form.validate(&json!({ "has_pet": "yes", "pet_name": "Woofy", "pet_age": 6 }))
        .unwrap();
    let result = form
        .validate(&json!({ "has_pet": "no", "pet_name": "Woofy", "pet_age": 6 }))
        .unwrap();
    assert_eq!(result.matched, vec![false, false]);
    assert_eq!(result.form_errors, None);
    assert_eq!(
        visibility_table(&form),
        vec![
            "has_pet: true",
            "pet_name: false",
            "pet_age: false",
            "dietary_needs: false"
        ]
    );
}

#[test]
fn changed_lists_only_fields_that_moved() {
    let mut form = lenient_form(&pets_schema());
    let result = form.validate(&json!({ "has_pet": "yes" })).unwrap();
    assert_eq!(result.changed, vec!["pet_name", "pet_age"]);

    let result = form.validate(&json!({ "has_pet": "yes" })).unwrap();
    assert!(result.changed.is_empty());

    let result = form.validate(&json!({ "has_pet": "yes", "pet_age": 9 })).unwrap();
    assert_eq!(result.changed, vec!["dietary_needs"]);
}
