#![no_main]

use jsf::{FormOptions, HeadlessForm};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let schema = match jsf::parse(&s) {
        Ok(v) => v,
        Err(_) => return,
    };

    let options = FormOptions::default().with_strict_input_type(false);
    let mut form = match HeadlessForm::build(&schema, options) {
        Ok(f) => f,
        Err(_) => return,
    };

    // Any buildable schema must survive a validation cycle and serialize.
    let _ = form.validate(&json!({}));
    let _ = jsf::serialize_fields(form.fields());
});
