#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use jsf::condition::matches;
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

const KEYWORDS: &[&str] = &[
    "required",
    "properties",
    "const",
    "enum",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "pattern",
    "type",
    "not",
    "allOf",
    "anyOf",
    "oneOf",
];

/// Generate a JSON value of bounded depth from fuzzer bytes.
fn arbitrary_value(u: &mut Unstructured<'_>, depth: u32) -> arbitrary::Result<Value> {
    let max = if depth == 0 { 3 } else { 5 };
    match u.int_in_range(0..=max)? {
        0 => Ok(Value::Null),
        1 => Ok(Value::Bool(bool::arbitrary(u)?)),
        2 => {
            let n = f64::arbitrary(u)?;
            Ok(serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null))
        }
        3 => Ok(Value::String(String::arbitrary(u)?)),
        4 => {
            let len = u.int_in_range(0..=3)?;
            (0..len)
                .map(|_| arbitrary_value(u, depth - 1))
                .collect::<arbitrary::Result<Vec<_>>>()
                .map(Value::Array)
        }
        _ => {
            let len = u.int_in_range(0..=3)?;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(u)?, arbitrary_value(u, depth - 1)?);
            }
            Ok(Value::Object(map))
        }
    }
}

/// Generate a predicate built from known keywords with arbitrary arguments.
fn arbitrary_predicate(u: &mut Unstructured<'_>, depth: u32) -> arbitrary::Result<Value> {
    let len = u.int_in_range(0..=4)?;
    let mut map = Map::new();
    for _ in 0..len {
        let keyword = *u.choose(KEYWORDS)?;
        let argument = if depth > 0 && bool::arbitrary(u)? {
            arbitrary_predicate(u, depth - 1)?
        } else {
            arbitrary_value(u, 2)?
        };
        map.insert(keyword.to_string(), argument);
    }
    Ok(Value::Object(map))
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);

    let predicate = match arbitrary_predicate(&mut u, 3) {
        Ok(p) => p,
        Err(_) => return,
    };

    let value = match arbitrary_value(&mut u, 3) {
        Ok(v) => v,
        Err(_) => return,
    };

    let _ = matches(&predicate, &value);
});
