//! Evaluation of `if` predicates against a value snapshot.
//!
//! This is not a full JSON Schema evaluator. It understands the
//! keywords that show up in form conditionals and treats everything else as
//! satisfied. Malformed keyword arguments never fail loudly; they make the
//! predicate a non-match.
//!
//! Predicates are compiled once, when a form's rules are read. Compiling
//! only resolves the `pattern` regexes; evaluation then walks the schema
//! value on every cycle.

use crate::enums::JsonType;
use crate::primitives::values_deep_equal;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Pattern text → compiled regex. Uncompilable patterns are absent.
type Patterns = HashMap<String, Regex>;

/// A predicate schema with its regexes compiled.
#[derive(Clone, Debug)]
pub struct Predicate {
    schema: Value,
    patterns: Patterns,
}

impl Predicate {
    pub fn compile(schema: Value) -> Self {
        let mut patterns = Patterns::new();
        collect_patterns(&schema, &mut patterns);
        Predicate { schema, patterns }
    }

    /// The predicate schema as declared.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Evaluates the predicate against a value.
    ///
    /// At the top level `value` is the whole form snapshot; nested
    /// `properties` recurse into the matching member. All keywords combine
    /// with AND logic.
    pub fn matches(&self, value: &Value) -> bool {
        evaluate(&self.schema, value, &self.patterns)
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema
    }
}

/// One-off evaluation of an uncompiled predicate schema.
pub fn matches(predicate: &Value, value: &Value) -> bool {
    let mut patterns = Patterns::new();
    collect_patterns(predicate, &mut patterns);
    evaluate(predicate, value, &patterns)
}

fn collect_patterns(schema: &Value, patterns: &mut Patterns) {
    match schema {
        Value::Object(keywords) => {
            for (keyword, argument) in keywords {
                if keyword == "pattern"
                    && let Some(pattern) = argument.as_str()
                {
                    if !patterns.contains_key(pattern) {
                        match Regex::new(pattern) {
                            Ok(re) => {
                                patterns.insert(pattern.to_string(), re);
                            }
                            Err(e) => debug!(pattern, error = %e, "invalid pattern in predicate"),
                        }
                    }
                } else {
                    collect_patterns(argument, patterns);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_patterns(item, patterns)),
        _ => {}
    }
}

fn evaluate(predicate: &Value, value: &Value, patterns: &Patterns) -> bool {
    match predicate {
        Value::Bool(b) => *b,
        Value::Object(keywords) => keywords
            .iter()
            .all(|(keyword, argument)| keyword_matches(keyword, argument, value, patterns)),
        other => {
            debug!(predicate = %other, "predicate is neither an object nor a boolean");
            false
        }
    }
}

fn keyword_matches(keyword: &str, argument: &Value, value: &Value, patterns: &Patterns) -> bool {
    match keyword {
        "required" => required_matches(argument, value),
        "properties" => properties_match(argument, value, patterns),
        "const" => values_deep_equal(value, argument),
        "enum" => match argument.as_array() {
            Some(items) => items.iter().any(|item| values_deep_equal(value, item)),
            None => false,
        },
        "minimum" => numeric_bound(argument, value, |v, bound| v >= bound),
        "maximum" => numeric_bound(argument, value, |v, bound| v <= bound),
        "exclusiveMinimum" => numeric_bound(argument, value, |v, bound| v > bound),
        "exclusiveMaximum" => numeric_bound(argument, value, |v, bound| v < bound),
        "minLength" => length_bound(argument, value, |len, bound| len >= bound),
        "maxLength" => length_bound(argument, value, |len, bound| len <= bound),
        "pattern" => pattern_matches(argument, value, patterns),
        "type" => type_matches(argument, value),
        "not" => !evaluate(argument, value, patterns),
        "allOf" => match argument.as_array() {
            Some(items) => items.iter().all(|item| evaluate(item, value, patterns)),
            None => false,
        },
        "anyOf" => match argument.as_array() {
            Some(items) => items.iter().any(|item| evaluate(item, value, patterns)),
            None => false,
        },
        "oneOf" => match argument.as_array() {
            Some(items) => {
                items
                    .iter()
                    .filter(|item| evaluate(item, value, patterns))
                    .count()
                    == 1
            }
            None => false,
        },
        // Annotations and keywords without a runtime meaning here.
        _ => true,
    }
}

/// Every listed name must be present. Only constrains objects.
fn required_matches(argument: &Value, value: &Value) -> bool {
    let Some(names) = argument.as_array() else {
        return false;
    };
    let Some(obj) = value.as_object() else {
        return true;
    };
    names
        .iter()
        .all(|name| name.as_str().is_some_and(|n| obj.contains_key(n)))
}

/// Present members must satisfy their sub-predicate; absent members are
/// governed by `required`, not here.
fn properties_match(argument: &Value, value: &Value, patterns: &Patterns) -> bool {
    let Some(schemas) = argument.as_object() else {
        return false;
    };
    let Some(obj) = value.as_object() else {
        return true;
    };
    schemas.iter().all(|(name, schema)| match obj.get(name) {
        Some(member) => evaluate(schema, member, patterns),
        None => true,
    })
}

fn numeric_bound(argument: &Value, value: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    let Some(bound) = argument.as_f64() else {
        return false;
    };
    match value.as_f64() {
        Some(v) => cmp(v, bound),
        None => true,
    }
}

fn length_bound(argument: &Value, value: &Value, cmp: impl Fn(u64, u64) -> bool) -> bool {
    let Some(bound) = argument.as_u64() else {
        return false;
    };
    match value.as_str() {
        Some(s) => cmp(s.chars().count() as u64, bound),
        None => true,
    }
}

fn pattern_matches(argument: &Value, value: &Value, patterns: &Patterns) -> bool {
    let Some(pattern) = argument.as_str() else {
        return false;
    };
    let Some(text) = value.as_str() else {
        return true;
    };
    patterns.get(pattern).is_some_and(|re| re.is_match(text))
}

fn type_matches(argument: &Value, value: &Value) -> bool {
    let accepts = |name: &Value| {
        name.as_str()
            .and_then(JsonType::from_name)
            .is_some_and(|t| t.accepts(value))
    };
    match argument {
        Value::String(_) => accepts(argument),
        Value::Array(names) => names.iter().any(accepts),
        _ => false,
    }
}
