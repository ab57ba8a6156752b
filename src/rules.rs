//! Extraction of conditional rules from a schema.
//!
//! Rules are read once when a form is built and never change afterwards;
//! each resolution cycle only recomputes which branch of each rule applies.

use crate::condition::Predicate;
use crate::error::Diagnostic;
use serde_json::Value;
use tracing::warn;

/// One `if`/`then`/`else` triple, taken from the root schema or from an
/// `allOf` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalRule {
    /// Where the rule was declared, e.g. `allOf[1]`.
    pub path: String,
    pub predicate: Predicate,
    pub then_fragment: Option<Value>,
    pub else_fragment: Option<Value>,
}

/// Collects every usable conditional rule of `schema`, in declaration order.
///
/// The root-level `if` (if any) comes first, then each `allOf` entry. Entries
/// that cannot form a rule are skipped and reported as warnings.
pub fn parse_rules(schema: &Value) -> (Vec<ConditionalRule>, Vec<Diagnostic>) {
    let mut rules = Vec::new();
    let mut diagnostics = Vec::new();

    if schema.get("if").is_some() {
        push_rule(schema, "(root)".to_string(), &mut rules, &mut diagnostics);
    }

    match schema.get("allOf") {
        Some(Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                push_rule(entry, format!("allOf[{}]", i), &mut rules, &mut diagnostics);
            }
        }
        Some(_) => ignore(
            &mut diagnostics,
            "allOf".to_string(),
            "allOf must be an array of conditional entries",
        ),
        None => {}
    }

    (rules, diagnostics)
}

fn push_rule(
    entry: &Value,
    path: String,
    rules: &mut Vec<ConditionalRule>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(obj) = entry.as_object() else {
        ignore(diagnostics, path, "entry is not an object");
        return;
    };

    let Some(predicate) = obj.get("if") else {
        ignore(diagnostics, path, "entry has no `if`");
        return;
    };

    let then_fragment = obj.get("then").cloned();
    let else_fragment = obj.get("else").cloned();
    if then_fragment.is_none() && else_fragment.is_none() {
        ignore(diagnostics, path, "entry has neither `then` nor `else`");
        return;
    }

    rules.push(ConditionalRule {
        path,
        predicate: Predicate::compile(predicate.clone()),
        then_fragment,
        else_fragment,
    });
}

fn ignore(diagnostics: &mut Vec<Diagnostic>, path: String, reason: &str) {
    warn!(path = %path, reason, "ignoring conditional entry");
    diagnostics.push(Diagnostic::warning("ignored_rule", path, reason));
}
