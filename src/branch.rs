//! Branch selection and delta extraction for a single conditional rule.

use crate::merge::{extract_attributes, merge_attributes};
use crate::rules::ConditionalRule;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// What a selected branch contributes to the fields this cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BranchDelta {
    /// Field name → attributes to overlay on the base attributes.
    pub attribute_patches: BTreeMap<String, Map<String, Value>>,
    /// Fields forced invisible through a `false` property schema.
    pub visibility_overrides: BTreeSet<String>,
    /// Fields the branch's `required` lists name.
    pub required_votes: BTreeSet<String>,
}

/// Result of resolving one rule against a snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct BranchOutcome {
    /// Whether the rule's `if` matched, i.e. `then` was selected.
    pub matched: bool,
    pub delta: BranchDelta,
}

/// Evaluates the rule's predicate and extracts the selected fragment's delta.
///
/// A missing `then`/`else` for the selected side yields an empty delta.
pub fn resolve(rule: &ConditionalRule, values: &Value) -> BranchOutcome {
    let matched = rule.predicate.matches(values);
    let fragment = if matched {
        rule.then_fragment.as_ref()
    } else {
        rule.else_fragment.as_ref()
    };

    debug!(
        rule = %rule.path,
        branch = if matched { "then" } else { "else" },
        "selected branch"
    );

    let mut delta = BranchDelta::default();
    if let Some(fragment) = fragment {
        collect_fragment(fragment, "", &mut delta);
    }

    BranchOutcome { matched, delta }
}

/// Walks a fragment, addressing nested properties by dotted path.
fn collect_fragment(fragment: &Value, prefix: &str, delta: &mut BranchDelta) {
    let Some(obj) = fragment.as_object() else {
        return;
    };

    if let Some(names) = obj.get("required").and_then(Value::as_array) {
        for name in names.iter().filter_map(Value::as_str) {
            delta.required_votes.insert(join(prefix, name));
        }
    }

    let Some(properties) = obj.get("properties").and_then(Value::as_object) else {
        return;
    };

    for (name, entry) in properties {
        let path = join(prefix, name);
        match entry {
            Value::Bool(false) => {
                delta.visibility_overrides.insert(path);
            }
            Value::Object(schema) => {
                let patch = extract_attributes(schema);
                if !patch.is_empty() {
                    merge_attributes(delta.attribute_patches.entry(path.clone()).or_default(), &patch);
                }
                collect_fragment(entry, &path, delta);
            }
            _ => {}
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
