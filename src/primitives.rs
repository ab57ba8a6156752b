//! Value-tree primitives shared by condition evaluation, resolution and
//! validation.

use serde_json::Value;

// ─── Path resolution ────────────────────────────────────────────────────────

/// Resolves a dotted field path against a value tree.
///
/// Returns the value at the path, or `None` if any segment fails to resolve.
/// Empty path returns the root value.
pub fn resolve_simple_path<'a>(path: &str, value: &'a Value) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Removes the value at a dotted path, if present. Returns whether anything
/// was removed.
pub fn remove_path(path: &str, value: &mut Value) -> bool {
    let (parent, leaf) = match path.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, path),
    };

    let mut current = value;
    if let Some(parent) = parent {
        for segment in parent.split('.') {
            current = match current.as_object_mut().and_then(|o| o.get_mut(segment)) {
                Some(v) => v,
                None => return false,
            };
        }
    }

    match current.as_object_mut() {
        Some(obj) => obj.shift_remove(leaf).is_some(),
        None => false,
    }
}

/// Every proper ancestor path of a dotted name, outermost first.
///
/// `a.b.c` yields `a`, `a.b`.
pub fn ancestor_paths(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('.').map(move |(i, _)| &path[..i])
}

// ─── Comparison ─────────────────────────────────────────────────────────────

/// Deep equality comparison.
///
/// Integer 8 equals float 8.0; object key order is irrelevant;
/// arrays compare element-wise by position and length.
pub fn values_deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(fa), Some(fb)) => fa == fb,
            _ => a == b,
        },
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| values_deep_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            if a.len() != b.len() {
                return false;
            }
            a.iter()
                .all(|(k, v)| b.get(k).is_some_and(|bv| values_deep_equal(v, bv)))
        }
        _ => false,
    }
}

/// Renders a value for a human-facing message: strings bare, everything
/// else as JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}
