//! Final `is_visible` / `required` computation for a cycle.

use crate::branch::BranchDelta;
use crate::primitives::ancestor_paths;
use crate::types::FieldDescriptor;
use std::collections::BTreeSet;

/// Sets visibility and required-ness of every field from the active deltas.
///
/// A field is hidden when it, or any object field enclosing it, is named by
/// an active visibility override. A hidden field is never required; a
/// visible one is required when the base schema or any active branch says so.
pub fn finalize(fields: &mut [FieldDescriptor], deltas: &[BranchDelta]) {
    let hidden: BTreeSet<&str> = deltas
        .iter()
        .flat_map(|d| d.visibility_overrides.iter().map(String::as_str))
        .collect();
    let votes: BTreeSet<&str> = deltas
        .iter()
        .flat_map(|d| d.required_votes.iter().map(String::as_str))
        .collect();

    for field in fields.iter_mut() {
        let name = field.name.as_str();
        let visible =
            !hidden.contains(name) && !ancestor_paths(name).any(|a| hidden.contains(a));
        field.is_visible = visible;
        field.required = visible && (field.base_required || votes.contains(name));
    }
}
