//! The per-cycle resolution pipeline.
//!
//! ```text
//! rules × values → BranchOutcome per rule → merge::apply → visibility::finalize
//! ```
//!
//! A cycle only reads the rules and the snapshot and only writes the live
//! state of the fields (live attributes, `required`, `is_visible`). Every
//! cycle runs to completion; there is no failure path.

use crate::branch::{self, BranchDelta};
use crate::merge;
use crate::primitives::remove_path;
use crate::rules::ConditionalRule;
use crate::types::FieldDescriptor;
use crate::visibility;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Outcome of one resolution cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    /// Per rule, in declaration order: whether `then` was selected.
    pub matched: Vec<bool>,
    /// Names, in field order, of fields whose live state changed.
    pub changed: Vec<String>,
}

/// Runs a single cycle over `fields` for the given snapshot.
pub fn resolve(
    fields: &mut [FieldDescriptor],
    rules: &[ConditionalRule],
    values: &Value,
) -> Resolution {
    let before = snapshot(fields);

    let mut matched = Vec::with_capacity(rules.len());
    let mut deltas: Vec<BranchDelta> = Vec::with_capacity(rules.len());
    for rule in rules {
        let outcome = branch::resolve(rule, values);
        matched.push(outcome.matched);
        deltas.push(outcome.delta);
    }

    merge::apply(fields, &deltas);
    visibility::finalize(fields, &deltas);

    let changed = diff(&before, fields);
    trace!(changed = ?changed, "resolution cycle complete");

    Resolution { matched, changed }
}

/// Repeats cycles until the field state stops changing.
///
/// Before each cycle, values of fields that are invisible at that point are
/// dropped from the snapshot, so a value hidden by one rule can no longer
/// drive another. Stops after `max_iterations` cycles even when still
/// changing. Returns the resolution (with `changed` covering all cycles)
/// and the trimmed snapshot the last cycle saw.
pub fn resolve_to_fixed_point(
    fields: &mut [FieldDescriptor],
    rules: &[ConditionalRule],
    values: &Value,
    max_iterations: usize,
) -> (Resolution, Value) {
    let before = snapshot(fields);
    let mut trimmed = trim_invisible(fields, values);
    let mut resolution = resolve(fields, rules, &trimmed);
    let mut iterations = 1;

    while !resolution.changed.is_empty() && iterations < max_iterations {
        trimmed = trim_invisible(fields, values);
        resolution = resolve(fields, rules, &trimmed);
        iterations += 1;
    }

    if !resolution.changed.is_empty() {
        debug!(iterations, "fixed point not reached within iteration cap");
    }

    resolution.changed = diff(&before, fields);
    (resolution, trimmed)
}

/// Copy of `values` without the entries of currently invisible fields.
pub fn trim_invisible(fields: &[FieldDescriptor], values: &Value) -> Value {
    let mut trimmed = values.clone();
    for field in fields.iter().filter(|f| !f.is_visible) {
        remove_path(&field.name, &mut trimmed);
    }
    trimmed
}

type FieldState = (Map<String, Value>, bool, bool);

fn snapshot(fields: &[FieldDescriptor]) -> Vec<FieldState> {
    fields
        .iter()
        .map(|f| (f.live_attributes.clone(), f.required, f.is_visible))
        .collect()
}

fn diff(before: &[FieldState], fields: &[FieldDescriptor]) -> Vec<String> {
    fields
        .iter()
        .zip(before)
        .filter(|(f, (live, required, visible))| {
            f.live_attributes != *live || f.required != *required || f.is_visible != *visible
        })
        .map(|(f, _)| f.name.clone())
        .collect()
}
