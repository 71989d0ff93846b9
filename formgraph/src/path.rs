//! Weighted progress and path enumeration over the form graph.
//!
//! Pure functions, no state. Two recursive traversals with deliberately
//! different cycle policies: weight calculation prunes a branch the moment a
//! state repeats on it (the pre-cycle prefix still counts), while path
//! enumeration backtracks, so a state may appear on many distinct paths but
//! never twice within one. They stay separate; do not unify them.

use std::collections::{BTreeSet, HashSet};

use crate::schema::{FormContext, Schema};

/// Weight contributed by states the schema does not define.
const DEFAULT_WEIGHT: f64 = 1.0;

/// Maximum achievable weight sum along any single path from `state` to a
/// terminal state, each state counted once. Revisiting a state within one
/// branch contributes 0; sibling branches each explore with their own copy
/// of the visited set. A terminal state returns its own weight, an unknown
/// state the default weight.
pub fn remaining_weight(state: &str, schema: &Schema) -> f64 {
    walk_weight(state, schema, &HashSet::new())
}

fn walk_weight(state: &str, schema: &Schema, visited: &HashSet<String>) -> f64 {
    if visited.contains(state) {
        return 0.0;
    }

    let definition = match schema.states.get(state) {
        Some(definition) => definition,
        None => return DEFAULT_WEIGHT,
    };

    let own = definition.meta.weight;
    if definition.on.is_empty() {
        return own;
    }

    let mut branch_visited = visited.clone();
    branch_visited.insert(state.to_string());

    // walk_weight never mutates its borrowed set, so sharing branch_visited
    // across siblings is equivalent to handing each a fresh copy.
    let max_future = definition
        .on
        .values()
        .map(|transition| walk_weight(&transition.target, schema, &branch_visited))
        .fold(0.0, f64::max);

    own + max_future
}

/// Progress percentage: completed weight over the heaviest path weight from
/// `schema.initial`, times 100. The denominator is recomputed on every call.
/// Returns 0 when the denominator is 0. Always >= 0; may exceed 100 when
/// back-navigation has accumulated weight across multiple branches.
pub fn progress(completed_steps: &BTreeSet<String>, schema: &Schema) -> f64 {
    let total = remaining_weight(&schema.initial, schema);
    if total <= 0.0 {
        return 0.0;
    }

    let completed: f64 = completed_steps
        .iter()
        .map(|step| {
            schema
                .states
                .get(step)
                .map(|definition| definition.meta.weight)
                .unwrap_or(DEFAULT_WEIGHT)
        })
        .sum();

    completed / total * 100.0
}

/// Depth-first enumeration of every terminal-ending simple path from
/// `current`, as ordered state-name sequences including both endpoints.
/// Transitions whose condition rejects `context` are pruned. A path ends at
/// a state with no eligible outgoing transitions (terminal, or every
/// transition pruned). Unknown `current` yields no paths.
pub fn possible_paths(current: &str, schema: &Schema, context: &FormContext) -> Vec<Vec<String>> {
    let mut paths = Vec::new();
    let mut visited = HashSet::new();
    let mut prefix = Vec::new();
    walk_paths(current, schema, context, &mut visited, &mut prefix, &mut paths);
    paths
}

fn walk_paths(
    state: &str,
    schema: &Schema,
    context: &FormContext,
    visited: &mut HashSet<String>,
    prefix: &mut Vec<String>,
    paths: &mut Vec<Vec<String>>,
) {
    if visited.contains(state) {
        return;
    }
    let definition = match schema.states.get(state) {
        Some(definition) => definition,
        None => return,
    };

    prefix.push(state.to_string());

    let eligible: Vec<&str> = definition
        .on
        .values()
        .filter(|transition| {
            transition
                .cond
                .as_ref()
                .map_or(true, |cond| cond(context))
        })
        .map(|transition| transition.target.as_str())
        .collect();

    if eligible.is_empty() {
        paths.push(prefix.clone());
    } else {
        visited.insert(state.to_string());
        for target in eligible {
            walk_paths(target, schema, context, visited, prefix, paths);
        }
        visited.remove(state);
    }

    prefix.pop();
}
