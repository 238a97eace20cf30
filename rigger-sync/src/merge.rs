//! Merge rules combining present and expected state.
//!
//! - Lists: union, preserving order. Present items stay where they are and
//!   missing expected items are appended. Nothing is removed.
//! - Maps: overlay. Expected keys are set, nested objects merged recursively,
//!   keys only present on disk are kept.
//! - Replace: the expected state wins outright.
//! - Existence only: content belongs to the user; only an absent artifact is
//!   created.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::state::State;

/// How an entity combines present and expected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    Union,
    Overlay,
    Replace,
    ExistenceOnly,
}

impl MergePolicy {
    /// Target state for `present` given `expected`.
    pub fn merge(self, present: &State, expected: &State) -> State {
        match (self, present) {
            (_, State::Absent) => expected.clone(),
            (MergePolicy::ExistenceOnly, _) => present.clone(),
            (MergePolicy::Replace, _) => expected.clone(),
            (MergePolicy::Union, State::List(have)) => match expected {
                State::List(want) => State::List(union(have, want)),
                other => other.clone(),
            },
            (MergePolicy::Overlay, State::Map(have)) => match expected {
                State::Map(want) => State::Map(overlay(have.clone(), want)),
                other => other.clone(),
            },
            (_, _) => expected.clone(),
        }
    }
}

/// `present` followed by every item of `expected` not already in `present`.
///
/// Duplicates inside `expected` (blank separator lines, repeated comments)
/// are kept so a fresh artifact mirrors its template exactly.
pub fn union(present: &[String], expected: &[String]) -> Vec<String> {
    let seen: HashSet<&str> = present.iter().map(String::as_str).collect();
    let mut merged = present.to_vec();
    merged.extend(
        expected
            .iter()
            .filter(|item| !seen.contains(item.as_str()))
            .cloned(),
    );
    merged
}

/// Deep merge `expected` onto `present`.
pub fn overlay(mut present: Map<String, Value>, expected: &Map<String, Value>) -> Map<String, Value> {
    for (key, want) in expected {
        let merged = match (present.remove(key), want) {
            (Some(Value::Object(have)), Value::Object(want)) => Value::Object(overlay(have, want)),
            _ => want.clone(),
        };
        present.insert(key.clone(), merged);
    }
    present
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
