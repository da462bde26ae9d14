//! # Interval Transducer
//!
//! Turns accepted modifiers into the final role → semitone map.
//!
//! ## Pipeline
//! 1. Start from `{root: 0}`. When no quality or suspension was accepted,
//!    the table's default quality is applied silently (`maj`, giving
//!    `third: 4, fifth: 7`). A table without a default falls back to the
//!    major triad.
//! 2. Stable-sort modifiers by priority, so equal-priority alterations keep
//!    the order they were written in.
//! 3. Fold each modifier's operations over the map:
//!
//! | Operation        | Effect                                                      |
//! |------------------|-------------------------------------------------------------|
//! | `replace(r, v)`  | backfill missing earlier roles with defaults, then `r = v`  |
//! | `modify(r, Δ)`   | seed `r` with its default if absent, then `r += Δ`          |
//! | `add(r, v)`      | `r = v`, no backfill (`add9` does not imply a seventh)      |
//! | `remove(r)`      | delete `r` if present                                       |
//!
//! Values are kept uncompressed (ninth = 14); only the formatter reduces
//! them modulo 12.
//!
//! ## Example
//! ```rust
//! use aura_core::{parse_chord, Role};
//!
//! let chord = parse_chord("C13").unwrap();
//! assert_eq!(chord.intervals.get(Role::Thirteenth), Some(21));
//! assert_eq!(chord.intervals.get(Role::Eleventh), None);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use crate::error::ChordError;
use crate::rules::{Operation, Role, RuleTable};
use crate::tokenizer::Token;

/// Sparse role → semitone map, iterated in canonical role order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct IntervalState(BTreeMap<Role, i32>);

impl IntervalState {
    /// `{root: 0}`
    pub fn root_only() -> Self {
        let mut map = BTreeMap::new();
        map.insert(Role::Root, 0);
        IntervalState(map)
    }

    /// `{root: 0, third: 4, fifth: 7}`
    pub fn major_triad() -> Self {
        let mut state = IntervalState::root_only();
        state.0.insert(Role::Third, 4);
        state.0.insert(Role::Fifth, 7);
        state
    }

    pub fn get(&self, role: Role) -> Option<i32> {
        self.0.get(&role).copied()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains_key(&role)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, i32)> + '_ {
        self.0.iter().map(|(role, value)| (*role, *value))
    }

    /// Raw semitone values, root to highest role.
    pub fn semitones(&self) -> Vec<i32> {
        self.0.values().copied().collect()
    }

    /// Apply one primitive operation, returning the roles it had to backfill.
    pub fn apply(&mut self, operation: &Operation) -> Vec<Role> {
        let mut backfilled = Vec::new();
        match *operation {
            Operation::Replace { role, value } => {
                for earlier in role.predecessors() {
                    if !self.contains(earlier) {
                        self.0.insert(earlier, earlier.default_semitones());
                        backfilled.push(earlier);
                    }
                }
                self.0.insert(role, value);
            }
            Operation::Modify { role, value } => {
                let current = self.get(role).unwrap_or_else(|| role.default_semitones());
                self.0.insert(role, current + value);
            }
            Operation::Add { role, value } => {
                self.0.insert(role, value);
            }
            Operation::Remove { role } => {
                self.0.remove(&role);
            }
        }
        backfilled
    }
}

impl FromIterator<(Role, i32)> for IntervalState {
    fn from_iter<I: IntoIterator<Item = (Role, i32)>>(iter: I) -> Self {
        IntervalState(iter.into_iter().collect())
    }
}

/// One operation as it was applied, with the role's value before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedOperation {
    /// Alias of the modifier that contributed the operation.
    pub modifier: String,
    pub operation: Operation,
    pub before: Option<i32>,
    pub after: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub backfilled: Vec<Role>,
}

/// Output of the transducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transduction {
    pub intervals: IntervalState,
    pub operations: Vec<AppliedOperation>,
}

/// Interval map for a chord that names no quality.
fn implicit_quality(table: &RuleTable) -> IntervalState {
    match table.default_rule() {
        Some(rule) => {
            let mut intervals = IntervalState::root_only();
            for operation in &rule.operations {
                intervals.apply(operation);
            }
            intervals
        }
        None => IntervalState::major_triad(),
    }
}

/// Fold the accepted modifiers' operations into an interval map.
pub fn transduce(table: &RuleTable, modifiers: &[Token]) -> Result<Transduction, ChordError> {
    let mut ordered = Vec::with_capacity(modifiers.len());
    for token in modifiers {
        let rule = table.get(token.rule).ok_or_else(|| ChordError::RuleTable {
            rule: token.alias.clone(),
            message: format!("token refers to missing rule #{}", token.rule),
        })?;
        ordered.push((token, rule));
    }

    let has_quality = ordered.iter().any(|(_, rule)| rule.category.is_quality_class());
    let mut intervals = if has_quality {
        IntervalState::root_only()
    } else {
        implicit_quality(table)
    };

    // `sort_by_key` is stable: equal priorities keep input order.
    ordered.sort_by_key(|(_, rule)| rule.priority);

    let mut operations = Vec::new();
    for (token, rule) in ordered {
        for operation in &rule.operations {
            let role = operation.role();
            let before = intervals.get(role);
            let backfilled = intervals.apply(operation);
            let after = intervals.get(role);
            trace!(
                modifier = %token.alias,
                operation = %operation,
                ?before,
                ?after,
                "applied operation"
            );
            operations.push(AppliedOperation {
                modifier: token.alias.clone(),
                operation: *operation,
                before,
                after,
                backfilled,
            });
        }
    }

    Ok(Transduction {
        intervals,
        operations,
    })
}
