//! # Error Types
//!
//! This module defines all error types for the chord symbol engine.
//!
//! Every error is terminal for the parse that produced it: the engine never
//! returns a partial chord. Each variant carries the offending substring or
//! symbol so callers can render a message without re-parsing.
//!
//! ## Error Types
//! - `InvalidRoot` - input does not start with a note letter A-G
//! - `UnrecognizedModifier` - no alias matches at the current position
//! - `ConflictingQuality` - a second quality/suspension modifier
//! - `ConflictingRole` - two modifiers edit the same role incompatibly
//! - `ExcludedCombination` - a declared category exclusion fired
//! - `MissingRequirement` - a prerequisite modifier/category is absent
//! - `UnknownInterval` - formatter invariant violation (rule table defect)
//! - `RuleTable` - a loaded rule table is malformed
//!
//! ## Usage
//! ```rust
//! use aura_core::{parse_chord, ChordError, Role};
//!
//! match parse_chord("C7b5#5") {
//!     Err(ChordError::ConflictingRole { role, .. }) => assert_eq!(role, Role::Fifth),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use thiserror::Error;

use crate::rules::{Category, Requirement, Role};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChordError {
    /// The input does not begin with a root note.
    ///
    /// # Example
    /// ```
    /// # use aura_core::ChordError;
    /// let err = ChordError::InvalidRoot { input: "Hm7".to_string() };
    /// assert_eq!(err.to_string(), "Invalid root in 'Hm7': expected a note letter A-G");
    /// ```
    #[error("Invalid root in '{input}': expected a note letter A-G")]
    InvalidRoot { input: String },

    /// No modifier alias matches the front of the remaining suffix.
    ///
    /// # Example
    /// ```
    /// # use aura_core::ChordError;
    /// let err = ChordError::UnrecognizedModifier { remainder: "sus3".to_string() };
    /// assert_eq!(err.to_string(), "Unrecognized modifier at 'sus3'");
    /// ```
    #[error("Unrecognized modifier at '{remainder}'")]
    UnrecognizedModifier { remainder: String },

    /// A quality or suspension was supplied when one is already present.
    #[error("Cannot combine '{symbol}' with existing quality '{existing}'")]
    ConflictingQuality { symbol: String, existing: String },

    /// Two modifiers target the same role in incompatible ways.
    #[error("Conflicting modifiers for {role}: '{symbol}' and '{existing}'")]
    ConflictingRole {
        role: Role,
        symbol: String,
        existing: String,
    },

    /// A rule's `excludes` list names a category already present.
    ///
    /// # Example
    /// ```
    /// # use aura_core::{ChordError, Category};
    /// let err = ChordError::ExcludedCombination {
    ///     symbol: "5".to_string(),
    ///     category: Category::Extension,
    /// };
    /// assert_eq!(err.to_string(), "'5' cannot be combined with extension modifiers");
    /// ```
    #[error("'{symbol}' cannot be combined with {category} modifiers")]
    ExcludedCombination { symbol: String, category: Category },

    /// A required companion modifier or category is absent.
    #[error("'{symbol}' requires {requirement} to be present")]
    MissingRequirement {
        symbol: String,
        requirement: Requirement,
    },

    /// A reduced semitone value has no interval name.
    ///
    /// Indicates a rule table authoring defect rather than bad user input.
    #[error("No interval name for {semitones} semitones ({role})")]
    UnknownInterval { role: Role, semitones: i32 },

    /// A loaded rule table is malformed.
    #[error("Invalid rule table entry '{rule}': {message}")]
    RuleTable { rule: String, message: String },
}
