//! Chord symbol resolution engine.
//!
//! Interprets chord symbols such as `Cm7b5`, `Gsus4add9` or `C13#11` into a
//! root plus a sparse role → semitone map, and from there into interval names.
//!
//! # Example
//!
//! ```
//! use aura_core::{parse_chord, Role};
//!
//! let chord = parse_chord("Cm7b5").unwrap();
//! assert_eq!(chord.root, "C");
//! assert_eq!(chord.modifiers, vec!["m", "7", "b5"]);
//! assert_eq!(chord.intervals.get(Role::Fifth), Some(6));
//! assert_eq!(chord.formatted.names, vec!["P1", "m3", "TT", "m7"]);
//! ```

pub mod engine;
pub mod error;
pub mod format;
pub mod root;
pub mod rules;
pub mod tokenizer;
pub mod transducer;
pub mod validator;

pub use engine::{ChordEngine, ChordResult, NoopObserver, ParseObserver, ParsedChord};
pub use error::ChordError;
pub use format::{format_intervals, interval_name, FormattedChord, DEFAULT_SEPARATOR};
pub use root::{extract_root, root_pitch_class};
pub use rules::{Category, ModifierRule, OpKind, Operation, Requirement, Role, RuleTable};
pub use tokenizer::{Token, Tokenizer};
pub use transducer::{AppliedOperation, IntervalState};

/// Parse a chord symbol with the built-in rule table.
///
/// Slash-bass notation (`/E`) must be stripped by the caller first.
pub fn parse_chord(symbol: &str) -> Result<ChordResult, ChordError> {
    ChordEngine::standard().parse(symbol)
}
