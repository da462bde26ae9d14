//! # Chord Engine
//!
//! Owns a rule table and its tokenizer and runs the full pipeline:
//!
//! ```text
//! "Cm7b5" ─ root ─▶ ("C", "m7b5") ─ tokenize ─▶ [m, 7, b5]
//!         ─ validate ─▶ ParsedChord ─ transduce ─▶ {root:0, third:3, fifth:6, seventh:10}
//!         ─ format ─▶ P1 m3 TT m7 / "0·3·6·10"
//! ```
//!
//! The table and the tokenizer's pattern list are built once in
//! [`ChordEngine::new`] and only read afterwards, so one engine can serve any
//! number of threads. [`ChordEngine::standard`] is a process-wide engine over
//! the built-in table, initialized on first use.
//!
//! ## Observing a Parse
//! A [`ParseObserver`] receives each step (root, accepted modifiers, applied
//! operations, the result or the error). Observers cannot alter the outcome.

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::debug;

use crate::error::ChordError;
use crate::format::{format_intervals, pitch_classes, FormattedChord, DEFAULT_SEPARATOR};
use crate::root::{extract_root, root_pitch_class};
use crate::rules::{ModifierRule, RuleTable};
use crate::tokenizer::{Token, Tokenizer};
use crate::transducer::{transduce, AppliedOperation, IntervalState};
use crate::validator::Validator;

/// Hooks called while a chord is parsed. All methods default to no-ops.
pub trait ParseObserver {
    fn on_root(&mut self, _root: &str, _suffix: &str) {}
    fn on_modifier(&mut self, _alias: &str, _rule: &ModifierRule) {}
    fn on_operation(&mut self, _applied: &AppliedOperation) {}
    fn on_result(&mut self, _result: &ChordResult) {}
    fn on_error(&mut self, _error: &ChordError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ParseObserver for NoopObserver {}

/// Root plus validated modifiers, in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChord {
    pub root: String,
    pub modifiers: Vec<Token>,
}

impl ParsedChord {
    pub fn aliases(&self) -> Vec<String> {
        self.modifiers.iter().map(|t| t.alias.clone()).collect()
    }
}

/// Everything known about one resolved chord symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordResult {
    pub input: String,
    pub root: String,
    pub modifiers: Vec<String>,
    pub operations: Vec<AppliedOperation>,
    pub intervals: IntervalState,
    pub formatted: FormattedChord,
    pub pitch_classes: Vec<u8>,
}

/// Chord symbol resolution engine.
#[derive(Debug, Clone)]
pub struct ChordEngine {
    table: RuleTable,
    tokenizer: Tokenizer,
    separator: String,
}

impl Default for ChordEngine {
    fn default() -> Self {
        ChordEngine::new(RuleTable::standard())
    }
}

static STANDARD: OnceCell<ChordEngine> = OnceCell::new();

impl ChordEngine {
    pub fn new(table: RuleTable) -> Self {
        let tokenizer = Tokenizer::new(&table);
        ChordEngine {
            table,
            tokenizer,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Use `separator` between semitone values in display strings.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Shared engine over the built-in table.
    pub fn standard() -> &'static ChordEngine {
        STANDARD.get_or_init(ChordEngine::default)
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Root extraction, tokenization and validation, without transduction.
    pub fn resolve(&self, symbol: &str) -> Result<ParsedChord, ChordError> {
        self.resolve_observed(symbol, &mut NoopObserver)
    }

    fn resolve_observed(
        &self,
        symbol: &str,
        observer: &mut dyn ParseObserver,
    ) -> Result<ParsedChord, ChordError> {
        let (root, suffix) = extract_root(symbol)?;
        observer.on_root(root, suffix);

        let mut validator = Validator::new(&self.table);
        for token in self.tokenizer.tokenize(suffix)? {
            if let Some(rule) = self.table.get(token.rule) {
                observer.on_modifier(&token.alias, rule);
            }
            validator.accept(token)?;
        }

        Ok(ParsedChord {
            root: root.to_string(),
            modifiers: validator.finish()?,
        })
    }

    /// Parse a chord symbol (without slash bass) into its full description.
    ///
    /// # Examples
    /// ```
    /// use aura_core::ChordEngine;
    ///
    /// let engine = ChordEngine::standard();
    /// let chord = engine.parse("Gsus4add9").unwrap();
    /// assert_eq!(chord.root, "G");
    /// assert_eq!(chord.modifiers, vec!["sus4", "add9"]);
    /// assert_eq!(chord.formatted.display, "0·5·7·14");
    /// ```
    pub fn parse(&self, symbol: &str) -> Result<ChordResult, ChordError> {
        self.parse_with_observer(symbol, &mut NoopObserver)
    }

    /// Like [`parse`](Self::parse), reporting each step to `observer`.
    pub fn parse_with_observer(
        &self,
        symbol: &str,
        observer: &mut dyn ParseObserver,
    ) -> Result<ChordResult, ChordError> {
        match self.run(symbol, observer) {
            Ok(result) => {
                debug!(input = symbol, display = %result.formatted.display, "chord resolved");
                observer.on_result(&result);
                Ok(result)
            }
            Err(error) => {
                debug!(input = symbol, %error, "chord rejected");
                observer.on_error(&error);
                Err(error)
            }
        }
    }

    fn run(&self, symbol: &str, observer: &mut dyn ParseObserver) -> Result<ChordResult, ChordError> {
        let parsed = self.resolve_observed(symbol, observer)?;
        let transduction = transduce(&self.table, &parsed.modifiers)?;
        for applied in &transduction.operations {
            observer.on_operation(applied);
        }

        let formatted = format_intervals(&transduction.intervals, &self.separator)?;
        let pitch_classes = root_pitch_class(&parsed.root)
            .map(|pc| pitch_classes(pc, &transduction.intervals))
            .unwrap_or_default();

        Ok(ChordResult {
            input: symbol.to_string(),
            modifiers: parsed.aliases(),
            root: parsed.root,
            operations: transduction.operations,
            intervals: transduction.intervals,
            formatted,
            pitch_classes,
        })
    }
}
