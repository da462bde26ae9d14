//! # Comparison Harness
//!
//! Runs every fixture chord through the engine and through the reference
//! lookup, and classifies how the two answers relate.
//!
//! ## Outcomes
//! | Outcome         | Engine      | Reference   |
//! |-----------------|-------------|-------------|
//! | `Match`         | semitones   | same        |
//! | `Mismatch`      | semitones   | different   |
//! | `EngineOnly`    | semitones   | unsupported |
//! | `ReferenceOnly` | rejected    | semitones   |
//! | `BothRejected`  | rejected    | unsupported |
//!
//! Disagreements are expected: the reference table keeps sixths below the
//! octave and knows few alterations. The harness reports, it does not judge.
//!
//! ## Related Modules
//! - `reference` - the baseline lookup
//! - `slash` - bass notes are stripped before the engine sees the symbol
//! - `export` - CSV and JSON renderings of the rows

use std::fmt;

use aura_core::ChordEngine;
use serde::{Deserialize, Serialize};

use crate::error::AuraError;
use crate::reference::reference_semitones;
use crate::slash::split_slash;

const BUILTIN_FIXTURES: &str = include_str!("../fixtures/chords.yaml");

/// Chord symbols to compare, split by whether the engine should accept them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub valid: Vec<String>,
    #[serde(default)]
    pub invalid: Vec<String>,
}

impl Fixtures {
    /// The fixture set shipped with the crate.
    pub fn builtin() -> Result<Self, AuraError> {
        Fixtures::from_yaml(BUILTIN_FIXTURES)
    }

    pub fn from_yaml(source: &str) -> Result<Self, AuraError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Valid chords first, then invalid ones.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.valid.iter().chain(&self.invalid).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Match,
    Mismatch,
    EngineOnly,
    ReferenceOnly,
    BothRejected,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::Match,
        Outcome::Mismatch,
        Outcome::EngineOnly,
        Outcome::ReferenceOnly,
        Outcome::BothRejected,
    ];

    fn classify(engine: Option<&[i32]>, reference: Option<&[i32]>) -> Outcome {
        match (engine, reference) {
            (Some(e), Some(r)) if e == r => Outcome::Match,
            (Some(_), Some(_)) => Outcome::Mismatch,
            (Some(_), None) => Outcome::EngineOnly,
            (None, Some(_)) => Outcome::ReferenceOnly,
            (None, None) => Outcome::BothRejected,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Outcome::Match => "match",
            Outcome::Mismatch => "mismatch",
            Outcome::EngineOnly => "engine-only",
            Outcome::ReferenceOnly => "reference-only",
            Outcome::BothRejected => "both-rejected",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One compared chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub chord: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bass: Option<String>,
    pub engine: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_error: Option<String>,
    pub reference: Option<Vec<i32>>,
    pub outcome: Outcome,
}

/// Compare a single chord symbol.
pub fn compare_chord(engine: &ChordEngine, chord: &str) -> ComparisonRow {
    let parsed = split_slash(chord).and_then(|(head, bass)| {
        let result = engine.parse(head)?;
        Ok((result.formatted.semitones, bass.map(str::to_string)))
    });

    let (semitones, bass, engine_error) = match parsed {
        Ok((semitones, bass)) => (Some(semitones), bass, None),
        Err(err) => (None, None, Some(err.to_string())),
    };

    let reference = reference_semitones(chord);
    let outcome = Outcome::classify(semitones.as_deref(), reference.as_deref());

    ComparisonRow {
        chord: chord.to_string(),
        bass,
        engine: semitones,
        engine_error,
        reference,
        outcome,
    }
}

/// Compare every chord, in order.
pub fn compare_all<'a>(
    engine: &ChordEngine,
    chords: impl IntoIterator<Item = &'a str>,
) -> Vec<ComparisonRow> {
    chords
        .into_iter()
        .map(|chord| compare_chord(engine, chord))
        .collect()
}

/// Count of rows per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub engine_only: usize,
    pub reference_only: usize,
    pub both_rejected: usize,
}

impl Summary {
    pub fn from_rows(rows: &[ComparisonRow]) -> Self {
        let mut summary = Summary::default();
        for row in rows {
            summary.total += 1;
            match row.outcome {
                Outcome::Match => summary.matches += 1,
                Outcome::Mismatch => summary.mismatches += 1,
                Outcome::EngineOnly => summary.engine_only += 1,
                Outcome::ReferenceOnly => summary.reference_only += 1,
                Outcome::BothRejected => summary.both_rejected += 1,
            }
        }
        summary
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Match => self.matches,
            Outcome::Mismatch => self.mismatches,
            Outcome::EngineOnly => self.engine_only,
            Outcome::ReferenceOnly => self.reference_only,
            Outcome::BothRejected => self.both_rejected,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} chords:", self.total)?;
        for outcome in Outcome::ALL {
            write!(f, " {} {}", self.count(outcome), outcome)?;
        }
        Ok(())
    }
}
