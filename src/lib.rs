pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod reference;
pub mod slash;
pub mod trace;

pub use compare::{compare_all, compare_chord, ComparisonRow, Fixtures, Outcome, Summary};
pub use config::Config;
pub use error::AuraError;
pub use export::{csv_field, to_csv, to_json, write_csv};
pub use reference::reference_semitones;
pub use slash::split_slash;
pub use trace::ConsoleTracer;

use aura_core::{ChordEngine, ChordResult};

/// A parsed chord symbol, with the slash bass kept separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashChord {
    pub chord: ChordResult,
    pub bass: Option<String>,
}

/// Parse a chord symbol that may carry a slash bass (`Cmaj7/E`).
/// This is the main entry point for the tooling.
pub fn parse_symbol(engine: &ChordEngine, symbol: &str) -> Result<SlashChord, AuraError> {
    let (head, bass) = split_slash(symbol)?;
    Ok(SlashChord {
        chord: engine.parse(head)?,
        bass: bass.map(str::to_string),
    })
}
