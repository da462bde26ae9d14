use std::path::PathBuf;

use aura_core::ChordError;
use thiserror::Error;

/// Errors raised by the tooling around the chord engine.
///
/// # Examples
/// ```
/// use aura::AuraError;
///
/// let err = AuraError::InvalidBass {
///     symbol: "C/H".to_string(),
///     bass: "H".to_string(),
/// };
/// assert_eq!(err.to_string(), "Invalid bass note 'H' in 'C/H'");
/// ```
#[derive(Error, Debug)]
pub enum AuraError {
    #[error(transparent)]
    Chord(#[from] ChordError),

    #[error("Invalid bass note '{bass}' in '{symbol}'")]
    InvalidBass { symbol: String, bass: String },

    #[error("Could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Export failed: {0}")]
    Export(String),
}

impl From<serde_json::Error> for AuraError {
    fn from(err: serde_json::Error) -> Self {
        AuraError::Export(err.to_string())
    }
}
