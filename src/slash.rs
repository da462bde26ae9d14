//! Slash-chord splitting.
//!
//! The engine only understands the part before `/`. The bass note after it
//! uses the same grammar as a root (`E`, `Bb`, `F#`) and is checked here.
//! Enharmonic spellings such as `B#` are accepted as written.

use aura_core::extract_root;

use crate::error::AuraError;

/// Split `"Cmaj7/E"` into `("Cmaj7", Some("E"))`.
///
/// # Examples
/// ```
/// use aura::split_slash;
///
/// assert_eq!(split_slash("Cm7/Eb").unwrap(), ("Cm7", Some("Eb")));
/// assert_eq!(split_slash("G7").unwrap(), ("G7", None));
/// assert!(split_slash("C/H").is_err());
/// ```
pub fn split_slash(symbol: &str) -> Result<(&str, Option<&str>), AuraError> {
    let Some((head, bass)) = symbol.split_once('/') else {
        return Ok((symbol, None));
    };

    match extract_root(bass) {
        Ok((_, "")) => Ok((head, Some(bass))),
        _ => Err(AuraError::InvalidBass {
            symbol: symbol.to_string(),
            bass: bass.to_string(),
        }),
    }
}
