//! Root note extraction.
//!
//! Splits `"Bbm7"` into the root token `"Bb"` and the modifier suffix `"m7"`.
//! A root is one letter A-G followed by at most one accidental
//! (`#`, `b`, `♯`, `♭`). The suffix is returned untouched, case included.

use crate::error::ChordError;

const ACCIDENTALS: [char; 4] = ['#', 'b', '♯', '♭'];

/// Split a chord symbol into `(root, remainder)`.
///
/// # Examples
/// ```
/// use aura_core::extract_root;
///
/// assert_eq!(extract_root("Cm7b5").unwrap(), ("C", "m7b5"));
/// assert_eq!(extract_root("F#").unwrap(), ("F#", ""));
/// assert!(extract_root("Hm").is_err());
/// ```
pub fn extract_root(symbol: &str) -> Result<(&str, &str), ChordError> {
    let mut chars = symbol.char_indices();

    let letter_end = match chars.next() {
        Some((_, c)) if ('A'..='G').contains(&c) => c.len_utf8(),
        _ => {
            return Err(ChordError::InvalidRoot {
                input: symbol.to_string(),
            })
        }
    };

    let root_end = match chars.next() {
        Some((idx, c)) if ACCIDENTALS.contains(&c) => idx + c.len_utf8(),
        _ => letter_end,
    };

    Ok(symbol.split_at(root_end))
}

/// Pitch class of a root token, C = 0.
pub fn root_pitch_class(root: &str) -> Option<u8> {
    let mut chars = root.chars();
    let base: i32 = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let offset = match chars.next() {
        None => 0,
        Some('#') | Some('♯') => 1,
        Some('b') | Some('♭') => -1,
        Some(_) => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some((base + offset).rem_euclid(12) as u8)
}
