//! Reference chord lookup.
//!
//! A deliberately simple parser used as a comparison baseline: the suffix
//! after the root is looked up in a fixed table of common chord spellings.
//! Anything outside that table is reported as unsupported rather than
//! guessed at. Slash bass notes are ignored.

/// Semitones above the root for a chord symbol, or `None` when the suffix
/// is not in the table.
///
/// # Supported Chord Types
/// - **Triads**: ``, `maj`, `M`, `m`, `min`, `-`, `dim`, `°`, `aug`, `+`
/// - **Suspended**: `sus`, `sus4`, `sus2`, `7sus4`
/// - **Sevenths**: `7`, `maj7`, `M7`, `m7`, `min7`, `-7`, `mM7`, `m7b5`, `ø`, `dim7`, `°7`
/// - **Sixths and adds**: `6`, `m6`, `add9`, `madd9`
/// - **Extended**: `9`, `maj9`, `M9`, `m9`, `11`, `m11`, `13`, `maj13`, `m13`
/// - **Altered dominants**: `7b5`, `7#5`, `7b9`, `7#9`, `7#11`, `7b13`
///
/// # Examples
/// ```
/// use aura::reference_semitones;
///
/// assert_eq!(reference_semitones("C"), Some(vec![0, 4, 7]));
/// assert_eq!(reference_semitones("Dm7"), Some(vec![0, 3, 7, 10]));
/// assert_eq!(reference_semitones("F#7#9"), Some(vec![0, 4, 7, 10, 15]));
/// assert_eq!(reference_semitones("C7b9#11"), None);
/// ```
pub fn reference_semitones(chord_symbol: &str) -> Option<Vec<i32>> {
    let head = chord_symbol.split('/').next().unwrap_or_default();
    let mut chars = head.chars();

    if !matches!(chars.next()?, 'A'..='G') {
        return None;
    }
    let rest = chars.as_str();
    let quality = rest.strip_prefix(&['#', 'b'][..]).unwrap_or(rest);

    let semitones: &[i32] = match quality {
        // Triads
        "" | "maj" | "M" => &[0, 4, 7],
        "m" | "min" | "-" => &[0, 3, 7],
        "dim" | "°" => &[0, 3, 6],
        "aug" | "+" => &[0, 4, 8],

        // Suspended
        "sus" | "sus4" => &[0, 5, 7],
        "sus2" => &[0, 2, 7],
        "7sus4" => &[0, 5, 7, 10],

        // Sevenths
        "7" => &[0, 4, 7, 10],
        "maj7" | "M7" => &[0, 4, 7, 11],
        "m7" | "min7" | "-7" => &[0, 3, 7, 10],
        "mM7" => &[0, 3, 7, 11],
        "m7b5" | "ø" => &[0, 3, 6, 10],
        "dim7" | "°7" => &[0, 3, 6, 9],

        // Sixths and added tones
        "6" => &[0, 4, 7, 9],
        "m6" => &[0, 3, 7, 9],
        "add9" => &[0, 4, 7, 14],
        "madd9" => &[0, 3, 7, 14],

        // Extended
        "9" => &[0, 4, 7, 10, 14],
        "maj9" | "M9" => &[0, 4, 7, 11, 14],
        "m9" | "min9" => &[0, 3, 7, 10, 14],
        "11" => &[0, 4, 7, 10, 14, 17],
        "m11" => &[0, 3, 7, 10, 14, 17],
        "13" => &[0, 4, 7, 10, 14, 21],
        "maj13" => &[0, 4, 7, 11, 14, 21],
        "m13" => &[0, 3, 7, 10, 14, 21],

        // Altered dominants
        "7b5" => &[0, 4, 6, 10],
        "7#5" => &[0, 4, 8, 10],
        "7b9" => &[0, 4, 7, 10, 13],
        "7#9" => &[0, 4, 7, 10, 15],
        "7#11" => &[0, 4, 7, 10, 18],
        "7b13" => &[0, 4, 7, 10, 20],

        _ => return None,
    };

    Some(semitones.to_vec())
}
