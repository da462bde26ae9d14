//! Result formatting.
//!
//! Reduces each active role modulo 12 and names it with the fixed 0-12
//! interval table. Pure: the same map always formats the same way.

use serde::Serialize;

use crate::error::ChordError;
use crate::rules::Role;
use crate::transducer::IntervalState;

/// Short interval names indexed by semitones, unison to octave.
pub const INTERVAL_NAMES: [&str; 13] = [
    "P1", "m2", "M2", "m3", "M3", "P4", "TT", "P5", "m6", "M6", "m7", "M7", "P8",
];

/// Separator used between raw semitone values in display strings.
pub const DEFAULT_SEPARATOR: &str = "·";

/// Interval name for a semitone count within one octave.
///
/// # Examples
/// ```
/// use aura_core::interval_name;
///
/// assert_eq!(interval_name(4), Some("M3"));
/// assert_eq!(interval_name(6), Some("TT"));
/// assert_eq!(interval_name(13), None);
/// ```
pub fn interval_name(semitones: i32) -> Option<&'static str> {
    usize::try_from(semitones)
        .ok()
        .and_then(|index| INTERVAL_NAMES.get(index))
        .copied()
}

/// Displayable form of an interval map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedChord {
    pub roles: Vec<Role>,
    pub names: Vec<&'static str>,
    pub semitones: Vec<i32>,
    pub display: String,
}

/// Format an interval map, root to highest role.
pub fn format_intervals(
    intervals: &IntervalState,
    separator: &str,
) -> Result<FormattedChord, ChordError> {
    let mut roles = Vec::with_capacity(intervals.len());
    let mut names = Vec::with_capacity(intervals.len());
    let mut semitones = Vec::with_capacity(intervals.len());

    for (role, value) in intervals.iter() {
        let reduced = value.rem_euclid(12);
        let name = interval_name(reduced).ok_or(ChordError::UnknownInterval {
            role,
            semitones: value,
        })?;
        roles.push(role);
        names.push(name);
        semitones.push(value);
    }

    let display = semitones
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(separator);

    Ok(FormattedChord {
        roles,
        names,
        semitones,
        display,
    })
}

/// Absolute pitch classes (C = 0) of every active role above `root`.
pub fn pitch_classes(root: u8, intervals: &IntervalState) -> Vec<u8> {
    intervals
        .iter()
        .map(|(_, value)| (i32::from(root) + value).rem_euclid(12) as u8)
        .collect()
}
