//! CSV and JSON renderings of comparison rows.
//!
//! CSV follows RFC 4180: CRLF line endings, fields containing a comma,
//! quote or line break are quoted, and embedded quotes are doubled.

use std::io::Write;

use aura_core::DEFAULT_SEPARATOR;

use crate::compare::ComparisonRow;
use crate::error::AuraError;

const CSV_HEADER: [&str; 5] = ["chord", "bass", "engine", "reference", "outcome"];

/// Quote a single CSV field when needed.
///
/// # Examples
/// ```
/// use aura::csv_field;
///
/// assert_eq!(csv_field("C7"), "C7");
/// assert_eq!(csv_field("a,b"), "\"a,b\"");
/// assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
pub fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\r' | '\n')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_record(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}

fn join_semitones(semitones: &[i32]) -> String {
    semitones
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(DEFAULT_SEPARATOR)
}

/// Write rows as CSV, header first.
pub fn write_csv<W: Write>(rows: &[ComparisonRow], mut writer: W) -> Result<(), AuraError> {
    let mut out = csv_record(&CSV_HEADER);
    for row in rows {
        let engine = match (&row.engine, &row.engine_error) {
            (Some(semitones), _) => join_semitones(semitones),
            (None, Some(error)) => format!("error: {}", error),
            (None, None) => String::new(),
        };
        let reference = row
            .reference
            .as_deref()
            .map(join_semitones)
            .unwrap_or_else(|| "unsupported".to_string());

        out.push_str(&csv_record(&[
            row.chord.as_str(),
            row.bass.as_deref().unwrap_or_default(),
            engine.as_str(),
            reference.as_str(),
            row.outcome.name(),
        ]));
    }

    writer
        .write_all(out.as_bytes())
        .map_err(|e| AuraError::Export(e.to_string()))
}

pub fn to_csv(rows: &[ComparisonRow]) -> Result<String, AuraError> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| AuraError::Export(e.to_string()))
}

pub fn to_json(rows: &[ComparisonRow]) -> Result<String, AuraError> {
    Ok(serde_json::to_string_pretty(rows)?)
}
