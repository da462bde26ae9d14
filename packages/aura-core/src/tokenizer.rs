//! # Modifier Tokenizer
//!
//! Splits a modifier suffix (`"m7b5"`) into rule tokens (`m`, `7`, `b5`).
//!
//! ## Matching Rules
//! - Every alias of every rule becomes one prefix pattern.
//! - Patterns are tried **longest first** (length in characters), ties broken
//!   by rule priority and then table order. `maj7` is therefore tried before
//!   `maj` and `m`, and `Cmaj7` yields one token instead of `maj` + `7`.
//! - Aliases match case-insensitively unless their rule is case-sensitive
//!   (`M` major vs `m` minor).
//! - The alias `m` never matches a remainder starting with `maj`.
//! - There is no skip-one-character recovery: the first position where no
//!   alias matches fails with `UnrecognizedModifier`.
//!
//! The pattern list is built once in [`Tokenizer::new`] and never mutated.

use tracing::trace;

use crate::error::ChordError;
use crate::rules::RuleTable;

/// One matched modifier: the index of its rule in the table and the alias text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub rule: usize,
    pub alias: String,
}

#[derive(Debug, Clone)]
struct Pattern {
    alias: String,
    rule: usize,
    priority: u8,
    case_sensitive: bool,
    char_len: usize,
    /// Negative lookahead applied after the alias.
    not_followed_by: Option<&'static str>,
}

impl Pattern {
    /// Byte length consumed when this pattern matches the front of `input`.
    fn match_len(&self, input: &str) -> Option<usize> {
        let consumed = if self.case_sensitive {
            input.starts_with(self.alias.as_str()).then_some(self.alias.len())
        } else {
            strip_prefix_ignore_case(input, &self.alias)
        }?;

        match self.not_followed_by {
            Some(guard) if starts_with_ignore_case(&input[consumed..], guard) => None,
            _ => Some(consumed),
        }
    }
}

/// Longest-match tokenizer over a rule table.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    patterns: Vec<Pattern>,
}

impl Tokenizer {
    pub fn new(table: &RuleTable) -> Self {
        let mut patterns: Vec<Pattern> = table
            .rules()
            .iter()
            .enumerate()
            .flat_map(|(index, rule)| {
                rule.symbols.iter().map(move |alias| Pattern {
                    alias: alias.clone(),
                    rule: index,
                    priority: rule.priority,
                    case_sensitive: rule.case_sensitive,
                    char_len: alias.chars().count(),
                    not_followed_by: (alias == "m").then_some("aj"),
                })
            })
            .collect();

        // Stable sort keeps table order for equal length and priority.
        patterns.sort_by(|a, b| {
            b.char_len
                .cmp(&a.char_len)
                .then(a.priority.cmp(&b.priority))
        });

        Tokenizer { patterns }
    }

    /// Tokenize a modifier suffix. An empty suffix yields no tokens.
    ///
    /// # Examples
    /// ```
    /// use aura_core::{RuleTable, Tokenizer};
    ///
    /// let tokenizer = Tokenizer::new(&RuleTable::standard());
    /// let aliases: Vec<String> = tokenizer
    ///     .tokenize("m7b5")
    ///     .unwrap()
    ///     .into_iter()
    ///     .map(|t| t.alias)
    ///     .collect();
    /// assert_eq!(aliases, vec!["m", "7", "b5"]);
    /// ```
    pub fn tokenize(&self, suffix: &str) -> Result<Vec<Token>, ChordError> {
        let mut tokens = Vec::new();
        let mut remaining = suffix;

        while !remaining.is_empty() {
            let (pattern, consumed) = self
                .patterns
                .iter()
                .find_map(|p| p.match_len(remaining).map(|len| (p, len)))
                .ok_or_else(|| ChordError::UnrecognizedModifier {
                    remainder: remaining.to_string(),
                })?;

            trace!(alias = %pattern.alias, remaining, "matched modifier");
            tokens.push(Token {
                rule: pattern.rule,
                alias: pattern.alias.clone(),
            });
            remaining = &remaining[consumed..];
        }

        Ok(tokens)
    }

    /// Number of prefix patterns (one per alias).
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

/// Case-insensitive prefix match; returns the byte length consumed in `input`.
fn strip_prefix_ignore_case(input: &str, prefix: &str) -> Option<usize> {
    let mut consumed = 0;
    let mut input_chars = input.chars();
    for expected in prefix.chars() {
        let actual = input_chars.next()?;
        if !actual.eq_ignore_ascii_case(&expected) {
            return None;
        }
        consumed += actual.len_utf8();
    }
    Some(consumed)
}

fn starts_with_ignore_case(input: &str, prefix: &str) -> bool {
    strip_prefix_ignore_case(input, prefix).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn aliases(suffix: &str) -> Vec<String> {
        let tokenizer = Tokenizer::new(&RuleTable::standard());
        tokenizer
            .tokenize(suffix)
            .unwrap()
            .into_iter()
            .map(|t| t.alias)
            .collect()
    }

    #[test]
    fn test_empty_suffix() {
        assert!(aliases("").is_empty());
    }

    #[test]
    fn test_longest_match_wins() {
        assert_eq!(aliases("maj7"), vec!["maj7"]);
        assert_eq!(aliases("maj9#11"), vec!["maj9", "#11"]);
        assert_eq!(aliases("dim7"), vec!["dim7"]);
        assert_eq!(aliases("sus4add9"), vec!["sus4", "add9"]);
        assert_eq!(aliases("sus2"), vec!["sus2"]);
        assert_eq!(aliases("sus"), vec!["sus"]);
    }

    #[test]
    fn test_minor_never_matches_maj() {
        assert_eq!(aliases("m7"), vec!["m", "7"]);
        assert_eq!(aliases("madd9"), vec!["m", "add9"]);
        assert_eq!(aliases("maj"), vec!["maj"]);
        assert_eq!(aliases("mM7"), vec!["m", "M7"]);
    }

    #[test]
    fn test_case_sensitive_quality() {
        assert_eq!(aliases("M7"), vec!["M7"]);
        assert_eq!(aliases("M"), vec!["M"]);
        assert_eq!(aliases("m"), vec!["m"]);
    }

    #[test]
    fn test_case_insensitive_aliases() {
        assert_eq!(aliases("SUS4"), vec!["sus4"]);
        assert_eq!(aliases("Dim"), vec!["dim"]);
        assert_eq!(aliases("7B9"), vec!["7", "b9"]);
    }

    #[test]
    fn test_unicode_glyphs() {
        assert_eq!(aliases("Δ"), vec!["Δ"]);
        assert_eq!(aliases("ø7"), vec!["ø7"]);
        assert_eq!(aliases("°"), vec!["°"]);
        assert_eq!(aliases("7♭9"), vec!["7", "♭9"]);
    }

    #[test]
    fn test_alteration_prefers_longer_symbol() {
        assert_eq!(aliases("7+5"), vec!["7", "+5"]);
        assert_eq!(aliases("+"), vec!["+"]);
        assert_eq!(aliases("7b5"), vec!["7", "b5"]);
        assert_eq!(aliases("13"), vec!["13"]);
    }

    #[test]
    fn test_token_records_rule_index() {
        let table = RuleTable::standard();
        let tokenizer = Tokenizer::new(&table);
        let tokens = tokenizer.tokenize("min").unwrap();
        assert_eq!(table.get(tokens[0].rule).unwrap().symbol(), "m");
    }

    #[test]
    fn test_unrecognized_modifier_reports_remainder() {
        let tokenizer = Tokenizer::new(&RuleTable::standard());
        assert_eq!(
            tokenizer.tokenize("sus3"),
            Err(ChordError::UnrecognizedModifier {
                remainder: "3".to_string()
            })
        );
        assert_eq!(
            tokenizer.tokenize("maj7##11"),
            Err(ChordError::UnrecognizedModifier {
                remainder: "##11".to_string()
            })
        );
        assert_eq!(
            tokenizer.tokenize("add1"),
            Err(ChordError::UnrecognizedModifier {
                remainder: "add1".to_string()
            })
        );
    }

    #[test]
    fn test_no_skip_recovery() {
        let tokenizer = Tokenizer::new(&RuleTable::standard());
        assert!(tokenizer.tokenize("x7").is_err());
    }

    #[test]
    fn test_pattern_count_covers_all_aliases() {
        let table = RuleTable::standard();
        let expected: usize = table.rules().iter().map(|r| r.symbols.len()).sum();
        assert_eq!(Tokenizer::new(&table).pattern_count(), expected);
    }
}
