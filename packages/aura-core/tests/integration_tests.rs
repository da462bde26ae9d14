//! Integration tests for the chord engine
//!
//! Tests the full pipeline from chord symbol to interval description.

use aura_core::{parse_chord, Category, ChordEngine, ChordError, Requirement, Role, RuleTable};
use pretty_assertions::assert_eq;

fn semitones(symbol: &str) -> Vec<i32> {
    parse_chord(symbol).unwrap().formatted.semitones
}

#[test]
fn test_bare_root_is_major_triad() {
    let chord = parse_chord("C").unwrap();
    assert!(chord.modifiers.is_empty());
    assert_eq!(
        chord.intervals.iter().collect::<Vec<_>>(),
        vec![(Role::Root, 0), (Role::Third, 4), (Role::Fifth, 7)]
    );
}

#[test]
fn test_half_diminished_seventh() {
    let chord = parse_chord("Cm7b5").unwrap();
    assert_eq!(chord.root, "C");
    assert_eq!(chord.modifiers, vec!["m", "7", "b5"]);
    assert_eq!(
        chord.intervals.iter().collect::<Vec<_>>(),
        vec![(Role::Root, 0), (Role::Third, 3), (Role::Fifth, 6), (Role::Seventh, 10)]
    );
}

#[test]
fn test_suspended_add_nine() {
    let chord = parse_chord("Gsus4add9").unwrap();
    assert_eq!(chord.root, "G");
    assert_eq!(chord.modifiers, vec!["sus4", "add9"]);
    assert_eq!(
        chord.intervals.iter().collect::<Vec<_>>(),
        vec![(Role::Root, 0), (Role::Third, 5), (Role::Fifth, 7), (Role::Ninth, 14)]
    );
}

#[test]
fn test_diminished_seventh() {
    // Diminished seventh is one below the dominant's minor seventh
    assert_eq!(semitones("Cdim7"), vec![0, 3, 6, 9]);
    assert_eq!(semitones("C°7"), vec![0, 3, 6, 9]);
}

#[test]
fn test_stacked_extensions() {
    assert_eq!(semitones("C9"), vec![0, 4, 7, 10, 14]);
    assert_eq!(semitones("C11"), vec![0, 4, 7, 10, 14, 17]);

    let thirteen = parse_chord("C13").unwrap();
    assert_eq!(thirteen.formatted.semitones, vec![0, 4, 7, 10, 14, 21]);
    assert!(!thirteen.intervals.contains(Role::Eleventh));

    assert_eq!(semitones("Cmaj9"), vec![0, 4, 7, 11, 14]);
    assert_eq!(semitones("Cmaj11"), vec![0, 4, 7, 11, 14, 17]);
    assert_eq!(semitones("Cmaj13"), vec![0, 4, 7, 11, 14, 21]);
}

#[test]
fn test_longest_match() {
    assert_eq!(parse_chord("Cmaj7").unwrap().modifiers, vec!["maj7"]);
    assert_eq!(parse_chord("Cm7").unwrap().modifiers, vec!["m", "7"]);
    assert_eq!(semitones("Cmaj7"), vec![0, 4, 7, 11]);
    assert_eq!(semitones("Cm7"), vec![0, 3, 7, 10]);
}

#[test]
fn test_alternative_notations_agree() {
    assert_eq!(semitones("CM7"), semitones("Cmaj7"));
    assert_eq!(semitones("CΔ"), semitones("Cmaj7"));
    assert_eq!(semitones("Cmin"), semitones("Cm"));
    assert_eq!(semitones("C-"), semitones("Cm"));
    assert_eq!(semitones("C+"), semitones("Caug"));
    assert_eq!(semitones("C°"), semitones("Cdim"));
    assert_eq!(semitones("Csus"), semitones("Csus4"));
    assert_eq!(semitones("Cø"), semitones("Cm7b5"));
}

#[test]
fn test_alterations() {
    assert_eq!(semitones("C7b9"), vec![0, 4, 7, 10, 13]);
    assert_eq!(semitones("C7#9"), vec![0, 4, 7, 10, 15]);
    assert_eq!(semitones("C7#11"), vec![0, 4, 7, 10, 18]);
    assert_eq!(semitones("C7b13"), vec![0, 4, 7, 10, 20]);
    assert_eq!(semitones("C13#11"), vec![0, 4, 7, 10, 14, 18, 21]);
    assert_eq!(semitones("C7#5"), vec![0, 4, 8, 10]);
}

#[test]
fn test_alteration_adjusts_extension_role() {
    assert_eq!(semitones("C13#13"), vec![0, 4, 7, 10, 14, 22]);
    assert_eq!(semitones("C9#9"), vec![0, 4, 7, 10, 15]);
}

#[test]
fn test_additions_do_not_imply_seventh() {
    assert_eq!(semitones("Cadd9"), vec![0, 4, 7, 14]);
    assert_eq!(semitones("Cadd13"), vec![0, 4, 7, 21]);
    assert_eq!(semitones("C6"), vec![0, 4, 7, 21]);
    assert_eq!(semitones("CM7add13"), vec![0, 4, 7, 11, 21]);
}

#[test]
fn test_flat_roots() {
    let chord = parse_chord("Bbm7").unwrap();
    assert_eq!(chord.root, "Bb");
    assert_eq!(chord.formatted.semitones, vec![0, 3, 7, 10]);
    assert_eq!(chord.pitch_classes, vec![10, 1, 5, 8]);
}

#[test]
fn test_conflicting_quality() {
    assert!(matches!(
        parse_chord("Cmajm"),
        Err(ChordError::ConflictingQuality { .. })
    ));
    assert!(matches!(
        parse_chord("Csus4sus2"),
        Err(ChordError::ConflictingQuality { .. })
    ));
}

#[test]
fn test_missing_requirement() {
    assert_eq!(
        parse_chord("Csus4b9"),
        Err(ChordError::MissingRequirement {
            symbol: "b9".to_string(),
            requirement: Requirement::Category(Category::Extension),
        })
    );
    for symbol in ["Cmb9", "Cadd9b9"] {
        assert!(
            matches!(parse_chord(symbol), Err(ChordError::MissingRequirement { .. })),
            "expected {:?} to need an extension",
            symbol
        );
    }
}

#[test]
fn test_flat_root_reads_before_alteration() {
    // "Cb9" is a C-flat ninth chord, not C with a flat ninth.
    let chord = parse_chord("Cb9").unwrap();
    assert_eq!(chord.root, "Cb");
    assert_eq!(chord.modifiers, vec!["9"]);
}

#[test]
fn test_conflicting_alterations() {
    assert!(matches!(
        parse_chord("C7b5#5"),
        Err(ChordError::ConflictingRole { role: Role::Fifth, .. })
    ));
    assert!(matches!(
        parse_chord("C9add9"),
        Err(ChordError::ConflictingRole { role: Role::Ninth, .. })
    ));
    assert!(matches!(
        parse_chord("C7#9#9"),
        Err(ChordError::ConflictingRole { role: Role::Ninth, .. })
    ));
}

#[test]
fn test_written_order_does_not_matter() {
    let canonical = parse_chord("Cm7b5").unwrap();
    let reordered = parse_chord("C7b5m").unwrap();
    assert_eq!(reordered.intervals, canonical.intervals);
    assert_eq!(reordered.modifiers, vec!["7", "b5", "m"]);

    assert_eq!(semitones("C7b5sus4"), semitones("C7sus4b5"));
}

#[test]
fn test_qualified_requirement_in_custom_table() {
    let table = RuleTable::from_yaml(
        r#"
rules:
  - symbols: ["7"]
    category: extension
    operation: { type: add, role: seventh, value: 10 }
  - symbols: ["add9"]
    category: addition
    operation: { type: add, role: ninth, value: 14 }
  - symbols: ["b9"]
    category: alteration
    requires: ["extension.7"]
    operation: { type: modify, role: ninth, value: -1 }
"#,
    )
    .unwrap();
    let engine = ChordEngine::new(table);
    assert_eq!(engine.parse("C7b9").unwrap().formatted.semitones, vec![0, 4, 7, 10, 13]);
    assert!(matches!(
        engine.parse("Cadd9b9"),
        Err(ChordError::MissingRequirement { .. })
    ));
}

#[test]
fn test_invalid_chords() {
    for symbol in ["Cm7maj7", "C7maj7", "Cdimmaj", "Csus3", "Cadd1", "Cmaj7##11", "H7", ""] {
        assert!(parse_chord(symbol).is_err(), "expected {:?} to be rejected", symbol);
    }
}

#[test]
fn test_unrecognized_modifier_names_remainder() {
    assert_eq!(
        parse_chord("Cmaj7xyz"),
        Err(ChordError::UnrecognizedModifier {
            remainder: "xyz".to_string()
        })
    );
}

#[test]
fn test_custom_rule_table() {
    let table = RuleTable::from_yaml(
        r#"
rules:
  - symbols: ["alt"]
    category: alteration
    operations:
      - { type: modify, role: fifth, value: 1 }
      - { type: add, role: ninth, value: 13 }
"#,
    )
    .unwrap();
    let engine = ChordEngine::new(table);
    assert_eq!(engine.parse("Calt").unwrap().formatted.semitones, vec![0, 4, 8, 13]);
    // The built-in lexicon is not consulted.
    assert!(engine.parse("Cm").is_err());
}

#[test]
fn test_parses_concurrently() {
    let engine = ChordEngine::default();
    std::thread::scope(|scope| {
        let handles: Vec<_> = ["Cm7b5", "G7#9", "Fmaj9", "Bbsus2"]
            .into_iter()
            .map(|symbol| {
                let engine = &engine;
                scope.spawn(move || engine.parse(symbol).map(|c| c.formatted.display))
            })
            .collect();
        let displays: Vec<String> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();
        assert_eq!(displays, vec!["0·3·6·10", "0·4·7·10·15", "0·4·7·11·14", "0·2·7"]);
    });
}
