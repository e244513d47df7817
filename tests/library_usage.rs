//! Integration tests for chordclean library usage.
//!
//! These tests verify that the library can be used as a dependency
//! from external projects.

use chordclean::{
    erode, homogenize, parse_token, positive_selection, tokenize, ChordCleaner, CleanReport,
    CleanerConfig, CleanerError, FrequencyStage, FrequencyTable, SelectionMode,
};

/// Test that all major types are accessible from the library.
#[test]
fn test_types_accessible() {
    // This test verifies that the public API types compile and are usable.
    // If any re-export is missing, this test will fail to compile.

    fn _assert_types() {
        let _: fn(CleanerConfig) -> Result<ChordCleaner, CleanerError> = ChordCleaner::new;
        let _: fn(&str) -> String = homogenize;
        let _: fn(&str) -> String = positive_selection;
        let _: fn(&str) -> Vec<String> = tokenize;
        let _: CleanReport = CleanReport::default();
    }
}

/// Test cleaning a small corpus with the default configuration.
#[test]
fn test_clean_corpus() {
    let corpus = vec![
        "Intro: Am,C7M G/B x2".to_string(),
        "Chorus".to_string(),
        "A|---5-4-3---| D Fmaj7(9)".to_string(),
    ];
    let mut cleaner = ChordCleaner::new(CleanerConfig::default()).expect("valid config");
    let cleaned = cleaner.clean_corpus(&corpus);

    assert_eq!(cleaned.len(), corpus.len(), "one output per input line");
    assert_eq!(cleaned, vec!["Am Cmaj7 G/B", "", "D Fmaj7(9)"]);
}

/// Test the building blocks on their own.
#[test]
fn test_stages() {
    assert_eq!(tokenize("Am,Cmaj7 (G"), vec!["Am", "Cmaj7", "(G"]);
    assert_eq!(erode("(G"), "G");
    assert_eq!(homogenize("A7/13 Emin"), "A7(13) Em");
    assert_eq!(positive_selection("Bridge: Em7 C"), "Em7 C");

    let shape = parse_token("Bbmaj7/D").expect("chord shaped");
    assert_eq!(shape.root, 'B');
    assert_eq!(shape.accidental, Some('b'));
    assert_eq!(shape.bass, Some("D"));
    assert!(parse_token("Bridge").is_none());
}

/// Test that frequency counts add up to the number of tokens.
#[test]
fn test_frequency_table() {
    let lines: Vec<Vec<String>> = ["Am Am G", "G C"]
        .iter()
        .map(|line| tokenize(line))
        .collect();
    let table = FrequencyTable::from_lines(&lines);
    assert_eq!(table.total(), 5);
    assert_eq!(table.count("G"), 2);
}

/// Test configuration from JSON and error handling for invalid values.
#[test]
fn test_config_error() {
    let config = CleanerConfig::from_json(
        r#"{"mode": "line", "freq_threshold": 1, "frequency_stage": "after_noise_filter"}"#,
    )
    .expect("valid config");
    assert_eq!(config.mode, SelectionMode::Line);
    assert_eq!(config.frequency_stage, FrequencyStage::AfterNoiseFilter);

    let result = ChordCleaner::new(CleanerConfig {
        char_threshold: 0,
        ..CleanerConfig::default()
    });
    assert!(
        matches!(result, Err(CleanerError::ConfigError(_))),
        "Should be a ConfigError"
    );
}

/// Test that kept chords can be broken down into their structural slots.
#[test]
fn test_explain_cleaned_chords() {
    let mut cleaner = ChordCleaner::new(CleanerConfig::default()).expect("valid config");
    let cleaned = cleaner.clean_corpus(&["Verse: F#m7(b9)/C# G+"]);
    assert_eq!(cleaned, vec!["F#m7(b9)/C# Gaug"]);

    let shapes: Vec<_> = cleaned[0]
        .split(' ')
        .map(|chord| cleaner.validator().parse(chord).expect("chord shaped"))
        .collect();
    assert_eq!(shapes[0].accidental, Some('#'));
    assert_eq!(shapes[0].added, vec!["b9"]);
    assert_eq!(shapes[0].bass, Some("C#"));
    assert_eq!(shapes[1].quality, Some("aug"));
}
