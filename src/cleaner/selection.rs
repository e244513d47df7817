//! Corpus level selection of chord tokens.
//!
//! Positive selection keeps only chord-shaped substrings of a line, negative
//! selection drops tokens that are too rare across the whole corpus.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

const EXTENSION: &str = "(?:2|4|5|6|7|9|10|11|13)";

/// Looser chord anatomy used when scanning a whole line
static CHORD_IN_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let root = "[A-G]";
    let accidental = "[#b]?";
    let quality = "[AIJMNaijmn]{0,3}";
    let modifier = "(?:[ADGIMNOSUadgimnosu]{0,3}[24]?)?";
    let added = format!(r"(?:\((?:{accidental}{EXTENSION}?,?\s*){{1,2}}\))?");
    let slash = format!("(?:/{root}{accidental})?");
    let anatomy =
        format!("{root}{accidental}{quality}{EXTENSION}?{modifier}{added}{slash}");
    // the chord must not run into a letter, e.g. "B" from "Bridge"
    Regex::new(&format!("^({anatomy})(?:[^A-Za-z]|$)")).unwrap()
});

/// Every chord-shaped substring of a line, in order.
///
/// A match may only start on a root note that does not follow a letter.
pub fn select_chords(line: &str) -> Vec<&str> {
    let mut chords = Vec::new();
    let mut position = 0;
    let mut previous: Option<char> = None;
    while let Some(c) = line[position..].chars().next() {
        let starts_word = !previous.is_some_and(|p| p.is_ascii_alphabetic());
        if starts_word && crate::cleaner::is_root_note(c) {
            if let Some(chord) = CHORD_IN_LINE_RE
                .captures(&line[position..])
                .and_then(|caps| caps.get(1))
            {
                chords.push(chord.as_str());
                position += chord.end();
                previous = chord.as_str().chars().last();
                continue;
            }
        }
        previous = Some(c);
        position += c.len_utf8();
    }
    chords
}

/// Keep only the chords of a line, space separated.
pub fn positive_selection(line: &str) -> String {
    select_chords(line).join(" ")
}

/// Occurrence count of every distinct token of a corpus.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn from_lines<S: AsRef<str>>(lines: &[Vec<S>]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in lines.iter().flatten() {
            *counts.entry(token.as_ref().to_string()).or_default() += 1;
        }
        Self { counts }
    }

    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or_default()
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Tokens seen at most `threshold` times
    pub fn rare_tokens(&self, threshold: usize) -> HashSet<&str> {
        self.counts
            .iter()
            .filter(|(_, &count)| count <= threshold)
            .map(|(token, _)| token.as_str())
            .collect()
    }
}

/// Negative selection: drop tokens too rare in the corpus to be chords.
///
/// Tokens are compared whole, a rare `Am` never strips the `Am` out of a
/// distinct `Amadd9`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyFilter {
    threshold: Option<usize>,
}

impl FrequencyFilter {
    pub const fn new(threshold: Option<usize>) -> Self {
        Self { threshold }
    }

    pub const fn is_enabled(&self) -> bool {
        self.threshold.is_some()
    }

    /// Filter every line in place and return the number of removed tokens.
    ///
    /// Needs the whole corpus: counts are complete before any line changes.
    /// Lines keep their position even when emptied.
    pub fn apply(&self, lines: &mut [Vec<String>]) -> usize {
        let Some(threshold) = self.threshold else {
            return 0;
        };
        let table = FrequencyTable::from_lines(&*lines);
        let rare = table.rare_tokens(threshold);
        log::debug!(
            "negative selection: {} of {} distinct tokens at or below {threshold}",
            rare.len(),
            table.distinct()
        );
        let mut removed = 0;
        for line in lines.iter_mut() {
            let before = line.len();
            line.retain(|token| !rare.contains(token.as_str()));
            removed += before - line.len();
        }
        removed
    }
}
