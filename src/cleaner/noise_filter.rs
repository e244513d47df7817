//! Detection of tablature staves and overlong tokens.
//!
//! Tablature looks like chords to a naive matcher: `A|---5-4-3---|` starts with
//! a root note. The token and the whole-line detectors are built from the same
//! character class so both cleaning paths agree on what a staff is.

use crate::cleaner::{ROOT_PATTERN, TAB_BODY_PATTERN};
use crate::CleanerError;
use regex::Regex;
use std::sync::LazyLock;

/// Staff opening: string name, one or two pipes and fret notation
static TAB_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{ROOT_PATTERN}\|{{1,2}}{TAB_BODY_PATTERN}+")).unwrap());

/// Staff fragment inside a line, up to the closing pipe(s), space or line end
static TAB_FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b{ROOT_PATTERN}\|{{1,2}}{TAB_BODY_PATTERN}+(?:[| ]+|$)"
    ))
    .unwrap()
});

/// Default length at which a token is considered garbage
pub const DEFAULT_CHAR_THRESHOLD: usize = 20;

/// Why a token was discarded before reaching the chord grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooLong,
    Tablature,
}

/// Token and line level screening of tablature and overlong words.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    char_threshold: usize,
    long_word_re: Regex,
}

impl NoiseFilter {
    /// Fails when `char_threshold` is zero, nothing could ever pass.
    pub fn new(char_threshold: usize) -> Result<Self, CleanerError> {
        if char_threshold == 0 {
            return Err(CleanerError::ConfigError(
                "char_threshold must be at least 1".to_string(),
            ));
        }
        let long_word_re = Regex::new(&format!(r"\S{{{char_threshold},}}"))?;
        Ok(Self {
            char_threshold,
            long_word_re,
        })
    }

    pub const fn char_threshold(&self) -> usize {
        self.char_threshold
    }

    pub fn is_too_long(&self, token: &str) -> bool {
        token.chars().count() >= self.char_threshold
    }

    /// Returns the reason a token must be dropped, if any.
    pub fn reject(&self, token: &str) -> Option<Rejection> {
        if self.is_too_long(token) {
            Some(Rejection::TooLong)
        } else if is_tablature(token) {
            Some(Rejection::Tablature)
        } else {
            None
        }
    }

    /// Remove every word at or above the length threshold from a line.
    pub fn remove_long_words(&self, line: &str) -> String {
        self.long_word_re.replace_all(line, "").into_owned()
    }
}

pub fn is_tablature(token: &str) -> bool {
    TAB_TOKEN_RE.is_match(token)
}

/// Remove staff fragments such as `E|--------5-4-3---|` from a line.
pub fn remove_tablature(line: &str) -> String {
    TAB_FRAGMENT_RE.replace_all(line, "").into_owned()
}
