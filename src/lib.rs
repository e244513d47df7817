//! Chordclean - chord progression cleaning for scraped chord sheets
//!
//! This library provides:
//! - Tokenization and erosion of noisy chord sheet lines
//! - Removal of tablature staves and garbage tokens
//! - Homogenization of chord spellings (`C7M` -> `Cmaj7`, `A+` -> `Aaug`, ...)
//! - Chord grammar validation and corpus-wide negative selection
//!
//! # Example
//!
//! ```
//! use chordclean::{ChordCleaner, CleanerConfig};
//!
//! let mut cleaner = ChordCleaner::new(CleanerConfig::default()).unwrap();
//! let cleaned = cleaner.clean_corpus(&["Intro: Am7/G C7M", "A|---5-4-3---| D Fmaj7(9)"]);
//! assert_eq!(cleaned, vec!["Am7/G Cmaj7", "D Fmaj7(9)"]);
//! ```

pub mod cleaner;
pub mod error;

// Re-export main types for convenience
pub use cleaner::{
    cleaner_config::{CleanerConfig, FrequencyStage, SelectionMode},
    homogenizer::homogenize,
    noise_filter::{NoiseFilter, Rejection, DEFAULT_CHAR_THRESHOLD},
    pipeline::{ChordCleaner, CleanReport},
    selection::{positive_selection, FrequencyFilter, FrequencyTable},
    tokenizer::{erode, tokenize},
    validator::{parse_token, ChordShape, ChordValidator, ValidationCache},
};
pub use error::CleanerError;
