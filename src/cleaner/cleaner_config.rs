use crate::cleaner::noise_filter::DEFAULT_CHAR_THRESHOLD;
use crate::CleanerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How chords are picked out of a line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Tokenize, erode and validate every token against the chord grammar
    #[default]
    Token,
    /// Clean the whole line with patterns, then keep chord-shaped substrings
    Line,
}

/// Where negative selection sits in the stage sequence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyStage {
    /// Count raw tokens, before tablature and long words are removed
    AfterTokenize,
    /// Count after noise removal and homogenization, before chord selection
    AfterNoiseFilter,
    /// Count accepted chord tokens only
    #[default]
    AfterValidation,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => write!(f, "token"),
            Self::Line => write!(f, "line"),
        }
    }
}

impl fmt::Display for FrequencyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AfterTokenize => write!(f, "after_tokenize"),
            Self::AfterNoiseFilter => write!(f, "after_noise_filter"),
            Self::AfterValidation => write!(f, "after_validation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Tokens at least this long are dropped as garbage
    pub char_threshold: usize,
    /// Tokens seen at most this many times in the corpus are dropped, `None` disables it
    pub freq_threshold: Option<usize>,
    pub mode: SelectionMode,
    pub frequency_stage: FrequencyStage,
    /// Remember validation verdicts during a run
    pub memoize: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            char_threshold: DEFAULT_CHAR_THRESHOLD,
            freq_threshold: None,
            mode: SelectionMode::default(),
            frequency_stage: FrequencyStage::default(),
            memoize: true,
        }
    }
}

impl CleanerConfig {
    pub fn validate(&self) -> Result<(), CleanerError> {
        if self.char_threshold == 0 {
            return Err(CleanerError::ConfigError(
                "char_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, CleanerError> {
        let config: Self = serde_json::from_str(json).map_err(|err| {
            CleanerError::ConfigError(format!("Could not read cleaner configuration {err:}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CleanerConfig::default();
        assert_eq!(config.char_threshold, 20);
        assert_eq!(config.freq_threshold, None);
        assert_eq!(config.mode, SelectionMode::Token);
        assert_eq!(config.frequency_stage, FrequencyStage::AfterValidation);
        assert!(config.memoize);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config =
            CleanerConfig::from_json(r#"{"freq_threshold": 2, "mode": "line"}"#).unwrap();
        assert_eq!(config.freq_threshold, Some(2));
        assert_eq!(config.mode, SelectionMode::Line);
        assert_eq!(config.char_threshold, 20);
    }

    #[test]
    fn test_invalid_json() {
        let negative = CleanerConfig::from_json(r#"{"freq_threshold": -1}"#);
        assert!(matches!(negative, Err(CleanerError::ConfigError(_))));

        let zero = CleanerConfig::from_json(r#"{"char_threshold": 0}"#);
        assert!(matches!(zero, Err(CleanerError::ConfigError(_))));

        let stage = CleanerConfig::from_json(r#"{"frequency_stage": "sometimes"}"#);
        assert!(matches!(stage, Err(CleanerError::ConfigError(_))));
    }
}
