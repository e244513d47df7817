use crate::cleaner::cleaner_config::{CleanerConfig, FrequencyStage, SelectionMode};
use crate::cleaner::homogenizer::homogenize;
use crate::cleaner::noise_filter::{remove_tablature, NoiseFilter};
use crate::cleaner::normalizer::{map_symbols, normalize_token};
use crate::cleaner::selection::{select_chords, FrequencyFilter};
use crate::cleaner::tokenizer::{
    erode, remove_leading_parentheses, remove_non_chord_words, tokenize,
};
use crate::cleaner::validator::ChordValidator;
use crate::CleanerError;

/// Token counts collected during one corpus run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub lines: usize,
    /// Tokens produced by the tokenizer
    pub tokens_in: usize,
    /// Tokens without any root note
    pub eroded: usize,
    /// Tablature, overlong words and other line noise
    pub noise_rejected: usize,
    /// Tokens not shaped like a chord
    pub grammar_rejected: usize,
    /// Tokens dropped by negative selection
    pub rare_removed: usize,
    pub accepted: usize,
    pub cache_hits: usize,
}

/// Tokens of every line of the corpus, in order
type Corpus = Vec<Vec<String>>;

fn count_tokens(corpus: &[Vec<String>]) -> usize {
    corpus.iter().map(Vec::len).sum()
}

/// Runs the cleaning stages over a corpus of raw chord sheets.
///
/// Stages run corpus-wide one after the other so negative selection always
/// sees complete counts, wherever it is placed.
#[derive(Debug)]
pub struct ChordCleaner {
    config: CleanerConfig,
    validator: ChordValidator,
    frequency_filter: FrequencyFilter,
}

impl ChordCleaner {
    pub fn new(config: CleanerConfig) -> Result<Self, CleanerError> {
        config.validate()?;
        let noise_filter = NoiseFilter::new(config.char_threshold)?;
        Ok(Self {
            validator: ChordValidator::new(noise_filter, config.memoize),
            frequency_filter: FrequencyFilter::new(config.freq_threshold),
            config,
        })
    }

    pub const fn config(&self) -> &CleanerConfig {
        &self.config
    }

    pub const fn validator(&self) -> &ChordValidator {
        &self.validator
    }

    /// Clean a single line, treated as a corpus of its own.
    pub fn clean_line(&mut self, line: &str) -> String {
        self.clean_corpus(&[line]).pop().unwrap_or_default()
    }

    /// Clean every line; the output has one entry per input line, in order.
    pub fn clean_corpus<S: AsRef<str>>(&mut self, lines: &[S]) -> Vec<String> {
        self.clean_corpus_with_report(lines).0
    }

    pub fn clean_corpus_with_report<S: AsRef<str>>(
        &mut self,
        lines: &[S],
    ) -> (Vec<String>, CleanReport) {
        self.validator.reset();
        let mut report = CleanReport {
            lines: lines.len(),
            ..CleanReport::default()
        };
        log::info!(
            "Cleaning {} lines in {} mode (char_threshold={} freq_threshold={:?} frequency_stage={})",
            lines.len(),
            self.config.mode,
            self.config.char_threshold,
            self.config.freq_threshold,
            self.config.frequency_stage
        );

        // tokenize
        let mut corpus: Corpus = Vec::with_capacity(lines.len());
        for line in lines {
            let (raw_count, tokens) = self.tokenize_line(line.as_ref());
            report.tokens_in += raw_count;
            corpus.push(tokens);
        }
        let tokenized = count_tokens(&corpus);
        report.eroded = report.tokens_in - tokenized;
        log::debug!("tokenize: {} -> {tokenized} tokens", report.tokens_in);
        self.frequency_barrier(FrequencyStage::AfterTokenize, &mut corpus, &mut report);

        // noise removal & homogenization
        let before = count_tokens(&corpus);
        corpus = corpus
            .into_iter()
            .map(|tokens| self.remove_noise(tokens))
            .collect();
        let after = count_tokens(&corpus);
        report.noise_rejected = before.saturating_sub(after);
        log::debug!("noise filter: {before} -> {after} tokens");
        self.frequency_barrier(FrequencyStage::AfterNoiseFilter, &mut corpus, &mut report);

        // chord selection
        let before = count_tokens(&corpus);
        corpus = corpus
            .into_iter()
            .map(|tokens| self.select(tokens))
            .collect();
        let after = count_tokens(&corpus);
        // line mode may split glued chords like `C|G`, so more can come out
        report.grammar_rejected = before.saturating_sub(after);
        log::debug!("chord selection: {before} -> {after} tokens");
        self.frequency_barrier(FrequencyStage::AfterValidation, &mut corpus, &mut report);

        report.accepted = count_tokens(&corpus);
        report.cache_hits = self.validator.cache().hits();
        log::info!(
            "Cleaned {} lines: {} of {} tokens accepted",
            report.lines,
            report.accepted,
            report.tokens_in
        );
        let cleaned = corpus.into_iter().map(|tokens| tokens.join(" ")).collect();
        (cleaned, report)
    }

    /// Returns the raw token count and the tokens handed to the next stage.
    fn tokenize_line(&self, line: &str) -> (usize, Vec<String>) {
        match self.config.mode {
            SelectionMode::Token => {
                let tokens = tokenize(line);
                let eroded = tokens
                    .iter()
                    .map(|token| erode(token))
                    .filter(|token| !token.is_empty())
                    .map(str::to_string)
                    .collect();
                (tokens.len(), eroded)
            }
            SelectionMode::Line => {
                let tokens = tokenize(&map_symbols(line));
                (tokens.len(), tokens)
            }
        }
    }

    fn remove_noise(&mut self, tokens: Vec<String>) -> Vec<String> {
        match self.config.mode {
            SelectionMode::Token => tokens
                .into_iter()
                .filter_map(|token| {
                    let normalized = normalize_token(&token);
                    if normalized.is_empty() {
                        return None;
                    }
                    if let Some(rejection) = self.validator.screen(&normalized) {
                        log::trace!("{normalized:?} rejected as {rejection:?}");
                        return None;
                    }
                    Some(homogenize(&normalized))
                })
                .collect(),
            SelectionMode::Line => {
                let line = remove_leading_parentheses(&tokens.join(" "));
                let line = self.validator.noise_filter().remove_long_words(&line);
                let line = remove_tablature(&line);
                let line = remove_non_chord_words(&line);
                homogenize(&line)
                    .split_whitespace()
                    .map(str::to_string)
                    .collect()
            }
        }
    }

    fn select(&mut self, tokens: Vec<String>) -> Vec<String> {
        match self.config.mode {
            SelectionMode::Token => tokens
                .into_iter()
                .filter(|candidate| self.validator.is_chord(candidate))
                .collect(),
            SelectionMode::Line => select_chords(&tokens.join(" "))
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    fn frequency_barrier(
        &self,
        stage: FrequencyStage,
        corpus: &mut [Vec<String>],
        report: &mut CleanReport,
    ) {
        if stage != self.config.frequency_stage || !self.frequency_filter.is_enabled() {
            return;
        }
        let removed = self.frequency_filter.apply(corpus);
        report.rare_removed += removed;
        log::debug!("negative selection at {stage}: {removed} tokens removed");
    }
}
