use crate::AppError::ConfigError;
use chordclean::{ChordCleaner, CleanerConfig, CleanerError, FrequencyStage, SelectionMode};
use clap::{Parser, ValueEnum};
use config::Config;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

mod config;

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            // use Display instead of Debug for user friendly error messages
            log::error!("{err}");
            1
        }
    });
}

pub fn main_result() -> Result<(), AppError> {
    // setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("chordclean=info"))
        .init();

    // args
    let args = CliArgs::parse();
    let input_file = args.input_file.as_ref().map(PathBuf::from);

    // check if input file exists
    if let Some(input_file) = &input_file {
        if !input_file.exists() {
            let err = ConfigError(format!("Input file not found {input_file:?}"));
            return Err(err);
        }
        log::info!("Reading chord sheets from {input_file:?}");
    }

    // stored defaults, or the file given explicitly
    let local_config = match args.config_file.as_ref().map(PathBuf::from) {
        Some(config_file) => Config::read_from(&config_file)?,
        None => Config::read_config()?,
    };
    let cleaner_config = args.apply(local_config.cleaner().clone());

    // read corpus
    let lines = match &input_file {
        Some(path) => read_lines(BufReader::new(File::open(path)?))?,
        None => read_lines(io::stdin().lock())?,
    };

    // go!
    let mut cleaner = ChordCleaner::new(cleaner_config)?;
    let (cleaned, report) = cleaner.clean_corpus_with_report(&lines);
    log::info!("{report:?}");
    if args.explain {
        explain_chords(&cleaner, &cleaned);
    }

    let mut out = BufWriter::new(io::stdout().lock());
    for line in cleaned {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

/// Log the structure of every distinct chord kept, once.
fn explain_chords(cleaner: &ChordCleaner, cleaned: &[String]) {
    let chords: BTreeSet<&str> = cleaned.iter().flat_map(|line| line.split(' ')).collect();
    for chord in chords.into_iter().filter(|chord| !chord.is_empty()) {
        match cleaner.validator().parse(chord) {
            Some(shape) => log::info!("{chord}: {shape:?}"),
            None => log::info!("{chord}: outside the chord grammar"),
        }
    }
}

fn read_lines(reader: impl BufRead) -> Result<Vec<String>, AppError> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Token,
    Line,
}

impl From<ModeArg> for SelectionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Token => Self::Token,
            ModeArg::Line => Self::Line,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FrequencyStageArg {
    AfterTokenize,
    AfterNoiseFilter,
    AfterValidation,
}

impl From<FrequencyStageArg> for FrequencyStage {
    fn from(stage: FrequencyStageArg) -> Self {
        match stage {
            FrequencyStageArg::AfterTokenize => Self::AfterTokenize,
            FrequencyStageArg::AfterNoiseFilter => Self::AfterNoiseFilter,
            FrequencyStageArg::AfterValidation => Self::AfterValidation,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Optional path to a file with one chord sheet per line, stdin otherwise.
    #[arg(long)]
    input_file: Option<String>,
    /// Optional path to a JSON configuration instead of the stored one.
    #[arg(long)]
    config_file: Option<String>,
    /// Tokens at least this long are dropped.
    #[arg(long)]
    char_threshold: Option<usize>,
    /// Tokens seen at most this many times in the corpus are dropped.
    #[arg(long)]
    freq_threshold: Option<usize>,
    /// Selection strategy.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Where negative selection runs.
    #[arg(long, value_enum)]
    frequency_stage: Option<FrequencyStageArg>,
    /// Disable the validation cache.
    #[arg(long, default_value_t = false)]
    no_memoize: bool,
    /// Log root, quality, extensions and bass of every chord kept.
    #[arg(long, default_value_t = false)]
    explain: bool,
}

impl CliArgs {
    /// Command line values win over the stored configuration.
    fn apply(&self, mut config: CleanerConfig) -> CleanerConfig {
        if let Some(char_threshold) = self.char_threshold {
            config.char_threshold = char_threshold;
        }
        if self.freq_threshold.is_some() {
            config.freq_threshold = self.freq_threshold;
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if let Some(stage) = self.frequency_stage {
            config.frequency_stage = stage.into();
        }
        if self.no_memoize {
            config.memoize = false;
        }
        config
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("other error: {0}")]
    OtherError(String),
}

impl From<CleanerError> for AppError {
    fn from(error: CleanerError) -> Self {
        match error {
            CleanerError::ConfigError(s) => Self::ConfigError(s),
            CleanerError::IoError(s) => Self::OtherError(s),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::OtherError(error.to_string())
    }
}
