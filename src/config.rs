use std::{
    fs::{create_dir_all, File},
    io::{BufReader, Write},
    path::PathBuf,
};

use chordclean::{CleanerConfig, CleanerError};
use home::home_dir;
use serde::{Deserialize, Serialize};

/// Cleaner defaults remembered between runs.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    cleaner: CleanerConfig,
}

impl Config {
    // folder placed in $HOME directory
    const FOLDER: &'static str = ".chordclean";

    pub fn cleaner(&self) -> &CleanerConfig {
        &self.cleaner
    }

    fn get_base_path() -> Result<PathBuf, CleanerError> {
        let home = home_dir().ok_or_else(|| {
            CleanerError::ConfigError("Could not find home directory".to_string())
        })?;
        Ok(home.join(Self::FOLDER))
    }

    fn get_path() -> Result<PathBuf, CleanerError> {
        let base = Self::get_base_path()?;
        Ok(base.join("config.json"))
    }

    /// Creates config if it does not exist
    pub fn read_config() -> Result<Self, CleanerError> {
        let base_path = Self::get_base_path()?;
        if !base_path.exists() {
            create_dir_all(base_path)?;
        }
        let config_path = Self::get_path()?;
        if !config_path.exists() {
            // create default config
            Config::default().save_config()?;
        }
        Self::read_from(&config_path)
    }

    /// Read a config file given on the command line, nothing is created.
    pub fn read_from(path: &PathBuf) -> Result<Self, CleanerError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader).map_err(|err| {
            CleanerError::ConfigError(format!("Could not read configuration {path:?} {err:}"))
        })?;
        config.cleaner.validate()?;
        Ok(config)
    }

    /// Assumes the config folder exists
    pub fn save_config(&self) -> Result<(), CleanerError> {
        let config_path = Self::get_path()?;
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            CleanerError::ConfigError(format!("Could not save local configuration {err:}"))
        })?;
        let mut file = File::create(config_path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
