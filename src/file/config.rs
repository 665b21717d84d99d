use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::DisambiguationConfig;
use crate::theory::{ParseError, PitchClass, StringSet, Tuning};

pub const CONFIG_FILE: &str = "fretboard.cfg";
const CONFIG_DIRECTORY: &str = "fretboard_voicings";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub fretboard: FretboardConfig,
    pub engine: DisambiguationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub voicing_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            voicing_file: "assets/voicings/c_maj7.yaml".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FretboardConfig {
    pub string_count: StringSet,
    pub fret_count: u8,
    /// Open-string pitches, highest string first. Standard tuning when empty.
    pub tuning: Vec<String>,
}

impl Default for FretboardConfig {
    fn default() -> Self {
        Self {
            string_count: StringSet::Six,
            fret_count: 24,
            tuning: Vec::new(),
        }
    }
}

impl FretboardConfig {
    pub fn tuning(&self) -> Result<Tuning, ConfigError> {
        if self.tuning.is_empty() {
            return Ok(Tuning::standard(self.string_count));
        }
        let pitches = self
            .tuning
            .iter()
            .map(|pitch| pitch.parse::<PitchClass>())
            .collect::<Result<Vec<_>, _>>()?;
        Tuning::from_pitches(self.string_count, &pitches).ok_or(ConfigError::TuningLength {
            expected: self.string_count.count(),
            got: pitches.len(),
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error while reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid tuning: {0}")]
    Tuning(#[from] ParseError),

    #[error("Tuning lists {got} strings, the fretboard has {expected}")]
    TuningLength { expected: usize, got: usize },
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let config = match locate_config() {
            Some(path) => load_config(&path).unwrap_or_else(|e| {
                warn!("Ignoring config at '{}': {e}", path.display());
                AppConfig::default()
            }),
            None => {
                warn!("No {CONFIG_FILE} found, using defaults");
                AppConfig::default()
            }
        };
        app.insert_resource(config);
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    config.fretboard.tuning()?;
    Ok(config)
}

/// Working directory first, then the user config directory.
pub fn locate_config() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    let mut path = dirs::config_dir()?;
    path.push(CONFIG_DIRECTORY);
    path.push(CONFIG_FILE);
    path.exists().then_some(path)
}
