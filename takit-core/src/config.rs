//! `takit.toml` — optional defaults for the command line.
//!
//! Every section and key is optional; command-line flags override the file
//! and the file overrides the built-in defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::{DataSource, Interval};
use crate::domain::IndicatorSpec;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: DataSource,
    pub data_dir: PathBuf,
    pub ticker: String,
    pub interval: Interval,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Csv,
            data_dir: PathBuf::from("data"),
            ticker: "BTCUSDT".to_string(),
            interval: Interval::Day1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Rows printed from the end of the frame; `0` prints everything.
    pub tail: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { tail: 30 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TakitConfig {
    pub data: DataConfig,
    pub output: OutputConfig,
    /// Per-indicator default-length overrides, keyed by name or alias.
    pub lengths: BTreeMap<String, usize>,
    /// Indicators computed when none are named on the command line.
    #[serde(rename = "indicator")]
    pub indicators: Vec<IndicatorSpec>,
}

impl TakitConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Length override for an indicator, checked under each of its names.
    pub fn length_for<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Option<usize> {
        names.into_iter().find_map(|name| {
            self.lengths
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, &length)| length)
        })
    }
}
