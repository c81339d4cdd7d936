//! Pipeline configuration.
//!
//! The configuration travels as an explicit value through the whole run;
//! there is no global style registry. It can be assembled with
//! [`PhylogenyConfigBuilder`] or loaded from a TOML file whose keys mirror
//! the builder setters in kebab-case.

use crate::core::scoring::ScoringScheme;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Failed to read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },
}

/// The two leaf labels whose common ancestor fixes the root position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgroupPair {
    pub a: String,
    pub b: String,
}

/// Display attributes applied uniformly during annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StyleConfig {
    /// Added to each emission maximum before color mapping, shifting the
    /// peak wavelength toward the apparent color.
    pub wavelength_offset: i32,
    pub font_size: u32,
    pub line_width: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            wavelength_offset: 15,
            font_size: 6,
            line_width: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhylogenyConfig {
    pub scheme: ScoringScheme,
    /// When absent the tree is left unrooted (as produced by neighbor
    /// joining).
    pub outgroup: Option<OutgroupPair>,
    pub style: StyleConfig,
}

impl Default for PhylogenyConfig {
    fn default() -> Self {
        Self {
            scheme: ScoringScheme::Blosum62,
            outgroup: None,
            style: StyleConfig::default(),
        }
    }
}

impl PhylogenyConfig {
    /// Loads a configuration from a TOML file, falling back to defaults for
    /// omitted keys.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: String::new(),
            message: e.to_string(),
        })?;

        let defaults = StyleConfig::default();
        Ok(Self {
            scheme: file.scheme.unwrap_or(ScoringScheme::Blosum62),
            outgroup: file.outgroup.map(|[a, b]| OutgroupPair { a, b }),
            style: StyleConfig {
                wavelength_offset: file.wavelength_offset.unwrap_or(defaults.wavelength_offset),
                font_size: file.font_size.unwrap_or(defaults.font_size),
                line_width: file.line_width.unwrap_or(defaults.line_width),
            },
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    scheme: Option<ScoringScheme>,
    outgroup: Option<[String; 2]>,
    wavelength_offset: Option<i32>,
    font_size: Option<u32>,
    line_width: Option<u32>,
}

#[derive(Default)]
pub struct PhylogenyConfigBuilder {
    scheme: Option<ScoringScheme>,
    outgroup: Option<OutgroupPair>,
    wavelength_offset: Option<i32>,
    font_size: Option<u32>,
    line_width: Option<u32>,
}

impl PhylogenyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheme(mut self, scheme: ScoringScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }
    pub fn outgroup(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.outgroup = Some(OutgroupPair {
            a: a.into(),
            b: b.into(),
        });
        self
    }
    pub fn wavelength_offset(mut self, offset: i32) -> Self {
        self.wavelength_offset = Some(offset);
        self
    }
    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }
    pub fn line_width(mut self, width: u32) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn build(self) -> Result<PhylogenyConfig, ConfigError> {
        let defaults = StyleConfig::default();
        Ok(PhylogenyConfig {
            scheme: self
                .scheme
                .ok_or(ConfigError::MissingParameter("scheme"))?,
            outgroup: self.outgroup,
            style: StyleConfig {
                wavelength_offset: self.wavelength_offset.unwrap_or(defaults.wavelength_offset),
                font_size: self.font_size.unwrap_or(defaults.font_size),
                line_width: self.line_width.unwrap_or(defaults.line_width),
            },
        })
    }
}
