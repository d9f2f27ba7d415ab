//! Configuration file handling.
//!
//! This module provides loading and parsing of `.antipattern_search.json`
//! configuration files. The file is optional; without it the built-in catalogue
//! is used.
//!
//! ```json
//! {
//!   "catalogue": {
//!     "type": "file",
//!     "path": "./patterns.json",
//!     "include_builtin": true
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::catalogue::{Catalogue, CatalogueError};

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".antipattern_search.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    FileReadFailed { path: String, message: String },

    #[error("Invalid JSON in {path}: {message}")]
    InvalidJson { path: String, message: String },
}

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub catalogue: CatalogueSource,
}

/// Where anti-pattern templates come from.
///
/// JSON format uses a "type" field with lowercase variant names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogueSource {
    /// The built-in anti-patterns
    #[default]
    Builtin,
    /// A catalogue JSON file, optionally on top of the built-in patterns
    File {
        path: PathBuf,
        #[serde(default)]
        include_builtin: bool,
    },
}

impl ConfigFile {
    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the JSON is invalid.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidJson {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from an explicit path, or from
    /// `.antipattern_search.json` if it exists, or fall back to defaults.
    ///
    /// An explicitly given path must exist.
    pub fn resolve(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            return Self::load_from(path);
        }

        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::load_from(&default_path);
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }
}

impl CatalogueSource {
    /// Build the catalogue this source describes.
    pub fn load(&self) -> Result<Catalogue, CatalogueError> {
        match self {
            Self::Builtin => Catalogue::builtin(),
            Self::File {
                path,
                include_builtin,
            } => {
                let from_file = Catalogue::from_file(path)?;
                if !include_builtin {
                    return Ok(from_file);
                }
                let mut catalogue = Catalogue::builtin()?;
                catalogue.extend(from_file)?;
                Ok(catalogue)
            }
        }
    }
}
