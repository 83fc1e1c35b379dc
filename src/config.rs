//! Configuration
//!
//! Optional JSON settings for the command-line front end. Every field has a
//! default, so an empty object (or no file at all) is a valid configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::compositor::DEFAULT_PIXEL_GLYPH;
use crate::error::{Result, StrataError};

/// Default log filter when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Front-end settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompt printed before each command
    pub prompt: String,
    /// Glyph drawn per pixel by `print`
    pub pixel_glyph: String,
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Print the welcome banner on startup
    pub welcome: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: " > ".to_string(),
            pixel_glyph: DEFAULT_PIXEL_GLYPH.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            welcome: true,
        }
    }
}

impl Config {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| StrataError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| StrataError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.prompt, " > ");
        assert_eq!(config.pixel_glyph, "███");
        assert!(config.welcome);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("strata.json");
        std::fs::write(&path, r#"{ "prompt": "$ ", "welcome": false }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config,
            Config {
                prompt: "$ ".to_string(),
                welcome: false,
                ..Config::default()
            }
        );
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ prompt").unwrap();

        assert!(matches!(Config::load(&path), Err(StrataError::Config { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load_or_default(Some(Path::new("/nonexistent/strata.json")));
        assert!(matches!(result, Err(StrataError::Config { .. })));
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }
}
