//! CLI Module
//!
//! Command-line interface for the Strata compositor.

pub mod commands;
pub mod repl;

use clap::Parser;
use std::path::PathBuf;

use crate::error::{Result, StrataError};
use crate::layers::CanvasSize;

/// Strata - compose BMP images as a tree of blended layers
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(version, about, long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Canvas width in pixels
    pub width: String,

    /// Canvas height in pixels
    pub height: String,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Validate the positional canvas dimensions
    pub fn canvas(&self) -> Result<CanvasSize> {
        parse_canvas_size(&self.width, &self.height)
    }
}

/// Parse canvas dimensions: digits only, each at least 1
pub fn parse_canvas_size(width: &str, height: &str) -> Result<CanvasSize> {
    let parse = |value: &str| -> Result<u32> {
        let invalid = || StrataError::InvalidCanvasSize {
            value: value.to_string(),
        };
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        match value.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(invalid()),
        }
    };

    Ok(CanvasSize::new(parse(width)?, parse(height)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from(["strata", "12", "8", "--config", "s.json"]);
        assert_eq!(cli.canvas().unwrap(), CanvasSize::new(12, 8));
        assert_eq!(cli.config, Some(PathBuf::from("s.json")));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_negative_size_reaches_canvas_check() {
        let cli = Cli::try_parse_from(["strata", "4", "-4"]).unwrap();
        assert!(matches!(
            cli.canvas(),
            Err(StrataError::InvalidCanvasSize { .. })
        ));
    }

    #[test]
    fn test_missing_height_is_rejected() {
        assert!(Cli::try_parse_from(["strata", "12"]).is_err());
    }

    #[test_case("0", "5" ; "zero width")]
    #[test_case("5", "-5" ; "negative height")]
    #[test_case("5x", "5" ; "trailing garbage")]
    #[test_case("99999999999", "5" ; "overflow")]
    fn test_invalid_canvas(width: &str, height: &str) {
        assert!(matches!(
            parse_canvas_size(width, height),
            Err(StrataError::InvalidCanvasSize { .. })
        ));
    }
}
