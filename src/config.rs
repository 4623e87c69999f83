//! Command-line settings and logging setup

use crate::{DeckError, Result};
use serde::{Deserialize, Serialize};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How much the tool reports while it works
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VerbosityLevel {
    /// Results only
    Silent = 0,
    /// Warnings, e.g. duplicate card codes
    Minimal = 1,
    /// Load summaries (default)
    #[default]
    Normal = 2,
    /// Skipped codes and every rule decision
    Verbose = 3,
}

impl VerbosityLevel {
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            VerbosityLevel::Silent => LevelFilter::Off,
            VerbosityLevel::Minimal => LevelFilter::Warn,
            VerbosityLevel::Normal => LevelFilter::Info,
            VerbosityLevel::Verbose => LevelFilter::Debug,
        }
    }
}

/// Accepts names or numbers: silent/0, minimal/1, normal/2, verbose/3
impl FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityLevel::Silent),
            "minimal" | "1" => Ok(VerbosityLevel::Minimal),
            "normal" | "2" => Ok(VerbosityLevel::Normal),
            "verbose" | "3" => Ok(VerbosityLevel::Verbose),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

/// Defaults for the CLI, read from a JSON file and overridden by flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Card-database JSON file or directory of pack files
    pub catalog: Option<PathBuf>,
    /// Taboo list JSON
    pub taboo: Option<PathBuf>,
    /// Which taboo set to apply from the taboo file
    pub taboo_id: Option<u32>,
    pub verbosity: VerbosityLevel,
    /// Seed for draws; fixed so runs are reproducible
    pub seed: u64,
}

impl Settings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| DeckError::InvalidConfig(format!("Bad settings JSON: {e}")))
    }

    /// Catalog path, which every command needs
    pub fn require_catalog(&self) -> Result<&Path> {
        self.catalog.as_deref().ok_or_else(|| {
            DeckError::InvalidConfig("no card catalog given (use --cards or settings)".to_string())
        })
    }
}

/// Install the terminal logger at the given verbosity
pub fn init_logging(verbosity: VerbosityLevel) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_time_level(LevelFilter::Off)
        .build();
    TermLogger::init(
        verbosity.level_filter(),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_names_and_numbers() {
        assert_eq!("verbose".parse::<VerbosityLevel>(), Ok(VerbosityLevel::Verbose));
        assert_eq!("0".parse::<VerbosityLevel>(), Ok(VerbosityLevel::Silent));
        assert_eq!("Normal".parse::<VerbosityLevel>(), Ok(VerbosityLevel::Normal));
        assert!("loud".parse::<VerbosityLevel>().is_err());
        assert_eq!(VerbosityLevel::Minimal.level_filter(), LevelFilter::Warn);
    }

    #[test]
    fn test_settings_from_json() {
        let settings = Settings::parse(
            r#"{"catalog": "data/cards.json", "taboo_id": 4, "verbosity": "verbose", "seed": 7}"#,
        )
        .unwrap();
        assert_eq!(settings.catalog, Some(PathBuf::from("data/cards.json")));
        assert_eq!(settings.taboo_id, Some(4));
        assert_eq!(settings.verbosity, VerbosityLevel::Verbose);
        assert_eq!(settings.seed, 7);
        assert!(settings.require_catalog().is_ok());
    }

    #[test]
    fn test_settings_defaults_and_errors() {
        let settings = Settings::parse("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(matches!(
            settings.require_catalog(),
            Err(DeckError::InvalidConfig(_))
        ));
        assert!(Settings::parse(r#"{"colour": true}"#).is_err());
    }
}
