//! # Report Configuration
//!
//! Bonus tiers, output format and log level for the `tally` binary.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_BONUS_LEADER_BPS=2000                                        │
//! │     TALLY_OUTPUT_FORMAT=json                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config PATH, or                                                  │
//! │     ~/.config/tally/tally.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.tally.tally/tally.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     15% / 10% / 10% / 5% ... / 0% bonus tiers, table output            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [bonus]
//! leader_bps = 1500       # rank 0
//! runner_up_bps = 1000    # ranks 1..=runner_up_ranks
//! runner_up_ranks = 2
//! last_place_bps = 0      # last rank
//! base_bps = 500          # everyone else
//!
//! [output]
//! format = "table"        # table | json
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tally_core::{ProfitBonus, Rate};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

/// Upper bound for any bonus rate (100%).
pub const MAX_RATE_BPS: u32 = 10_000;

const CONFIG_FILE_NAME: &str = "tally.toml";

// =============================================================================
// Output Format
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One aligned line per seller plus a totals footer.
    #[default]
    Table,
    /// Pretty-printed JSON array of report rows.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::InvalidConfig(format!(
                "Unknown output format: '{}'. Valid options: table, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Bonus Settings
// =============================================================================

/// Bonus tiers in basis points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusSettings {
    #[serde(default = "default_leader_bps")]
    pub leader_bps: u32,

    #[serde(default = "default_runner_up_bps")]
    pub runner_up_bps: u32,

    /// How many ranks after the leader get the runner-up rate.
    #[serde(default = "default_runner_up_ranks")]
    pub runner_up_ranks: usize,

    #[serde(default)]
    pub last_place_bps: u32,

    #[serde(default = "default_base_bps")]
    pub base_bps: u32,
}

fn default_leader_bps() -> u32 {
    1500
}

fn default_runner_up_bps() -> u32 {
    1000
}

fn default_runner_up_ranks() -> usize {
    2
}

fn default_base_bps() -> u32 {
    500
}

impl Default for BonusSettings {
    fn default() -> Self {
        BonusSettings {
            leader_bps: default_leader_bps(),
            runner_up_bps: default_runner_up_bps(),
            runner_up_ranks: default_runner_up_ranks(),
            last_place_bps: 0,
            base_bps: default_base_bps(),
        }
    }
}

impl BonusSettings {
    /// Builds the bonus strategy these settings describe.
    pub fn policy(&self) -> ProfitBonus {
        ProfitBonus {
            leader: Rate::from_bps(self.leader_bps),
            runner_up: Rate::from_bps(self.runner_up_bps),
            runner_up_ranks: self.runner_up_ranks,
            last_place: Rate::from_bps(self.last_place_bps),
            base: Rate::from_bps(self.base_bps),
        }
    }

    fn rates(&self) -> [(&'static str, u32); 4] {
        [
            ("leader_bps", self.leader_bps),
            ("runner_up_bps", self.runner_up_bps),
            ("last_place_bps", self.last_place_bps),
            ("base_bps", self.base_bps),
        ]
    }
}

// =============================================================================
// Output / Logging Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `tally_core=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: default_log_level(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete `tally` configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub bonus: BonusSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl TallyConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (tally.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file without applying overrides.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CliResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(CliError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CliError::io(parent, e))?;
        }

        std::fs::write(&path, self.to_toml()?).map_err(|e| CliError::io(&path, e))?;

        info!(?path, "Config saved");
        Ok(path)
    }

    pub fn to_toml(&self) -> CliResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        for (name, bps) in self.bonus.rates() {
            if bps > MAX_RATE_BPS {
                return Err(CliError::InvalidConfig(format!(
                    "bonus.{} must be at most {} bps, got {}",
                    name, MAX_RATE_BPS, bps
                )));
            }
        }

        if self.logging.level.trim().is_empty() {
            return Err(CliError::InvalidConfig("logging.level must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `TALLY_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let bps_fields: [(&str, &mut u32); 4] = [
            ("TALLY_BONUS_LEADER_BPS", &mut self.bonus.leader_bps),
            ("TALLY_BONUS_RUNNER_UP_BPS", &mut self.bonus.runner_up_bps),
            ("TALLY_BONUS_LAST_PLACE_BPS", &mut self.bonus.last_place_bps),
            ("TALLY_BONUS_BASE_BPS", &mut self.bonus.base_bps),
        ];
        for (key, field) in bps_fields {
            if let Some(raw) = lookup(key) {
                match raw.trim().parse::<u32>() {
                    Ok(bps) => {
                        debug!(key, bps, "Overriding bonus rate from environment");
                        *field = bps;
                    }
                    Err(_) => warn!(key, value = %raw, "Ignoring non-numeric bonus rate"),
                }
            }
        }

        if let Some(raw) = lookup("TALLY_BONUS_RUNNER_UP_RANKS") {
            match raw.trim().parse::<usize>() {
                Ok(ranks) => self.bonus.runner_up_ranks = ranks,
                Err(_) => warn!(value = %raw, "Ignoring non-numeric runner-up rank count"),
            }
        }

        if let Some(raw) = lookup("TALLY_OUTPUT_FORMAT") {
            match raw.parse() {
                Ok(format) => {
                    debug!(%format, "Overriding output format from environment");
                    self.output.format = format;
                }
                Err(_) => warn!(value = %raw, "Unknown output format in environment"),
            }
        }

        if let Some(level) = lookup("TALLY_LOG") {
            self.logging.level = level;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// The bonus strategy for this configuration.
    pub fn bonus_policy(&self) -> ProfitBonus {
        self.bonus.policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(
            "table".parse::<OutputFormat>().unwrap(),
            OutputFormat::Table
        );
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_default_config_matches_reference_policy() {
        let config = TallyConfig::default();
        assert_eq!(config.bonus_policy(), ProfitBonus::default());
        assert_eq!(config.output.format, OutputFormat::Table);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: TallyConfig = toml::from_str("[bonus]\nleader_bps = 2000\n").unwrap();
        assert_eq!(config.bonus.leader_bps, 2000);
        assert_eq!(config.bonus.runner_up_bps, 1000);
        assert_eq!(config.bonus.base_bps, 500);
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_config_validation() {
        let mut config = TallyConfig::default();
        assert!(config.validate().is_ok());

        config.bonus.base_bps = MAX_RATE_BPS + 1;
        assert!(config.validate().unwrap_err().is_config_error());

        config.bonus.base_bps = MAX_RATE_BPS;
        assert!(config.validate().is_ok());

        config.logging.level = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = TallyConfig::default();
        config.apply_overrides(lookup_from(&[
            ("TALLY_BONUS_LEADER_BPS", "2500"),
            ("TALLY_BONUS_BASE_BPS", "not-a-number"),
            ("TALLY_BONUS_RUNNER_UP_RANKS", "1"),
            ("TALLY_OUTPUT_FORMAT", "json"),
            ("TALLY_LOG", "tally_core=debug"),
        ]));

        assert_eq!(config.bonus.leader_bps, 2500);
        assert_eq!(config.bonus.base_bps, 500);
        assert_eq!(config.bonus.runner_up_ranks, 1);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.logging.level, "tally_core=debug");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tally.toml");

        let mut config = TallyConfig::default();
        config.bonus.runner_up_ranks = 3;
        config.output.format = OutputFormat::Json;

        let written = config.save(Some(path.clone())).unwrap();
        assert_eq!(written, path);

        let reloaded = TallyConfig::from_file(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_invalid_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(&path, "[bonus]\nleader_bps = \"lots\"\n").unwrap();

        let err = TallyConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::ConfigLoadFailed(_)));
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = TallyConfig::default().to_toml().unwrap();
        assert!(toml_str.contains("[bonus]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("format = \"table\""));
    }
}
