//! # CLI Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CLI Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Input       │  │       Report            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Io             │  │  Report (tally-core)    │ │
//! │  │  ConfigLoad     │  │  Json           │  │                         │ │
//! │  │  ConfigSave     │  │                 │  │                         │ │
//! │  │  ConfigExists   │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// `config init` without `--force` on an existing file.
    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("No config path available on this platform; pass --config")]
    NoConfigPath,

    // =========================================================================
    // Input / Output Errors
    // =========================================================================
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(String),

    // =========================================================================
    // Report Errors
    // =========================================================================
    #[error(transparent)]
    Report(#[from] tally_core::ReportError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::ConfigSaveFailed(err.to_string())
    }
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CliError::InvalidConfig(_)
                | CliError::ConfigLoadFailed(_)
                | CliError::ConfigSaveFailed(_)
                | CliError::ConfigExists(_)
                | CliError::NoConfigPath
        )
    }
}
