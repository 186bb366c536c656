//! Runtime configuration
//!
//! Read from the environment at startup. The only setting is the location of
//! the default daily targets file.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::DailyTargets;

/// Environment variable naming the default targets file
pub const TARGETS_PATH_ENV: &str = "MACROTRACK_TARGETS_PATH";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read targets file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid targets file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Loaded configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub targets_path: PathBuf,
    /// Targets used when a preview request does not carry its own
    pub default_targets: DailyTargets,
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> ConfigResult<Self> {
        let targets_path = get_targets_path();
        let default_targets = load_targets(&targets_path)?;
        Ok(Self {
            targets_path,
            default_targets,
        })
    }
}

/// Get the targets path from environment or use default
pub fn get_targets_path() -> PathBuf {
    std::env::var(TARGETS_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
                    path = grandparent.to_path_buf();
                }
            }

            path.push("data");
            path.push("targets.json");
            path
        })
}

/// Load daily targets from a JSON file
///
/// A missing file means no default targets. An unreadable or malformed
/// file is an error.
pub fn load_targets(path: &Path) -> ConfigResult<DailyTargets> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No targets file at {}, starting without default targets", path.display());
            return Ok(DailyTargets::new());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let targets: DailyTargets =
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!("Loaded {} default targets from {}", targets.len(), path.display());
    Ok(targets)
}
