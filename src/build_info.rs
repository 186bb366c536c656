//! Build information module
//!
//! Compile-time build number and timestamp, embedded by `build.rs`, and the
//! startup banner printed before the server takes over stdio.

use std::fmt;

use serde::Serialize;

use crate::config::Config;
use crate::models::NutrientKey;

/// Build number, incremented on each recompilation
pub const BUILD_NUMBER: u64 = match option_env!("MACROTRACK_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("MACROTRACK_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut result: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return None;
        }
        result = result * 10 + (b - b'0') as u64;
        i += 1;
    }
    Some(result)
}

/// Build information structure for serialization
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            description: DESCRIPTION,
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{} (build {}, compiled {})",
            self.name, self.version, self.build_number, self.build_timestamp
        )
    }
}

/// Banner lines describing this build and the loaded configuration
pub fn startup_banner(config: &Config) -> Vec<String> {
    let rule = "=".repeat(47);
    let targets = if config.default_targets.is_empty() {
        "none".to_string()
    } else {
        config
            .default_targets
            .iter()
            .map(|(key, target)| format!("{}={}", key, target))
            .collect::<Vec<_>>()
            .join(", ")
    };

    vec![
        rule.clone(),
        format!("  {}", BuildInfo::current()),
        format!("  Nutrients tracked: {}", NutrientKey::ALL.len()),
        format!("  Targets file: {}", config.targets_path.display()),
        format!("  Default targets: {}", targets),
        rule,
    ]
}

/// Print the startup banner to stderr (stdout carries the MCP transport)
pub fn print_startup_banner(config: &Config) {
    for line in startup_banner(config) {
        eprintln!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyTargets, Target};

    #[test]
    fn test_parse_u64() {
        assert_eq!(parse_u64("42"), Some(42));
        assert_eq!(parse_u64("0"), Some(0));
        assert_eq!(parse_u64(""), None);
        assert_eq!(parse_u64("4a"), None);
    }

    #[test]
    fn test_display_names_package() {
        let info = BuildInfo::current();
        assert_eq!(info.name, "macrotrack");
        assert!(info.to_string().starts_with("macrotrack v"));
    }

    #[test]
    fn test_banner_lists_targets() {
        let config = Config {
            targets_path: "data/targets.json".into(),
            default_targets: DailyTargets::new()
                .with(NutrientKey::Calories, Target::new(2000.0))
                .with(NutrientKey::Protein, Target::allowing_over(120.0)),
        };
        let banner = startup_banner(&config);
        assert_eq!(banner.len(), 6);
        assert!(banner.contains(&"  Default targets: calories=2000, protein=120+".to_string()));

        let banner = startup_banner(&Config::default());
        assert!(banner.contains(&"  Default targets: none".to_string()));
    }
}
