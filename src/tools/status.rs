//! Status Tool
//!
//! Provides runtime status information about the macrotrack service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::Config;
use crate::models::NutrientKey;

/// Runtime status of the macrotrack service
#[derive(Debug, Clone, Serialize)]
pub struct MacrotrackStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Configuration
    pub targets_path: String,
    pub targets_file_present: bool,
    pub default_targets: Vec<NutrientKey>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    targets_path: PathBuf,
    default_targets: Vec<NutrientKey>,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(config: &Config) -> Self {
        Self {
            start_time: Instant::now(),
            targets_path: config.targets_path.clone(),
            default_targets: config.default_targets.iter().map(|(key, _)| key).collect(),
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> MacrotrackStatus {
        let build_info = BuildInfo::current();

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        MacrotrackStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            targets_path: self.targets_path.display().to_string(),
            targets_file_present: self.targets_path.is_file(),
            default_targets: self.default_targets.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyTargets, Target};

    #[test]
    fn test_status_reports_configuration() {
        let config = Config {
            targets_path: PathBuf::from("/nonexistent/targets.json"),
            default_targets: DailyTargets::new().with(NutrientKey::Protein, Target::new(120.0)),
        };
        let status = StatusTracker::new(&config).get_status();
        assert_eq!(status.targets_path, "/nonexistent/targets.json");
        assert!(!status.targets_file_present);
        assert_eq!(status.default_targets, vec![NutrientKey::Protein]);
        assert_eq!(status.process_id, std::process::id());
    }
}
