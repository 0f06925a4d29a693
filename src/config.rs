//! Runtime configuration
//!
//! Settings are read from environment variables with defaults:
//!
//! - `DOCKPLAN_LOG_LEVEL`: trace, debug, info, warn or error - default: "info"
//! - `DOCKPLAN_LOG_JSON`: JSON log output (true|false) - default: "false"
//! - `DOCKPLAN_PLAN_FILE`: plan file looked up in the project root - default: "dockplan.json"
//! - `DOCKPLAN_OUTPUT_DIR_NAME`: directory the Dockerfile is written to - default: ".dockplan"
//! - `DOCKPLAN_PARALLEL_DETECTION`: evaluate providers concurrently - default: "false"
//!
//! Build overrides (`DOCKPLAN_INSTALL_CMD` and friends) are a separate layer, see
//! [`crate::overlay::env`].

use crate::plan::DEFAULT_PLAN_FILE;
use crate::util::logging::try_parse_level;
use std::env;
use std::fmt;
use std::path::{Component, Path};
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_OUTPUT_DIR_NAME: &str = ".dockplan";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockplanConfig {
    pub log_level: String,
    pub log_json: bool,
    /// File name of the plan file, relative to the project root
    pub plan_file: String,
    /// Directory, relative to the project root, receiving the generated Dockerfile
    pub output_dir_name: String,
    pub parallel_detection: bool,
}

fn parse_flag(value: Option<String>) -> bool {
    value
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

impl Default for DockplanConfig {
    fn default() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }
}

impl DockplanConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            log_level: non_empty("DOCKPLAN_LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
            log_json: parse_flag(lookup("DOCKPLAN_LOG_JSON")),
            plan_file: non_empty("DOCKPLAN_PLAN_FILE")
                .unwrap_or_else(|| DEFAULT_PLAN_FILE.to_string()),
            output_dir_name: non_empty("DOCKPLAN_OUTPUT_DIR_NAME")
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR_NAME.to_string()),
            parallel_detection: parse_flag(lookup("DOCKPLAN_PARALLEL_DETECTION")),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if try_parse_level(&self.log_level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        if !is_plain_relative(&self.output_dir_name) {
            return Err(ConfigError::ValidationFailed(format!(
                "Output directory name must be a relative path inside the project: {}",
                self.output_dir_name
            )));
        }

        if Path::new(&self.plan_file).is_absolute() {
            return Err(ConfigError::ValidationFailed(format!(
                "Plan file must be relative to the project root: {}",
                self.plan_file
            )));
        }

        Ok(())
    }
}

fn is_plain_relative(path: &str) -> bool {
    let path = Path::new(path);
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

impl fmt::Display for DockplanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dockplan Configuration:")?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        writeln!(f, "  Plan File: {}", self.plan_file)?;
        writeln!(f, "  Output Dir: {}", self.output_dir_name)?;
        writeln!(f, "  Parallel Detection: {}", self.parallel_detection)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> DockplanConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DockplanConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]);
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert_eq!(config.plan_file, "dockplan.json");
        assert_eq!(config.output_dir_name, ".dockplan");
        assert!(!config.parallel_detection);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("DOCKPLAN_LOG_LEVEL", "DEBUG"),
            ("DOCKPLAN_LOG_JSON", "true"),
            ("DOCKPLAN_PLAN_FILE", "deploy/plan.yaml"),
            ("DOCKPLAN_OUTPUT_DIR_NAME", "build/docker"),
            ("DOCKPLAN_PARALLEL_DETECTION", "1"),
        ]);
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
        assert_eq!(config.plan_file, "deploy/plan.yaml");
        assert_eq!(config.output_dir_name, "build/docker");
        assert!(config.parallel_detection);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_with(&[("DOCKPLAN_PLAN_FILE", "  "), ("DOCKPLAN_LOG_LEVEL", "")]);
        assert_eq!(config.plan_file, "dockplan.json");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_every_parseable_level_validates() {
        for level in ["trace", "debug", "info", "warn", "warning", "error", "WARNING"] {
            let config = config_with(&[("DOCKPLAN_LOG_LEVEL", level)]);
            assert!(config.validate().is_ok(), "{level} should be accepted");
        }
    }

    #[test]
    fn test_validation_failures() {
        let mut config = config_with(&[("DOCKPLAN_LOG_LEVEL", "chatty")]);
        assert!(config.validate().is_err());

        config.log_level = "warn".to_string();
        config.output_dir_name = "../outside".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));

        config.output_dir_name = "/abs".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_default_reads_process_env() {
        env::set_var("DOCKPLAN_OUTPUT_DIR_NAME", "out/docker");
        let config = DockplanConfig::default();
        env::remove_var("DOCKPLAN_OUTPUT_DIR_NAME");

        assert_eq!(config.output_dir_name, "out/docker");
    }

    #[test]
    fn test_display() {
        let display = config_with(&[]).to_string();
        assert!(display.contains("Dockplan Configuration:"));
        assert!(display.contains("Plan File: dockplan.json"));
    }
}
