//! Plan files: hand-written plans that replace detection

use super::Plan;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the plan file picked up from a project root when present
pub const DEFAULT_PLAN_FILE: &str = "dockplan.json";

#[derive(Debug, Error)]
pub enum PlanFileError {
    #[error("Failed to read plan file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse plan file as JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse plan file as YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    Json,
    Yaml,
}

impl PlanFormat {
    /// YAML for `.yaml`/`.yml`, JSON otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                PlanFormat::Yaml
            }
            _ => PlanFormat::Json,
        }
    }
}

pub fn parse_plan(content: &str, format: PlanFormat) -> Result<Plan, PlanFileError> {
    let plan = match format {
        PlanFormat::Json => serde_json::from_str(content)?,
        PlanFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(plan)
}

pub fn load_plan_file(path: &Path) -> Result<Plan, PlanFileError> {
    debug!("Loading plan file {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| PlanFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_plan(&content, PlanFormat::from_path(path))
}

/// The plan file to use for `root`: the explicit one, else the default file when
/// it exists in the root.
pub fn find_plan_file(root: &Path, explicit: Option<&Path>, default_name: &str) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidate = root.join(default_name);
    candidate.is_file().then_some(candidate)
}
