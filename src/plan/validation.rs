use super::Plan;
use regex::Regex;
use std::path::{Component, Path};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanValidationError {
    #[error("Plan has no {0}: set an install, build or start command, or use language \"static\"")]
    MissingRequiredField(&'static str),

    #[error("Conflicting metadata `{key}`: {reason}")]
    ConflictingMetadata { key: &'static str, reason: String },

    #[error("Invalid build environment variable name: {0:?}")]
    InvalidBuildEnvKey(String),
}

pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, plan: &Plan) -> Result<(), PlanValidationError>;
}

pub struct RequiredCommandsRule;

impl ValidationRule for RequiredCommandsRule {
    fn name(&self) -> &'static str {
        "RequiredCommands"
    }

    fn validate(&self, plan: &Plan) -> Result<(), PlanValidationError> {
        if plan.has_any_command() || plan.is_static() {
            Ok(())
        } else {
            Err(PlanValidationError::MissingRequiredField("command"))
        }
    }
}

pub struct OutputDirRule;

impl ValidationRule for OutputDirRule {
    fn name(&self) -> &'static str {
        "OutputDir"
    }

    fn validate(&self, plan: &Plan) -> Result<(), PlanValidationError> {
        let Some(dir) = plan.metadata.output_dir_override.as_deref() else {
            return Ok(());
        };

        let conflict = |reason: &str| PlanValidationError::ConflictingMetadata {
            key: "output_dir_override",
            reason: format!("{:?} {}", dir, reason),
        };

        let path = Path::new(dir);
        if dir.trim().is_empty() {
            return Err(conflict("is empty"));
        }
        if path.is_absolute() {
            return Err(conflict("must be relative to the project root"));
        }
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(conflict("escapes the project root"));
        }
        Ok(())
    }
}

pub struct PackageNamesRule;

fn apt_package_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9][a-z0-9+.\-]*(:[a-z0-9\-]+)?(=[A-Za-z0-9.+~:\-]+)?$")
            .expect("static regex")
    })
}

impl ValidationRule for PackageNamesRule {
    fn name(&self) -> &'static str {
        "PackageNames"
    }

    fn validate(&self, plan: &Plan) -> Result<(), PlanValidationError> {
        match plan
            .metadata
            .custom_packages
            .iter()
            .find(|pkg| !apt_package_regex().is_match(pkg))
        {
            Some(pkg) => Err(PlanValidationError::ConflictingMetadata {
                key: "custom_packages",
                reason: format!("{:?} is not a valid APT package name", pkg),
            }),
            None => Ok(()),
        }
    }
}

pub struct BuildEnvKeysRule;

fn env_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
}

impl ValidationRule for BuildEnvKeysRule {
    fn name(&self) -> &'static str {
        "BuildEnvKeys"
    }

    fn validate(&self, plan: &Plan) -> Result<(), PlanValidationError> {
        match plan.build_env.keys().find(|key| !env_key_regex().is_match(key)) {
            Some(key) => Err(PlanValidationError::InvalidBuildEnvKey(key.clone())),
            None => Ok(()),
        }
    }
}

/// Runs every rule against a resolved plan, stopping at the first failure.
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    pub fn validate(&self, plan: &Plan) -> Result<(), PlanValidationError> {
        for rule in &self.rules {
            rule.validate(plan).map_err(|e| {
                tracing::debug!(rule = rule.name(), error = %e, "Plan validation failed");
                e
            })?;
        }
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            rules: vec![
                Box::new(RequiredCommandsRule),
                Box::new(OutputDirRule),
                Box::new(PackageNamesRule),
                Box::new(BuildEnvKeysRule),
            ],
        }
    }
}
