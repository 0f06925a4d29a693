use super::metadata::deserialize_null_default;
use super::{Language, Metadata};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Build instructions for one application.
///
/// An empty command means the corresponding stage is skipped. Top-level keys are
/// closed: a plan file with an unknown key fails to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,

    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub install_command: String,

    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub build_command: String,

    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub start_command: String,

    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_null_default"
    )]
    pub build_env: BTreeMap<String, String>,

    #[serde(
        default,
        skip_serializing_if = "Metadata::is_empty",
        deserialize_with = "deserialize_null_default"
    )]
    pub metadata: Metadata,
}

impl Plan {
    pub fn new(language: Language) -> Self {
        Self {
            language: Some(language),
            ..Default::default()
        }
    }

    pub fn with_package_manager(mut self, package_manager: impl Into<String>) -> Self {
        self.package_manager = Some(package_manager.into());
        self
    }

    pub fn with_install(mut self, command: impl Into<String>) -> Self {
        self.install_command = command.into();
        self
    }

    pub fn with_build(mut self, command: impl Into<String>) -> Self {
        self.build_command = command.into();
        self
    }

    pub fn with_start(mut self, command: impl Into<String>) -> Self {
        self.start_command = command.into();
        self
    }

    pub fn with_runtime_version(mut self, version: Option<String>) -> Self {
        self.metadata.runtime_version = version;
        self
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.metadata.framework = Some(framework.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
        self.metadata.output_dir_override = Some(dir.into());
        self
    }

    pub fn with_spa(mut self, is_spa: bool) -> Self {
        self.metadata.is_spa = is_spa;
        self
    }

    pub fn is_static(&self) -> bool {
        self.language == Some(Language::Static)
    }

    pub fn has_any_command(&self) -> bool {
        !self.install_command.is_empty()
            || !self.build_command.is_empty()
            || !self.start_command.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize plan to JSON")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize plan to YAML")
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json() {
            Ok(json) => write!(f, "{}", json),
            Err(e) => write!(f, "Error formatting plan: {}", e),
        }
    }
}
