//! Overrides read from `DOCKPLAN_*` environment variables

use super::Overrides;
use crate::config::ConfigError;
use crate::plan::StaticServer;
use std::env;

pub const INSTALL_CMD: &str = "DOCKPLAN_INSTALL_CMD";
pub const BUILD_CMD: &str = "DOCKPLAN_BUILD_CMD";
pub const START_CMD: &str = "DOCKPLAN_START_CMD";
pub const STATIC_SERVER: &str = "DOCKPLAN_STATIC_SERVER";
pub const OUTPUT_DIR: &str = "DOCKPLAN_OUTPUT_DIR";
pub const SPA: &str = "DOCKPLAN_SPA";
pub const NO_SPA: &str = "DOCKPLAN_NO_SPA";
pub const PACKAGES: &str = "DOCKPLAN_PACKAGES";
pub const BASE_IMAGE: &str = "DOCKPLAN_BASE_IMAGE";
pub const RUNTIME_VERSION: &str = "DOCKPLAN_RUNTIME_VERSION";

pub struct EnvOverrides;

impl EnvOverrides {
    pub fn from_env() -> Result<Overrides, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the environment layer from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Overrides, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let flag = |key: &str| {
            text(key)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };

        let static_server = text(STATIC_SERVER)
            .map(|v| v.parse::<StaticServer>())
            .transpose()
            .map_err(|e| ConfigError::ParseError {
                field: STATIC_SERVER.to_string(),
                error: e.to_string(),
            })?;

        Ok(Overrides {
            install_command: text(INSTALL_CMD),
            build_command: text(BUILD_CMD),
            start_command: text(START_CMD),
            static_server,
            output_dir: text(OUTPUT_DIR),
            enable_spa: flag(SPA),
            disable_spa: flag(NO_SPA),
            packages: text(PACKAGES)
                .map(|list| split_package_list(&list))
                .unwrap_or_default(),
            build_env: Default::default(),
            base_image: text(BASE_IMAGE),
            runtime_version: text(RUNTIME_VERSION),
        })
    }
}

/// `"curl, wget,,git"` becomes `["curl", "wget", "git"]`.
pub fn split_package_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
