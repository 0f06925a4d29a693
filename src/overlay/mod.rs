//! Override layers applied on top of a detected or loaded plan.
//!
//! Rules per field:
//!
//! - Commands, static server, output directory, base image and runtime version:
//!   the last non-empty value wins. Absent or empty values leave the plan as is.
//! - SPA: a disable signal removes the flag and beats an enable in the same layer.
//! - Packages: appended, duplicates dropped, first occurrence kept.
//! - Build env: a non-empty map replaces the previous one wholesale.
//!
//! [`overlay`] applies a single layer. [`OverlayResolver`] applies the
//! environment and CLI layers in priority order.

pub mod env;
pub mod resolver;

pub use env::EnvOverrides;
pub use resolver::{Layer, LayerKind, OverlayResolver};

use crate::plan::{dedup_packages, Plan, StaticServer};
use std::collections::BTreeMap;
use tracing::debug;

/// One layer of user overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub install_command: Option<String>,
    pub build_command: Option<String>,
    pub start_command: Option<String>,
    pub static_server: Option<StaticServer>,
    pub output_dir: Option<String>,
    pub enable_spa: bool,
    pub disable_spa: bool,
    pub packages: Vec<String>,
    pub build_env: BTreeMap<String, String>,
    pub base_image: Option<String>,
    pub runtime_version: Option<String>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Overrides::default()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn set_command(target: &mut String, value: &Option<String>, field: &str) {
    if let Some(value) = non_empty(value) {
        debug!(field, value, "Applying override");
        *target = value.to_string();
    }
}

fn set_optional(target: &mut Option<String>, value: &Option<String>, field: &str) {
    if let Some(value) = non_empty(value) {
        debug!(field, value, "Applying override");
        *target = Some(value.to_string());
    }
}

/// Everything except packages, which the resolver orders separately.
pub(crate) fn apply_scalars(mut plan: Plan, layer: &Overrides) -> Plan {
    set_command(&mut plan.install_command, &layer.install_command, "install_command");
    set_command(&mut plan.build_command, &layer.build_command, "build_command");
    set_command(&mut plan.start_command, &layer.start_command, "start_command");

    let metadata = &mut plan.metadata;
    if let Some(server) = layer.static_server {
        debug!(field = "static_server", value = %server, "Applying override");
        metadata.static_server = Some(server);
    }
    set_optional(&mut metadata.output_dir_override, &layer.output_dir, "output_dir_override");
    set_optional(&mut metadata.base_image, &layer.base_image, "base_image");
    set_optional(&mut metadata.runtime_version, &layer.runtime_version, "runtime_version");

    if layer.disable_spa {
        debug!(field = "is_spa", value = false, "Applying override");
        metadata.is_spa = false;
    } else if layer.enable_spa {
        debug!(field = "is_spa", value = true, "Applying override");
        metadata.is_spa = true;
    }

    if !layer.build_env.is_empty() {
        debug!(
            field = "build_env",
            keys = layer.build_env.len(),
            "Replacing build environment"
        );
        plan.build_env = layer.build_env.clone();
    }
    plan
}

pub(crate) fn append_packages(mut plan: Plan, packages: &[String]) -> Plan {
    let additions: Vec<String> = packages
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    if additions.is_empty() {
        return plan;
    }

    debug!(packages = ?additions, "Adding system packages");
    let existing = std::mem::take(&mut plan.metadata.custom_packages);
    plan.metadata.custom_packages = dedup_packages(existing.into_iter().chain(additions));
    plan
}

/// Apply a single override layer to `plan`.
pub fn overlay(plan: Plan, layer: &Overrides) -> Plan {
    let plan = apply_scalars(plan, layer);
    append_packages(plan, &layer.packages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Language;

    fn detected() -> Plan {
        let mut plan = Plan::new(Language::Node)
            .with_install("npm ci")
            .with_build("npm run build")
            .with_output_dir("dist")
            .with_spa(true);
        plan.metadata.custom_packages = vec!["git".to_string()];
        plan.build_env
            .insert("NODE_ENV".to_string(), "production".to_string());
        plan
    }

    #[test]
    fn test_empty_layer_is_identity() {
        let plan = detected();
        assert_eq!(overlay(plan.clone(), &Overrides::default()), plan);
    }

    #[test]
    fn test_scalars_replace_when_non_empty() {
        let layer = Overrides {
            install_command: Some("pnpm install".to_string()),
            build_command: Some("   ".to_string()),
            start_command: Some("node server.js".to_string()),
            static_server: Some(StaticServer::Nginx),
            base_image: Some("node:20-bookworm".to_string()),
            ..Default::default()
        };
        let plan = overlay(detected(), &layer);

        assert_eq!(plan.install_command, "pnpm install");
        assert_eq!(plan.build_command, "npm run build");
        assert_eq!(plan.start_command, "node server.js");
        assert_eq!(plan.metadata.static_server, Some(StaticServer::Nginx));
        assert_eq!(plan.metadata.base_image.as_deref(), Some("node:20-bookworm"));
        assert_eq!(plan.metadata.output_dir_override.as_deref(), Some("dist"));
    }

    #[test]
    fn test_disable_spa_wins_within_layer() {
        let layer = Overrides {
            enable_spa: true,
            disable_spa: true,
            ..Default::default()
        };
        assert!(!overlay(detected(), &layer).metadata.is_spa);

        let enable = Overrides {
            enable_spa: true,
            ..Default::default()
        };
        assert!(overlay(Plan::new(Language::Static), &enable).metadata.is_spa);
    }

    #[test]
    fn test_packages_append_and_dedup() {
        let layer = Overrides {
            packages: vec![
                "curl".to_string(),
                "git".to_string(),
                " ".to_string(),
                "curl".to_string(),
            ],
            ..Default::default()
        };
        let plan = overlay(detected(), &layer);
        assert_eq!(plan.metadata.custom_packages, vec!["git", "curl"]);
    }

    #[test]
    fn test_build_env_replaced_wholesale() {
        let mut layer = Overrides::default();
        layer
            .build_env
            .insert("API_URL".to_string(), "https://api".to_string());
        let plan = overlay(detected(), &layer);

        assert_eq!(plan.build_env.len(), 1);
        assert_eq!(plan.build_env.get("API_URL").map(String::as_str), Some("https://api"));
    }

    #[test]
    fn test_overlay_is_idempotent() {
        let layer = Overrides {
            start_command: Some("npm start".to_string()),
            packages: vec!["curl".to_string()],
            disable_spa: true,
            ..Default::default()
        };
        let once = overlay(detected(), &layer);
        let twice = overlay(once.clone(), &layer);
        assert_eq!(once, twice);
    }
}
