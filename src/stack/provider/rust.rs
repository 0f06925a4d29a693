//! Cargo packages

use super::Provider;
use crate::fs::Project;
use crate::plan::{Language, Plan};
use regex::Regex;
use std::sync::OnceLock;

fn toolchain_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\.(\d+)").expect("static regex"))
}

/// `1.75` out of `1.75.0`. Channel names such as `stable` carry no version.
pub fn normalize_rust_version(raw: &str) -> Option<String> {
    toolchain_version_regex()
        .captures(raw.trim())
        .map(|caps| format!("{}.{}", &caps[1], &caps[2]))
}

pub struct RustProvider;

impl RustProvider {
    fn manifest(project: &Project<'_>) -> Option<toml::Value> {
        project.read_toml::<toml::Value>("Cargo.toml")
    }

    /// First declared `[[bin]]`, else the package name.
    fn binary_name(manifest: &toml::Value) -> Option<String> {
        manifest
            .get("bin")
            .and_then(|bins| bins.as_array())
            .and_then(|bins| bins.iter().find_map(|b| b.get("name")?.as_str()))
            .or_else(|| manifest.get("package")?.get("name")?.as_str())
            .map(str::to_string)
    }

    /// Toolchain pinned by `rust-toolchain.toml`/`rust-toolchain`. The
    /// manifest's `rust-version` is only a minimum, which the stable image meets.
    fn detect_version(project: &Project<'_>) -> Option<String> {
        if let Some(toolchain) = project.read_toml::<toml::Value>("rust-toolchain.toml") {
            return toolchain
                .get("toolchain")
                .and_then(|t| t.get("channel"))
                .and_then(|c| c.as_str())
                .and_then(normalize_rust_version);
        }
        project
            .read("rust-toolchain")
            .and_then(|c| normalize_rust_version(&c))
    }
}

impl Provider for RustProvider {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn matches(&self, project: &Project<'_>) -> bool {
        Self::manifest(project)
            .map(|m| m.get("package").is_some())
            .unwrap_or(false)
    }

    fn plan(&self, project: &Project<'_>) -> Plan {
        let manifest = Self::manifest(project).unwrap_or(toml::Value::Table(Default::default()));

        let mut plan = Plan::new(Language::Rust)
            .with_package_manager("cargo")
            .with_install("cargo fetch")
            .with_build("cargo build --release")
            .with_runtime_version(Self::detect_version(project));

        if let Some(bin) = Self::binary_name(&manifest) {
            plan = plan.with_start(format!("./target/release/{}", bin));
        }
        plan
    }
}
