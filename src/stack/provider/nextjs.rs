//! Next.js applications

use super::node_common::{base_node_plan, PackageJson};
use super::Provider;
use crate::fs::Project;
use crate::plan::Plan;
use regex::Regex;
use std::sync::OnceLock;

const CONFIG_FILES: &[&str] = &[
    "next.config.js",
    "next.config.mjs",
    "next.config.cjs",
    "next.config.ts",
];

/// Folder `next build` writes a static export to
const EXPORT_DIR: &str = "out";

pub struct NextJsProvider;

fn static_export_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"output\s*:\s*["'`]export["'`]"#).expect("static regex"))
}

impl NextJsProvider {
    fn is_static_export(project: &Project<'_>) -> bool {
        CONFIG_FILES
            .iter()
            .filter_map(|file| project.read(file))
            .any(|content| static_export_regex().is_match(&content))
    }
}

impl Provider for NextJsProvider {
    fn name(&self) -> &'static str {
        "nextjs"
    }

    fn matches(&self, project: &Project<'_>) -> bool {
        PackageJson::load(project)
            .map(|pkg| pkg.has_dependency("next"))
            .unwrap_or(false)
    }

    fn plan(&self, project: &Project<'_>) -> Plan {
        let pkg = PackageJson::load(project).unwrap_or_default();
        let (plan, pm) = base_node_plan(project, &pkg);

        let build = if pkg.has_script("build") {
            pm.run_script("build")
        } else {
            pm.exec("next build")
        };
        let plan = plan.with_build(build).with_framework("nextjs");

        if Self::is_static_export(project) {
            return plan.with_output_dir(EXPORT_DIR);
        }

        let start = if pkg.has_script("start") {
            pm.run_script("start")
        } else {
            pm.exec("next start")
        };
        plan.with_start(start)
    }
}
