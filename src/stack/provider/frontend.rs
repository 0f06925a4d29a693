//! Client-side frontends that compile to a folder of static files

use super::node_common::{base_node_plan, PackageJson};
use super::Provider;
use crate::fs::Project;
use crate::plan::Plan;
use regex::Regex;
use std::sync::OnceLock;

/// A build tool whose output is served as static files
#[derive(Debug, Clone, Copy)]
pub struct FrontendTool {
    pub dependency: &'static str,
    pub name: &'static str,
    pub output_dir: &'static str,
    /// Uses client-side routing, so unknown paths must fall back to index.html
    pub spa: bool,
}

/// Checked in order; more specific tools come before the generic bundlers they
/// build on.
pub const FRONTEND_TOOLS: &[FrontendTool] = &[
    FrontendTool {
        dependency: "@angular/core",
        name: "angular",
        output_dir: "dist",
        spa: true,
    },
    FrontendTool {
        dependency: "react-scripts",
        name: "create-react-app",
        output_dir: "build",
        spa: true,
    },
    FrontendTool {
        dependency: "@vue/cli-service",
        name: "vue-cli",
        output_dir: "dist",
        spa: true,
    },
    FrontendTool {
        dependency: "@sveltejs/adapter-static",
        name: "sveltekit",
        output_dir: "build",
        spa: false,
    },
    FrontendTool {
        dependency: "astro",
        name: "astro",
        output_dir: "dist",
        spa: false,
    },
    FrontendTool {
        dependency: "gatsby",
        name: "gatsby",
        output_dir: "public",
        spa: false,
    },
    FrontendTool {
        dependency: "@docusaurus/core",
        name: "docusaurus",
        output_dir: "build",
        spa: false,
    },
    FrontendTool {
        dependency: "vite",
        name: "vite",
        output_dir: "dist",
        spa: true,
    },
];

/// Dependencies that mean the project runs its own server
pub const SERVER_DEPENDENCIES: &[&str] = &[
    "express",
    "fastify",
    "koa",
    "hono",
    "@nestjs/core",
    "@remix-run/serve",
    "nuxt",
    "@sveltejs/adapter-node",
    "@sveltejs/adapter-auto",
];

const VITE_CONFIG_FILES: &[&str] = &[
    "vite.config.ts",
    "vite.config.js",
    "vite.config.mjs",
    "vite.config.mts",
];

fn vite_out_dir_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"outDir\s*:\s*["'`]([^"'`]+)["'`]"#).expect("static regex"))
}

pub struct FrontendProvider;

impl FrontendProvider {
    pub fn find_tool(pkg: &PackageJson) -> Option<&'static FrontendTool> {
        FRONTEND_TOOLS
            .iter()
            .find(|tool| pkg.has_dependency(tool.dependency))
    }

    fn runs_server(pkg: &PackageJson) -> bool {
        SERVER_DEPENDENCIES.iter().any(|dep| pkg.has_dependency(dep))
    }

    /// Output folder, honoring explicit config where the tool allows one.
    fn output_dir(project: &Project<'_>, pkg: &PackageJson, tool: &FrontendTool) -> String {
        match tool.name {
            "vite" => VITE_CONFIG_FILES
                .iter()
                .filter_map(|file| project.read(file))
                .find_map(|content| {
                    vite_out_dir_regex()
                        .captures(&content)
                        .map(|caps| caps[1].trim_start_matches("./").to_string())
                })
                .unwrap_or_else(|| tool.output_dir.to_string()),
            // Angular's application builder nests the bundle under the project name
            "angular" => match pkg.name.as_deref() {
                Some(name) if !name.is_empty() => format!("dist/{}/browser", name),
                _ => tool.output_dir.to_string(),
            },
            _ => tool.output_dir.to_string(),
        }
    }
}

impl Provider for FrontendProvider {
    fn name(&self) -> &'static str {
        "frontend"
    }

    fn matches(&self, project: &Project<'_>) -> bool {
        let Some(pkg) = PackageJson::load(project) else {
            return false;
        };
        Self::find_tool(&pkg).is_some() && pkg.has_script("build") && !Self::runs_server(&pkg)
    }

    fn plan(&self, project: &Project<'_>) -> Plan {
        let pkg = PackageJson::load(project).unwrap_or_default();
        let (plan, pm) = base_node_plan(project, &pkg);
        let plan = plan.with_build(pm.run_script("build"));

        match Self::find_tool(&pkg) {
            Some(tool) => plan
                .with_framework(tool.name)
                .with_output_dir(Self::output_dir(project, &pkg, tool))
                .with_spa(tool.spa),
            None => plan,
        }
    }
}
