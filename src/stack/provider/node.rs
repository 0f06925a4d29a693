//! Generic Node.js applications

use super::node_common::{base_node_plan, PackageJson};
use super::Provider;
use crate::fs::Project;
use crate::plan::Plan;

/// Entry points tried, in order, when neither a start script nor `main` exists
const ENTRY_FILES: &[&str] = &["server.js", "index.js", "app.js", "main.js"];

/// Server frameworks reported in plan metadata
const SERVER_FRAMEWORKS: &[(&str, &str)] = &[
    ("@nestjs/core", "nestjs"),
    ("@remix-run/serve", "remix"),
    ("nuxt", "nuxt"),
    ("fastify", "fastify"),
    ("koa", "koa"),
    ("hono", "hono"),
    ("express", "express"),
];

pub struct NodeProvider;

impl NodeProvider {
    fn framework(pkg: &PackageJson) -> Option<&'static str> {
        SERVER_FRAMEWORKS
            .iter()
            .find(|(dep, _)| pkg.has_dependency(dep))
            .map(|(_, name)| *name)
    }
}

impl Provider for NodeProvider {
    fn name(&self) -> &'static str {
        "node"
    }

    fn matches(&self, project: &Project<'_>) -> bool {
        project.has_file("package.json")
    }

    fn plan(&self, project: &Project<'_>) -> Plan {
        let pkg = PackageJson::load(project).unwrap_or_default();
        let (mut plan, pm) = base_node_plan(project, &pkg);

        if pkg.has_script("build") {
            plan = plan.with_build(pm.run_script("build"));
        }

        let start = if pkg.has_script("start") {
            Some(pm.run_script("start"))
        } else if let Some(main) = pkg.main.as_deref().filter(|m| project.has_file(m)) {
            Some(format!("node {}", main))
        } else {
            project
                .first_existing(ENTRY_FILES)
                .map(|entry| format!("node {}", entry))
        };
        if let Some(start) = start {
            plan = plan.with_start(start);
        }

        if let Some(framework) = Self::framework(&pkg) {
            plan = plan.with_framework(framework);
        }
        plan
    }
}
