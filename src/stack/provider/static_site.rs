//! Plain HTML sites served as-is

use super::Provider;
use crate::fs::Project;
use crate::plan::{Language, Plan};

pub struct StaticSiteProvider;

impl Provider for StaticSiteProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    fn matches(&self, project: &Project<'_>) -> bool {
        project.has_any(&["index.html", "public/index.html"])
    }

    fn plan(&self, project: &Project<'_>) -> Plan {
        let plan = Plan::new(Language::Static);
        if project.has_file("index.html") {
            plan
        } else {
            plan.with_output_dir("public")
        }
    }
}
