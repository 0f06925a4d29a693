//! Go modules

use super::Provider;
use crate::fs::Project;
use crate::plan::{Language, Plan, GO_LINES};
use regex::Regex;
use std::sync::OnceLock;

const BINARY: &str = "app";

fn go_directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^go\s+(\d+)\.(\d+)").expect("static regex"))
}

/// `major.minor` of the `go` directive in `go.mod`. The directive is the
/// minimum toolchain the module needs.
pub fn go_directive(go_mod: &str) -> Option<String> {
    go_directive_regex()
        .captures(go_mod)
        .map(|caps| format!("{}.{}", &caps[1], &caps[2]))
}

pub struct GoProvider;

impl GoProvider {
    /// Package to build: the module root when it holds `main.go`, else the first
    /// command under `cmd/`.
    fn build_target(project: &Project<'_>) -> String {
        if project.has_file("main.go") {
            return ".".to_string();
        }
        project
            .list_dirs("cmd")
            .into_iter()
            .find(|dir| project.has_file(&format!("cmd/{}/main.go", dir)))
            .map(|dir| format!("./cmd/{}", dir))
            .unwrap_or_else(|| ".".to_string())
    }
}

impl Provider for GoProvider {
    fn name(&self) -> &'static str {
        "go"
    }

    fn matches(&self, project: &Project<'_>) -> bool {
        project.has_file("go.mod")
    }

    fn plan(&self, project: &Project<'_>) -> Plan {
        let version = project
            .read("go.mod")
            .and_then(|c| go_directive(&c))
            .and_then(|minimum| GO_LINES.resolve(&format!(">={}", minimum)));

        Plan::new(Language::Go)
            .with_package_manager("go")
            .with_install("go mod download")
            .with_build(format!(
                "go build -o {} {}",
                BINARY,
                Self::build_target(project)
            ))
            .with_start(format!("./{}", BINARY))
            .with_runtime_version(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    const GO_MOD: &str = "module example.com/api\n\ngo 1.22.3\n\nrequire github.com/go-chi/chi/v5 v5.0.12\n";

    #[test]
    fn test_go_directive() {
        assert_eq!(go_directive(GO_MOD), Some("1.22".to_string()));
        assert_eq!(go_directive("module x\n"), None);
        assert_eq!(go_directive("// go 1.21 is required\n"), None);
    }

    #[test]
    fn test_root_main_package() {
        let fs = MockFileSystem::new()
            .with_file("go.mod", GO_MOD)
            .with_file("main.go", "package main");
        let root = fs.root().to_path_buf();
        let plan = GoProvider.plan(&Project::new(&fs, &root));

        assert_eq!(plan.install_command, "go mod download");
        assert_eq!(plan.build_command, "go build -o app .");
        assert_eq!(plan.start_command, "./app");
        assert_eq!(plan.metadata.runtime_version, None);
    }

    #[test]
    fn test_directive_is_a_minimum() {
        let version_for = |directive: &str| {
            let fs = MockFileSystem::new()
                .with_file("go.mod", &format!("module x\n\ngo {}\n", directive))
                .with_file("main.go", "package main");
            let root = fs.root().to_path_buf();
            GoProvider.plan(&Project::new(&fs, &root)).metadata.runtime_version
        };

        assert_eq!(version_for("1.20"), None);
        assert_eq!(version_for("1.24.1"), Some("1.24".to_string()));
        assert_eq!(version_for("1.26"), Some(">=1.26".to_string()));
    }

    #[test]
    fn test_cmd_layout() {
        let fs = MockFileSystem::new()
            .with_file("go.mod", GO_MOD)
            .with_file("cmd/server/main.go", "package main")
            .with_file("internal/db/db.go", "package db");
        let root = fs.root().to_path_buf();
        let plan = GoProvider.plan(&Project::new(&fs, &root));

        assert_eq!(plan.build_command, "go build -o app ./cmd/server");
    }
}
