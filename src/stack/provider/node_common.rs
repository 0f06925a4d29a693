use crate::fs::Project;
use crate::plan::{Language, Plan, NODE_LINES};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// The subset of `package.json` detection cares about
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub engines: BTreeMap<String, String>,
    #[serde(default)]
    pub package_manager: Option<String>,
}

impl PackageJson {
    pub fn load(project: &Project<'_>) -> Option<Self> {
        project.read_json("package.json")
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }

    pub fn has_script(&self, name: &str) -> bool {
        self.scripts
            .get(name)
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
}

impl PackageManager {
    /// The `packageManager` field wins over lockfiles; npm is the fallback.
    pub fn detect(project: &Project<'_>, pkg: &PackageJson) -> Self {
        if let Some(declared) = pkg.package_manager.as_deref() {
            let tool = declared.split('@').next().unwrap_or_default();
            match tool {
                "pnpm" => return PackageManager::Pnpm,
                "yarn" => return PackageManager::Yarn,
                "npm" => return PackageManager::Npm,
                _ => {}
            }
        }

        if project.has_file("pnpm-lock.yaml") {
            PackageManager::Pnpm
        } else if project.has_file("yarn.lock") {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
        }
    }

    pub fn install_command(&self, project: &Project<'_>) -> String {
        match self {
            PackageManager::Npm => {
                if project.has_any(&["package-lock.json", "npm-shrinkwrap.json"]) {
                    "npm ci".to_string()
                } else {
                    "npm install".to_string()
                }
            }
            PackageManager::Pnpm => {
                if project.has_file("pnpm-lock.yaml") {
                    "corepack enable && pnpm install --frozen-lockfile".to_string()
                } else {
                    "corepack enable && pnpm install".to_string()
                }
            }
            PackageManager::Yarn => {
                if project.has_file(".yarnrc.yml") {
                    "corepack enable && yarn install --immutable".to_string()
                } else {
                    "corepack enable && yarn install --frozen-lockfile".to_string()
                }
            }
        }
    }

    pub fn run_script(&self, script: &str) -> String {
        format!("{} run {}", self.as_str(), script)
    }

    /// Invocation of a binary installed by a dependency
    pub fn exec(&self, bin: &str) -> String {
        match self {
            PackageManager::Npm => format!("npx {}", bin),
            PackageManager::Pnpm => format!("pnpm exec {}", bin),
            PackageManager::Yarn => format!("yarn {}", bin),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Major version out of an exact pin (`v20.11.0`, `=18.19.0`, `20`).
pub fn normalize_node_version(version_str: &str) -> Option<String> {
    let major = version_str
        .trim()
        .trim_start_matches(|c: char| matches!(c, 'v' | '='))
        .split(|c: char| !c.is_ascii_digit())
        .next()?;

    if major.is_empty() {
        None
    } else {
        Some(major.to_string())
    }
}

/// Node major version pinned by `.nvmrc`/`.node-version`, else the line
/// `engines.node` resolves to.
pub fn detect_node_version(project: &Project<'_>, pkg: &PackageJson) -> Option<String> {
    for file_name in [".nvmrc", ".node-version"] {
        if let Some(content) = project.read(file_name) {
            if let Some(version) = normalize_node_version(&content) {
                return Some(version);
            }
        }
    }

    pkg.engines.get("node").and_then(|range| NODE_LINES.resolve(range))
}

/// Plan skeleton shared by every node provider: language, package manager,
/// install command and runtime version.
pub fn base_node_plan(project: &Project<'_>, pkg: &PackageJson) -> (Plan, PackageManager) {
    let pm = PackageManager::detect(project, pkg);
    let plan = Plan::new(Language::Node)
        .with_package_manager(pm.as_str())
        .with_install(pm.install_command(project))
        .with_runtime_version(detect_node_version(project, pkg));
    (plan, pm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn project_with(files: &[(&str, &str)]) -> MockFileSystem {
        let mut fs = MockFileSystem::new();
        for (path, content) in files {
            fs.add_file(path, content);
        }
        fs
    }

    #[test]
    fn test_normalize_node_version() {
        assert_eq!(normalize_node_version("v20.11.0\n"), Some("20".to_string()));
        assert_eq!(normalize_node_version("=18.19.0"), Some("18".to_string()));
        assert_eq!(normalize_node_version("20"), Some("20".to_string()));
        assert_eq!(normalize_node_version(">=18 <21"), None);
        assert_eq!(normalize_node_version("^22.1.0"), None);
        assert_eq!(normalize_node_version("lts/iron"), None);
        assert_eq!(normalize_node_version(""), None);
    }

    #[test]
    fn test_package_manager_from_field() {
        let fs = project_with(&[("yarn.lock", "")]);
        let root = fs.root().to_path_buf();
        let project = Project::new(&fs, &root);
        let pkg = PackageJson {
            package_manager: Some("pnpm@9.1.0".to_string()),
            ..Default::default()
        };
        assert_eq!(PackageManager::detect(&project, &pkg), PackageManager::Pnpm);
    }

    #[test]
    fn test_package_manager_from_lockfiles() {
        let fs = project_with(&[("yarn.lock", "")]);
        let root = fs.root().to_path_buf();
        let project = Project::new(&fs, &root);
        let pkg = PackageJson::default();
        assert_eq!(PackageManager::detect(&project, &pkg), PackageManager::Yarn);

        let fs = project_with(&[("package.json", "{}")]);
        let project = Project::new(&fs, &root);
        assert_eq!(PackageManager::detect(&project, &pkg), PackageManager::Npm);
    }

    #[test]
    fn test_install_commands() {
        let fs = project_with(&[("package-lock.json", "{}")]);
        let root = fs.root().to_path_buf();
        let project = Project::new(&fs, &root);
        assert_eq!(PackageManager::Npm.install_command(&project), "npm ci");
        assert_eq!(
            PackageManager::Pnpm.install_command(&project),
            "corepack enable && pnpm install"
        );

        let fs = project_with(&[(".yarnrc.yml", "nodeLinker: node-modules")]);
        let project = Project::new(&fs, &root);
        assert_eq!(PackageManager::Npm.install_command(&project), "npm install");
        assert_eq!(
            PackageManager::Yarn.install_command(&project),
            "corepack enable && yarn install --immutable"
        );
    }

    #[test]
    fn test_script_invocations() {
        assert_eq!(PackageManager::Npm.run_script("build"), "npm run build");
        assert_eq!(PackageManager::Yarn.run_script("start"), "yarn run start");
        assert_eq!(PackageManager::Npm.exec("next start"), "npx next start");
        assert_eq!(PackageManager::Pnpm.exec("next build"), "pnpm exec next build");
    }

    #[test]
    fn test_node_version_file_wins_over_engines() {
        let fs = project_with(&[(".nvmrc", "v18.19.0")]);
        let root = fs.root().to_path_buf();
        let project = Project::new(&fs, &root);
        let mut pkg = PackageJson::default();
        pkg.engines.insert("node".to_string(), "^20.10".to_string());

        assert_eq!(detect_node_version(&project, &pkg), Some("18".to_string()));

        let fs = project_with(&[]);
        let project = Project::new(&fs, &root);
        assert_eq!(detect_node_version(&project, &pkg), Some("20".to_string()));
    }

    #[test]
    fn test_engines_range_resolves_to_published_line() {
        let fs = project_with(&[]);
        let root = fs.root().to_path_buf();
        let project = Project::new(&fs, &root);
        let engines = |range: &str| {
            let mut pkg = PackageJson::default();
            pkg.engines.insert("node".to_string(), range.to_string());
            detect_node_version(&project, &pkg)
        };

        assert_eq!(engines(">=16"), None);
        assert_eq!(engines(">=18 <21"), Some("20".to_string()));
        assert_eq!(engines("18.x || 20.x"), Some("20".to_string()));
        assert_eq!(engines("^16.14"), Some("^16.14".to_string()));
    }

    #[test]
    fn test_has_script_ignores_blank() {
        let pkg: PackageJson =
            serde_json::from_str(r#"{"scripts": {"build": "vite build", "start": " "}}"#).unwrap();
        assert!(pkg.has_script("build"));
        assert!(!pkg.has_script("start"));
        assert!(!pkg.has_script("test"));
    }
}
