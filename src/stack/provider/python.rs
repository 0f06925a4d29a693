//! Python applications

use super::Provider;
use crate::fs::Project;
use crate::plan::{Language, Plan, PYTHON_LINES};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

const MANIFESTS: &[&str] = &["requirements.txt", "pyproject.toml", "Pipfile", "setup.py"];

/// Files that may define a FastAPI `app`, with the module path uvicorn expects
const ASGI_MODULES: &[(&str, &str)] = &[
    ("main.py", "main"),
    ("app.py", "app"),
    ("app/main.py", "app.main"),
    ("src/main.py", "src.main"),
];

const BIND: &str = "0.0.0.0:8000";

fn minor_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)").expect("static regex"))
}

fn requirement_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._\-]*)").expect("static regex"))
}

/// `3.12` out of a pin such as `3.12.4` or `python-3.12.4`.
pub fn normalize_python_version(raw: &str) -> Option<String> {
    minor_version_regex()
        .captures(raw)
        .map(|caps| format!("{}.{}", &caps[1], &caps[2]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PythonPackageManager {
    Pip,
    Poetry,
    Pipenv,
}

impl PythonPackageManager {
    fn detect(project: &Project<'_>, pyproject: Option<&toml::Value>) -> Self {
        let poetry_section = pyproject
            .and_then(|doc| doc.get("tool"))
            .and_then(|tool| tool.get("poetry"))
            .is_some();

        if project.has_file("poetry.lock") || poetry_section {
            PythonPackageManager::Poetry
        } else if project.has_any(&["Pipfile", "Pipfile.lock"]) {
            PythonPackageManager::Pipenv
        } else {
            PythonPackageManager::Pip
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PythonPackageManager::Pip => "pip",
            PythonPackageManager::Poetry => "poetry",
            PythonPackageManager::Pipenv => "pipenv",
        }
    }

    fn install_command(&self, project: &Project<'_>) -> String {
        match self {
            PythonPackageManager::Pip if project.has_file("requirements.txt") => {
                "pip install --no-cache-dir -r requirements.txt".to_string()
            }
            PythonPackageManager::Pip => "pip install --no-cache-dir .".to_string(),
            PythonPackageManager::Poetry => "pip install --no-cache-dir poetry \
                && poetry config virtualenvs.create false \
                && poetry install --no-interaction --no-root"
                .to_string(),
            PythonPackageManager::Pipenv => {
                "pip install --no-cache-dir pipenv && pipenv install --system --deploy".to_string()
            }
        }
    }
}

/// Lower-cased distribution names declared across the project's manifests.
fn declared_dependencies(project: &Project<'_>, pyproject: Option<&toml::Value>) -> BTreeSet<String> {
    let mut deps = BTreeSet::new();
    let mut add = |name: &str| {
        if let Some(caps) = requirement_name_regex().captures(name) {
            deps.insert(caps[1].to_lowercase().replace('_', "-"));
        }
    };

    if let Some(content) = project.read("requirements.txt") {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
            .for_each(&mut add);
    }

    if let Some(doc) = pyproject {
        if let Some(list) = doc
            .get("project")
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_array())
        {
            list.iter().filter_map(|v| v.as_str()).for_each(&mut add);
        }
        if let Some(table) = doc
            .get("tool")
            .and_then(|t| t.get("poetry"))
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_table())
        {
            table.keys().for_each(|k| add(k));
        }
    }

    if let Some(pipfile) = project.read_toml::<toml::Value>("Pipfile") {
        if let Some(table) = pipfile.get("packages").and_then(|p| p.as_table()) {
            table.keys().for_each(|k| add(k));
        }
    }

    deps
}

/// Version pinned by `.python-version`/`runtime.txt`, else the line the
/// declared range resolves to (`[project].requires-python`, then Poetry's
/// `python` dependency).
fn detect_python_version(project: &Project<'_>, pyproject: Option<&toml::Value>) -> Option<String> {
    for file_name in [".python-version", "runtime.txt"] {
        if let Some(version) = project
            .read(file_name)
            .and_then(|content| normalize_python_version(&content))
        {
            return Some(version);
        }
    }

    let doc = pyproject?;
    let declared = doc
        .get("project")
        .and_then(|p| p.get("requires-python"))
        .or_else(|| {
            doc.get("tool")?
                .get("poetry")?
                .get("dependencies")?
                .get("python")
        })
        .and_then(|v| v.as_str())?;
    PYTHON_LINES.resolve(declared)
}

pub struct PythonProvider;

impl PythonProvider {
    /// Django settings package: the directory next to `manage.py` holding `wsgi.py`.
    fn django_module(project: &Project<'_>) -> Option<String> {
        project
            .list_dirs(".")
            .into_iter()
            .find(|dir| project.has_file(&format!("{}/wsgi.py", dir)))
    }

    fn start_command(project: &Project<'_>, deps: &BTreeSet<String>) -> Option<String> {
        let has = |name: &str| deps.contains(name);

        if project.has_file("manage.py") {
            return Some(match Self::django_module(project) {
                Some(module) if has("gunicorn") => {
                    format!("gunicorn {}.wsgi:application --bind {}", module, BIND)
                }
                _ => format!("python manage.py runserver {}", BIND),
            });
        }

        if has("fastapi") {
            if let Some((_, module)) = ASGI_MODULES.iter().find(|(file, _)| project.has_file(file)) {
                return Some(format!("uvicorn {}:app --host 0.0.0.0 --port 8000", module));
            }
        }

        if has("flask") && has("gunicorn") && project.has_file("app.py") {
            return Some(format!("gunicorn app:app --bind {}", BIND));
        }

        project
            .first_existing(&["main.py", "app.py"])
            .map(|entry| format!("python {}", entry))
    }

    fn framework(project: &Project<'_>, deps: &BTreeSet<String>) -> Option<&'static str> {
        if project.has_file("manage.py") || deps.contains("django") {
            Some("django")
        } else if deps.contains("fastapi") {
            Some("fastapi")
        } else if deps.contains("flask") {
            Some("flask")
        } else {
            None
        }
    }
}

impl Provider for PythonProvider {
    fn name(&self) -> &'static str {
        "python"
    }

    fn matches(&self, project: &Project<'_>) -> bool {
        project.has_any(MANIFESTS)
    }

    fn plan(&self, project: &Project<'_>) -> Plan {
        let pyproject = project.read_toml::<toml::Value>("pyproject.toml");
        let pm = PythonPackageManager::detect(project, pyproject.as_ref());
        let deps = declared_dependencies(project, pyproject.as_ref());

        let mut plan = Plan::new(Language::Python)
            .with_package_manager(pm.as_str())
            .with_install(pm.install_command(project))
            .with_runtime_version(detect_python_version(project, pyproject.as_ref()));

        if let Some(start) = Self::start_command(project, &deps) {
            plan = plan.with_start(start);
        }
        if let Some(framework) = Self::framework(project, &deps) {
            plan = plan.with_framework(framework);
        }
        plan
    }
}
