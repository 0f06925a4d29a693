//! Subcommand implementations. Each handler returns the process exit code.

use super::commands::{OverrideArgs, PlanArgs, PrepareArgs};
use super::output::OutputFormatter;
use crate::config::DockplanConfig;
use crate::fs::{Project, RealFileSystem};
use crate::overlay::{EnvOverrides, LayerKind, OverlayResolver, Overrides};
use crate::pipeline::Pipeline;
use crate::plan::{find_plan_file, load_plan_file, Plan};
use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// `KEY=value` pairs, or bare `KEY`s whose value comes from `lookup`. Bare keys
/// with no value are skipped.
pub fn parse_build_envs<F>(entries: &[String], lookup: F) -> BTreeMap<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_map = BTreeMap::new();
    for entry in entries {
        let (key, value) = match entry.split_once('=') {
            Some((key, value)) => (key.trim(), Some(value.to_string())),
            None => (entry.trim(), lookup(entry.trim())),
        };
        if key.is_empty() {
            warn!(entry = %entry, "Ignoring build env entry without a name");
            continue;
        }
        match value {
            Some(value) => {
                env_map.insert(key.to_string(), value);
            }
            None => debug!(key, "Build env variable not set in environment, skipping"),
        }
    }
    env_map
}

/// The CLI override layer.
pub fn cli_overrides<F>(args: &OverrideArgs, lookup: F) -> Overrides
where
    F: Fn(&str) -> Option<String>,
{
    Overrides {
        install_command: args.install_cmd.clone(),
        build_command: args.build_cmd.clone(),
        start_command: args.start_cmd.clone(),
        static_server: args.static_server.map(Into::into),
        output_dir: args.output_dir.clone(),
        enable_spa: args.spa,
        disable_spa: args.no_spa,
        packages: args.packages.clone(),
        build_env: parse_build_envs(&args.build_env, lookup),
        base_image: args.base_image.clone(),
        runtime_version: args.runtime_version.clone(),
    }
}

fn project_root(path: Option<&PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    if !path.is_dir() {
        bail!("Project path is not a directory: {}", path.display());
    }
    path.canonicalize()
        .with_context(|| format!("Failed to resolve project path {}", path.display()))
}

fn load_plan(root: &Path, args: &OverrideArgs, config: &DockplanConfig) -> Result<Option<Plan>> {
    let Some(path) = find_plan_file(root, args.plan.as_deref(), &config.plan_file) else {
        return Ok(None);
    };
    info!(path = %path.display(), "Using plan file");
    let plan = load_plan_file(&path)
        .with_context(|| format!("Failed to load plan file {}", path.display()))?;
    Ok(Some(plan))
}

fn resolve_plan(root: &Path, args: &OverrideArgs, config: &DockplanConfig) -> Result<Plan> {
    let loaded = load_plan(root, args, config)?;

    let env_layer = EnvOverrides::from_env()?;
    let cli_layer = cli_overrides(args, |key| env::var(key).ok());
    let resolver = OverlayResolver::new()
        .with_layer(LayerKind::Environment, env_layer)
        .with_layer(LayerKind::Cli, cli_layer);

    let fs = RealFileSystem::new();
    let project = Project::new(&fs, root);
    Ok(Pipeline::from_config(config).resolve(&project, loaded, &resolver)?)
}

fn prepare(args: &PrepareArgs, config: &DockplanConfig, quiet: bool) -> Result<()> {
    let root = project_root(args.project_path())?;
    debug!(root = %root.display(), "Preparing project");

    let plan = resolve_plan(&root, &args.overrides, config)?;
    let dockerfile = crate::generator::generate(&plan)?;

    if args.stdout {
        print!("{}", dockerfile);
        return Ok(());
    }

    let out_dir = root.join(&config.output_dir_name);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let out_path = out_dir.join("Dockerfile");
    fs::write(&out_path, &dockerfile)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    info!(path = %out_path.display(), "Wrote Dockerfile");
    if !quiet {
        println!("Dockerfile written to {}", out_path.display());
    }
    Ok(())
}

fn plan(args: &PlanArgs, config: &DockplanConfig) -> Result<()> {
    let root = project_root(args.project_path())?;
    let plan = resolve_plan(&root, &args.overrides, config)?;
    let output = OutputFormatter::new(args.format.into()).format_plan(&plan)?;
    println!("{}", output);
    Ok(())
}

pub fn handle_prepare(args: &PrepareArgs, config: &DockplanConfig, quiet: bool) -> i32 {
    match prepare(args, config, quiet) {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

pub fn handle_plan(args: &PlanArgs, config: &DockplanConfig) -> i32 {
    match plan(args, config) {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::StaticServerArg;
    use crate::plan::StaticServer;

    fn entries(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_build_envs() {
        let lookup = |key: &str| (key == "CI").then(|| "true".to_string());
        let env_map = parse_build_envs(
            &entries(&["API_URL=https://api.example.com", "CI", "MISSING", "EMPTY=", "QUERY=a=b"]),
            lookup,
        );

        assert_eq!(env_map.get("API_URL").map(String::as_str), Some("https://api.example.com"));
        assert_eq!(env_map.get("CI").map(String::as_str), Some("true"));
        assert!(!env_map.contains_key("MISSING"));
        assert_eq!(env_map.get("EMPTY").map(String::as_str), Some(""));
        assert_eq!(env_map.get("QUERY").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_parse_build_envs_skips_nameless() {
        let env_map = parse_build_envs(&entries(&["=value", " "]), |_| Some("x".to_string()));
        assert!(env_map.is_empty());
    }

    #[test]
    fn test_cli_overrides() {
        let args = OverrideArgs {
            start_cmd: Some("./run".to_string()),
            static_server: Some(StaticServerArg::Nginx),
            spa: true,
            packages: entries(&["git"]),
            build_env: entries(&["A=1"]),
            ..Default::default()
        };
        let overrides = cli_overrides(&args, |_| None);

        assert_eq!(overrides.start_command.as_deref(), Some("./run"));
        assert_eq!(overrides.static_server, Some(StaticServer::Nginx));
        assert!(overrides.enable_spa);
        assert_eq!(overrides.packages, vec!["git"]);
        assert_eq!(overrides.build_env.get("A").map(String::as_str), Some("1"));
    }
}
