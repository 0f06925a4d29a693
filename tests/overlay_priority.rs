//! Priority rules of the override stack: base plan, then environment, then CLI.

use dockplan::overlay::{overlay, LayerKind, OverlayResolver, Overrides};
use dockplan::plan::{Language, Plan};
use yare::parameterized;

fn base_plan(build: &str) -> Plan {
    Plan::new(Language::Node)
        .with_install("npm ci")
        .with_build(build)
        .with_start("npm run start")
}

fn build_override(value: Option<&str>) -> Overrides {
    Overrides {
        build_command: value.map(str::to_string),
        ..Default::default()
    }
}

fn spa_signals(enable: bool, disable: bool) -> Overrides {
    Overrides {
        enable_spa: enable,
        disable_spa: disable,
        ..Default::default()
    }
}

fn package_layer(packages: &[&str]) -> Overrides {
    Overrides {
        packages: packages.iter().map(|p| p.to_string()).collect(),
        ..Default::default()
    }
}

#[parameterized(
    base_only = { "npm run build", None, None, "npm run build" },
    env_wins_over_base = { "npm run build", Some("make env"), None, "make env" },
    cli_wins_over_env = { "npm run build", Some("make env"), Some("make cli"), "make cli" },
    cli_wins_over_base = { "npm run build", None, Some("make cli"), "make cli" },
    empty_cli_keeps_env = { "npm run build", Some("make env"), Some(""), "make env" },
    blank_env_keeps_base = { "npm run build", Some("  "), None, "npm run build" },
    empty_base_filled_by_env = { "", Some("make env"), None, "make env" },
)]
fn test_last_non_empty_scalar_wins(base: &str, env: Option<&str>, cli: Option<&str>, expected: &str) {
    let plan = OverlayResolver::new()
        .with_layer(LayerKind::Environment, build_override(env))
        .with_layer(LayerKind::Cli, build_override(cli))
        .resolve(base_plan(base));

    assert_eq!(plan.build_command, expected);
}

#[parameterized(
    nothing = { false, (false, false), (false, false), false },
    detected_only = { true, (false, false), (false, false), true },
    env_enables = { false, (true, false), (false, false), true },
    cli_enables = { false, (false, false), (true, false), true },
    env_disables_detected = { true, (false, true), (false, false), false },
    cli_disables_env_enable = { false, (true, false), (false, true), false },
    both_in_env = { false, (true, true), (false, false), false },
    both_in_cli = { true, (false, false), (true, true), false },
    cli_enable_after_env_disable = { true, (false, true), (true, false), true },
)]
fn test_spa_signals(detected: bool, env: (bool, bool), cli: (bool, bool), expected: bool) {
    let plan = OverlayResolver::new()
        .with_layer(LayerKind::Environment, spa_signals(env.0, env.1))
        .with_layer(LayerKind::Cli, spa_signals(cli.0, cli.1))
        .resolve(Plan::new(Language::Static).with_spa(detected));

    assert_eq!(plan.metadata.is_spa, expected);
}

#[parameterized(
    no_additions = { &["git"], &[], &[], &["git"] },
    cli_before_env = { &[], &["curl", "wget"], &["git"], &["git", "curl", "wget"] },
    existing_first = { &["libpq-dev"], &["curl"], &["git"], &["libpq-dev", "git", "curl"] },
    duplicates_keep_first = { &["git"], &["curl", "git"], &["curl", "git"], &["git", "curl"] },
)]
fn test_package_union(existing: &[&str], env: &[&str], cli: &[&str], expected: &[&str]) {
    let mut plan = Plan::new(Language::Python).with_start("python main.py");
    plan.metadata.custom_packages = existing.iter().map(|p| p.to_string()).collect();

    let plan = OverlayResolver::new()
        .with_layer(LayerKind::Environment, package_layer(env))
        .with_layer(LayerKind::Cli, package_layer(cli))
        .resolve(plan);

    assert_eq!(plan.metadata.custom_packages, expected);
}

#[test]
fn test_resolver_matches_manual_overlay_chain() {
    let env = Overrides {
        install_command: Some("pnpm install".to_string()),
        output_dir: Some("build".to_string()),
        ..Default::default()
    };
    let cli = Overrides {
        start_command: Some("node server.js".to_string()),
        runtime_version: Some("20".to_string()),
        ..Default::default()
    };

    let manual = overlay(overlay(base_plan("npm run build"), &env), &cli);
    let resolved = OverlayResolver::new()
        .with_layer(LayerKind::Cli, cli)
        .with_layer(LayerKind::Environment, env)
        .resolve(base_plan("npm run build"));

    assert_eq!(manual, resolved);
    assert_eq!(resolved.install_command, "pnpm install");
    assert_eq!(resolved.start_command, "node server.js");
    assert_eq!(resolved.metadata.runtime_version.as_deref(), Some("20"));
    assert_eq!(resolved.metadata.output_dir_override.as_deref(), Some("build"));
}

#[test]
fn test_build_env_from_higher_layer_replaces() {
    let mut env = Overrides::default();
    env.build_env.insert("A".to_string(), "env".to_string());
    env.build_env.insert("B".to_string(), "env".to_string());
    let mut cli = Overrides::default();
    cli.build_env.insert("A".to_string(), "cli".to_string());

    let plan = OverlayResolver::new()
        .with_layer(LayerKind::Environment, env)
        .with_layer(LayerKind::Cli, cli)
        .resolve(base_plan("npm run build"));

    assert_eq!(plan.build_env.len(), 1);
    assert_eq!(plan.build_env.get("A").map(String::as_str), Some("cli"));
}
