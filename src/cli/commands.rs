use crate::plan::StaticServer;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Zero-config build planner: detects how to build an application and writes a Dockerfile
#[derive(Parser, Debug)]
#[command(
    name = "dockplan",
    about = "Detects how to build an application and writes a multi-stage Dockerfile",
    version,
    author,
    long_about = "dockplan inspects a source tree, works out how to install, build and run it, \
                  applies overrides from DOCKPLAN_* environment variables and the command line, \
                  and renders the result as a Dockerfile."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate a Dockerfile for an application",
        long_about = "Detects the application (or loads its plan file), applies overrides and \
                      writes .dockplan/Dockerfile under the project root.\n\n\
                      A dockplan.json in the project root is used instead of detection when \
                      present. Use --plan to point at another file.\n\n\
                      Environment variables:\n  \
                      DOCKPLAN_INSTALL_CMD     Override install command\n  \
                      DOCKPLAN_BUILD_CMD       Override build command\n  \
                      DOCKPLAN_START_CMD       Override start command\n  \
                      DOCKPLAN_STATIC_SERVER   Static file server: caddy (default), nginx\n  \
                      DOCKPLAN_OUTPUT_DIR      Override static output directory\n  \
                      DOCKPLAN_SPA / DOCKPLAN_NO_SPA  Enable or disable SPA mode\n  \
                      DOCKPLAN_PACKAGES        Additional APT packages (comma-separated)\n  \
                      DOCKPLAN_BASE_IMAGE      Override base image\n  \
                      DOCKPLAN_RUNTIME_VERSION Override runtime version\n\n\
                      Examples:\n  \
                      dockplan prepare\n  \
                      dockplan prepare ./web --spa --static-server nginx\n  \
                      dockplan prepare --build-env API_URL=https://api.example.com --packages git"
    )]
    Prepare(PrepareArgs),

    #[command(
        about = "Print the resolved build plan",
        long_about = "Runs detection and overrides like `prepare`, then prints the plan instead \
                      of generating a Dockerfile.\n\n\
                      Examples:\n  \
                      dockplan plan\n  \
                      dockplan plan ./api --format yaml"
    )]
    Plan(PlanArgs),
}

/// Overrides shared by `prepare` and `plan`
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    #[arg(long, value_name = "FILE", help = "Use this plan file instead of detection")]
    pub plan: Option<PathBuf>,

    #[arg(short = 'i', long, value_name = "CMD", help = "Override install command")]
    pub install_cmd: Option<String>,

    #[arg(short = 'b', long, value_name = "CMD", help = "Override build command")]
    pub build_cmd: Option<String>,

    #[arg(short = 's', long, value_name = "CMD", help = "Override start command")]
    pub start_cmd: Option<String>,

    #[arg(long, value_enum, help = "Static file server")]
    pub static_server: Option<StaticServerArg>,

    #[arg(long, value_name = "DIR", help = "Override static output directory (e.g. dist, build, out)")]
    pub output_dir: Option<String>,

    #[arg(long, help = "Enable SPA mode (serve index.html for unknown routes)")]
    pub spa: bool,

    #[arg(long, help = "Disable SPA mode, overriding detection and --spa")]
    pub no_spa: bool,

    #[arg(long, value_name = "PACKAGE", help = "Additional APT package (repeatable)")]
    pub packages: Vec<String>,

    #[arg(
        long,
        value_name = "KEY[=VALUE]",
        help = "Build-time environment variable (repeatable); a bare KEY copies the current value"
    )]
    pub build_env: Vec<String>,

    #[arg(long, value_name = "IMAGE", help = "Override base image")]
    pub base_image: Option<String>,

    #[arg(long, value_name = "VERSION", help = "Override runtime version")]
    pub runtime_version: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PrepareArgs {
    #[arg(value_name = "PATH", help = "Path to the application (defaults to current directory)")]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'p',
        long = "path",
        value_name = "PATH",
        conflicts_with = "path",
        help = "Path to the application, as an alternative to the positional PATH"
    )]
    pub path_flag: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    #[arg(long, help = "Print the Dockerfile instead of writing it")]
    pub stdout: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    #[arg(value_name = "PATH", help = "Path to the application (defaults to current directory)")]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'p',
        long = "path",
        value_name = "PATH",
        conflicts_with = "path",
        help = "Path to the application, as an alternative to the positional PATH"
    )]
    pub path_flag: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    #[arg(short = 'f', long, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormatArg,
}

impl PrepareArgs {
    /// Positional path, else `--path`
    pub fn project_path(&self) -> Option<&PathBuf> {
        self.path.as_ref().or(self.path_flag.as_ref())
    }
}

impl PlanArgs {
    pub fn project_path(&self) -> Option<&PathBuf> {
        self.path.as_ref().or(self.path_flag.as_ref())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticServerArg {
    Caddy,
    Nginx,
}

impl From<StaticServerArg> for StaticServer {
    fn from(arg: StaticServerArg) -> Self {
        match arg {
            StaticServerArg::Caddy => StaticServer::Caddy,
            StaticServerArg::Nginx => StaticServer::Nginx,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
        }
    }
}
