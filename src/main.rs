use dockplan::cli::commands::{CliArgs, Commands};
use dockplan::cli::handlers::{handle_plan, handle_prepare};
use dockplan::config::DockplanConfig;
use dockplan::util::logging::{init_logging, parse_level, LoggingConfig};
use dockplan::{NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::{debug, error, Level};

fn main() {
    let args = CliArgs::parse();
    let config = DockplanConfig::default();
    init_logging_from_args(&args, &config);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        process::exit(1);
    }

    let exit_code = match &args.command {
        Commands::Prepare(prepare_args) => handle_prepare(prepare_args, &config, args.quiet),
        Commands::Plan(plan_args) => handle_plan(plan_args, &config),
    };

    process::exit(exit_code);
}

/// `--log-level` first, then `-v`/`-q`, then `DOCKPLAN_LOG_LEVEL`.
fn init_logging_from_args(args: &CliArgs, config: &DockplanConfig) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    init_logging(LoggingConfig {
        level,
        use_json: config.log_json,
        ..Default::default()
    });
}
