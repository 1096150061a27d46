mod cli;
mod commands;
mod console;
mod services;

use std::process::ExitCode;

use skillflow_config::SkillflowConfig;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::console::Console;
use crate::services::Services;

const DEFAULT_DIRECTIVE: &str = "skillflow=info";

/// Filter directive from `--log-level`, falling back to the config file.
/// A bare level is scoped to the workspace crates.
fn log_directive(cli_level: Option<&str>, config: Option<&SkillflowConfig>) -> String {
    match cli_level.map(str::trim).filter(|l| !l.is_empty()) {
        Some(level) if level.contains('=') => level.to_string(),
        Some(level) => format!("skillflow={}", level.to_ascii_lowercase()),
        None => config
            .map(|c| c.logging.level.directive())
            .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string()),
    }
}

fn init_logging(directive: &str) {
    let directive: Directive = directive
        .parse()
        .unwrap_or_else(|_| Directive::from(LevelFilter::INFO));
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Secrets may come from a .env file; a missing file is fine.
    let dotenv = dotenvy::dotenv();

    let args = cli::parse();

    let config = skillflow_config::load_config(args.config.as_deref());
    init_logging(&log_directive(
        args.log_level.as_deref(),
        config.as_ref().ok(),
    ));
    if let Ok(path) = dotenv {
        tracing::debug!("loaded environment from {}", path.display());
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("SkillFlow v{} starting", env!("CARGO_PKG_VERSION"));

    let services = match Services::build(config, args.offline) {
        Ok(services) => services,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut console = Console::stdin();
    match commands::run(args, &services, &mut console).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
