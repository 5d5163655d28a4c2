//! Autonomo Control admin console.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::Console;
use crate::config::{ConfigOverrides, ConsoleConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = match ConsoleConfig::load(ConfigOverrides {
        api_base_url: cli.api_base_url,
        token_path: cli.token_path,
        timeout_secs: cli.timeout_secs,
    }) {
        Ok(config) => config,
        Err(load_error) => {
            error!(error = %load_error, "invalid console configuration");
            return ExitCode::from(2);
        }
    };

    let console = match Console::build(&config) {
        Ok(console) => console,
        Err(build_error) => {
            error!(error = %build_error, "failed to initialize console");
            return ExitCode::from(2);
        }
    };

    let Some(output) = console.run(cli.command).await else {
        return ExitCode::FAILURE;
    };

    match serde_json::to_string_pretty(&output) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(render_error) => {
            error!(error = %render_error, "failed to render command output");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
