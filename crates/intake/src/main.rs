// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intake - a Telegram bot that collects service applications.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check_config;
mod list;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use intake_config::{ConfigError, IntakeConfig};

/// Intake - a Telegram bot that collects service applications.
#[derive(Parser, Debug)]
#[command(name = "intake", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot (default).
    Serve,
    /// Print stored applications.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
        /// Only applications from this Telegram user id.
        #[arg(long, value_name = "USER_ID")]
        user: Option<i64>,
    },
    /// Validate configuration and print the effective settings.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<IntakeConfig, Vec<ConfigError>> {
    match path {
        Some(path) => intake_config::load_and_validate_path(path),
        None => intake_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    intake_config::load_dotenv();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            intake_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = intake_config::require_bot_token(&config) {
                intake_config::render_errors(&[e]);
                std::process::exit(1);
            }
            serve::run_serve(config).await
        }
        Commands::List { json, plain, user } => list::run_list(&config, json, plain, user).await,
        Commands::CheckConfig => check_config::run_check_config(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
