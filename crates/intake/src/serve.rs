// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `intake serve` command implementation.
//!
//! Opens the SQLite store, connects the Telegram channel, and runs the
//! intake loop until SIGINT/SIGTERM.

use std::sync::Arc;

use intake_config::IntakeConfig;
use intake_core::{ApplicationStore, ChannelAdapter, IntakeError};
use intake_flow::shutdown;
use intake_flow::{IntakeFlow, IntakeLoop};
use intake_storage::SqliteStorage;
use intake_telegram::TelegramChannel;
use tracing::info;

/// Runs the `intake serve` command.
///
/// The bot token must already be validated by the caller.
pub async fn run_serve(config: IntakeConfig) -> Result<(), IntakeError> {
    init_tracing(&config.bot.log_level);

    info!(
        bot_name = config.bot.name.as_str(),
        version = env!("CARGO_PKG_VERSION"),
        "starting intake serve"
    );

    let mut channel = TelegramChannel::new(config.telegram.clone())?;

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let existing = storage.count_applications().await?;
    info!(
        path = config.storage.database_path.as_str(),
        applications = existing,
        "storage ready"
    );

    // Install before connecting so a signal during startup is not lost.
    let cancel = shutdown::install_signal_handler();

    channel.connect().await?;
    match &config.telegram.forward_chat {
        Some(destination) => info!(destination = destination.as_str(), "forwarding enabled"),
        None => info!("forwarding disabled"),
    }

    let channel: Arc<dyn ChannelAdapter> = Arc::new(channel);
    let store: Arc<dyn ApplicationStore> = Arc::new(storage);
    let flow = IntakeFlow::new(channel, store, &config);

    let mut intake_loop = IntakeLoop::new(flow);
    intake_loop.run(cancel).await?;

    info!("intake serve stopped");
    Ok(())
}

/// Initializes the tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("intake={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
