// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `intake list` command implementation.
//!
//! Prints stored applications as a human-readable listing or as JSON for
//! scripting. Colors are used only when stdout is a terminal.

use std::io::IsTerminal;

use intake_config::IntakeConfig;
use intake_core::{Application, ApplicationStore, IntakeError};
use intake_storage::SqliteStorage;

/// Run the `intake list` command.
pub async fn run_list(
    config: &IntakeConfig,
    json: bool,
    plain: bool,
    user: Option<i64>,
) -> Result<(), IntakeError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;

    let applications = match user {
        Some(user_id) => storage.list_applications_for_user(user_id).await?,
        None => storage.list_applications().await?,
    };
    storage.close().await?;

    if json {
        println!("{}", render_json(&applications)?);
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print!("{}", render_listing(&applications, use_color));
    }
    Ok(())
}

fn render_json(applications: &[Application]) -> Result<String, IntakeError> {
    serde_json::to_string_pretty(applications)
        .map_err(|e| IntakeError::Internal(format!("failed to serialize applications: {e}")))
}

fn render_listing(applications: &[Application], use_color: bool) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "  intake applications ({})", applications.len());
    let _ = writeln!(out, "  {}", "-".repeat(35));

    if applications.is_empty() {
        let _ = writeln!(out, "    (none)");
        let _ = writeln!(out);
        return out;
    }

    for app in applications {
        let who = match &app.username {
            Some(name) => format!("@{name} ({})", app.user_id),
            None => app.user_id.to_string(),
        };
        let header = format!("#{} {} {}", app.id, app.created_at, who);
        if use_color {
            use colored::Colorize;
            let _ = writeln!(out, "    {}", header.bold());
        } else {
            let _ = writeln!(out, "    {header}");
        }
        for line in app.application_text.lines() {
            let _ = writeln!(out, "      {line}");
        }
        let _ = writeln!(out);
    }
    out
}
