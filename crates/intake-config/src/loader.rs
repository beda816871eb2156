// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./intake.toml` > `~/.config/intake/intake.toml` > `/etc/intake/intake.toml`
//! with environment variable overrides via `INTAKE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::IntakeConfig;

/// Working-directory config file.
pub const LOCAL_CONFIG: &str = "intake.toml";
/// Per-user config file, relative to the XDG config dir.
pub const USER_CONFIG: &str = "intake/intake.toml";
/// System-wide config file.
pub const SYSTEM_CONFIG: &str = "/etc/intake/intake.toml";

/// Export the variables of the nearest `.env` file into the process environment.
///
/// Variables that are already set are left alone, so the real environment
/// wins. Returns the file that was read, or `None` when there is none.
/// Call this once at startup, before any of the `load_*` functions.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load configuration from the XDG hierarchy with env var overrides.
///
/// Later layers win:
/// 1. Compiled defaults
/// 2. `/etc/intake/intake.toml`
/// 3. `~/.config/intake/intake.toml`
/// 4. `./intake.toml`
/// 5. `INTAKE_*` environment variables
/// 6. `BOT_TOKEN` / `GROUP_CHAT_ID` environment variables
pub fn load_config() -> Result<IntakeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. Files and env are ignored.
pub fn load_config_from_str(toml_content: &str) -> Result<IntakeConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

/// Load one explicit file in place of the hierarchy, still honouring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<IntakeConfig, figment::Error> {
    with_env(defaults().merge(Toml::file(path))).extract()
}

/// The figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    let user = dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG))
        .unwrap_or_default();

    with_env(
        defaults()
            .merge(Toml::file(SYSTEM_CONFIG))
            .merge(Toml::file(user))
            .merge(Toml::file(LOCAL_CONFIG)),
    )
}

fn defaults() -> Figment {
    Figment::from(Serialized::defaults(IntakeConfig::default()))
}

fn with_env(figment: Figment) -> Figment {
    figment.merge(env_provider()).merge(legacy_env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` and not `Env::split("_")` because key names contain
/// underscores: `INTAKE_TELEGRAM_BOT_TOKEN` must map to `telegram.bot_token`,
/// not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("INTAKE_").map(|key| {
        // Example: INTAKE_TELEGRAM_BOT_TOKEN -> "telegram_bot_token" -> "telegram.bot_token"
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = ["bot_", "telegram_", "storage_", "limits_", "messages_"]
            .iter()
            .find(|section| key_str.starts_with(*section))
            .map(|section| {
                let name = section.trim_end_matches('_');
                format!("{name}.{}", &key_str[section.len()..])
            })
            .unwrap_or(key_str);
        mapped.into()
    })
}

/// Unprefixed variables kept for deployments configured through a plain `.env` file
/// (see [`load_dotenv`]).
fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&["BOT_TOKEN", "GROUP_CHAT_ID"])
        .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
            "bot_token" => "telegram.bot_token".into(),
            "group_chat_id" => "telegram.forward_chat".into(),
            other => other.to_string().into(),
        })
}
