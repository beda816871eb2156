// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Intake bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Intake configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IntakeConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Submission limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// User-facing message texts.
    #[serde(default)]
    pub messages: MessagesConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "intake".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// How users start an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerStyle {
    /// A persistent reply keyboard with a single button.
    #[default]
    ReplyKeyboard,
    /// An inline button under the welcome message.
    Inline,
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required by `intake serve`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Chat that receives a copy of every application: a numeric chat id
    /// or an `@channel` username. `None` disables forwarding.
    #[serde(default, deserialize_with = "deserialize_chat_target")]
    pub forward_chat: Option<String>,

    /// UI affordance for starting an application.
    #[serde(default)]
    pub trigger: TriggerStyle,

    /// Label of the "begin application" button.
    #[serde(default = "default_apply_button_label")]
    pub apply_button_label: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            forward_chat: None,
            trigger: TriggerStyle::default(),
            apply_button_label: default_apply_button_label(),
        }
    }
}

/// Accepts `forward_chat = -100123` as well as `forward_chat = "@channel"`.
fn deserialize_chat_target<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ChatTarget {
        Id(i64),
        Name(String),
    }

    Ok(
        Option::<ChatTarget>::deserialize(deserializer)?.map(|target| match target {
            ChatTarget::Id(id) => id.to_string(),
            ChatTarget::Name(name) => name,
        }),
    )
}

fn default_apply_button_label() -> String {
    "📝 Submit an application".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("intake").join("intake.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("intake.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Submission limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Minimum number of seconds between two accepted applications from one user.
    #[serde(default = "default_submission_cooldown_secs")]
    pub submission_cooldown_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            submission_cooldown_secs: default_submission_cooldown_secs(),
        }
    }
}

fn default_submission_cooldown_secs() -> u64 {
    60
}

/// User-facing texts.
///
/// `cooldown` may contain `{seconds}`; `forward_template` may contain
/// `{username}` and `{text}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct MessagesConfig {
    pub welcome: String,
    pub prompt: String,
    pub already_awaiting: String,
    pub guidance: String,
    pub confirmation: String,
    pub cooldown: String,
    pub storage_failure: String,
    pub empty_text: String,
    pub forward_template: String,
    pub anonymous_username: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            welcome: "👋 Welcome!\n\n\
                      We are a team building turnkey IT solutions.\n\
                      Leave an application and we will suggest how to bring your project to life.\n\n\
                      🚀 Ready to start?"
                .to_string(),
            prompt: "✍️ Describe your task and we will suggest a solution:".to_string(),
            already_awaiting: "You are already submitting an application. Describe your task."
                .to_string(),
            guidance: "❗️ Please use the menu or the button to interact.".to_string(),
            confirmation: "✅ Your application has been received. We will get in touch!"
                .to_string(),
            cooldown: "⏱ Please wait {seconds} s before submitting again.".to_string(),
            storage_failure: "❌ Failed to save your application. Please try again later."
                .to_string(),
            empty_text: "The application text is empty. Describe your task in a message."
                .to_string(),
            forward_template: "📨 New application from @{username}:\n\n{text}".to_string(),
            anonymous_username: "user".to_string(),
        }
    }
}

impl MessagesConfig {
    /// Renders the cooldown reply for the given number of seconds.
    pub fn cooldown_text(&self, seconds: u64) -> String {
        self.cooldown.replace("{seconds}", &seconds.to_string())
    }

    /// Renders the copy forwarded to the secondary chat.
    pub fn forward_text(&self, username: Option<&str>, text: &str) -> String {
        let username = username.unwrap_or(&self.anonymous_username);
        self.forward_template
            .replace("{username}", username)
            .replace("{text}", text)
    }
}
