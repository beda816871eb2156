// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `intake check-config` command implementation.
//!
//! Configuration has already been loaded and validated by the time this
//! runs; it prints the effective settings with the bot token redacted.

use intake_config::IntakeConfig;
use intake_core::IntakeError;

const REDACTED: &str = "<redacted>";

/// Run the `intake check-config` command.
pub fn run_check_config(config: &IntakeConfig) -> Result<(), IntakeError> {
    println!("{}", render_effective_config(config)?);

    if intake_config::require_bot_token(config).is_err() {
        eprintln!("warning: telegram.bot_token is not set; `intake serve` will refuse to start");
    }
    Ok(())
}

/// TOML rendering of `config` with secrets redacted.
fn render_effective_config(config: &IntakeConfig) -> Result<String, IntakeError> {
    let mut redacted = config.clone();
    if redacted.telegram.bot_token.is_some() {
        redacted.telegram.bot_token = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&redacted)
        .map_err(|e| IntakeError::Internal(format!("failed to render config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_redacted() {
        let mut config = IntakeConfig::default();
        config.telegram.bot_token = Some("123456:secret".into());

        let rendered = render_effective_config(&config).unwrap();
        assert!(!rendered.contains("123456:secret"));
        assert!(rendered.contains(REDACTED));
        assert!(rendered.contains("submission_cooldown_secs = 60"));
    }

    #[test]
    fn rendered_config_parses_back() {
        let mut config = IntakeConfig::default();
        config.telegram.forward_chat = Some("-100123".into());

        let rendered = render_effective_config(&config).unwrap();
        let reparsed = intake_config::load_and_validate_str(&rendered).unwrap();
        assert_eq!(reparsed.telegram.forward_chat.as_deref(), Some("-100123"));
        assert_eq!(reparsed.messages, config.messages);
    }
}
