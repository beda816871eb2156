// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths, a positive cooldown, and well-formed chat targets.

use crate::diagnostic::ConfigError;
use crate::model::IntakeConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
///
/// The bot token is not checked here: only `serve` needs it, see
/// [`require_bot_token`].
pub fn validate_config(config: &IntakeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.bot.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level `{}` must be one of: {}",
                config.bot.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.limits.submission_cooldown_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "limits.submission_cooldown_secs must be greater than 0".to_string(),
        });
    }

    if config.telegram.apply_button_label.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "telegram.apply_button_label must not be empty".to_string(),
        });
    }

    if let Some(target) = config.telegram.forward_chat.as_deref()
        && !is_valid_chat_target(target)
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "telegram.forward_chat `{target}` must be a numeric chat id or an @username"
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Returns the configured bot token, or a `MissingKey` error when it is
/// absent or blank.
pub fn require_bot_token(config: &IntakeConfig) -> Result<&str, ConfigError> {
    match config.telegram.bot_token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ConfigError::MissingKey {
            key: "telegram.bot_token".to_string(),
        }),
    }
}

fn is_valid_chat_target(target: &str) -> bool {
    let target = target.trim();
    if target.parse::<i64>().is_ok() {
        return true;
    }
    match target.strip_prefix('@') {
        Some(name) => !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = IntakeConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = IntakeConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn zero_cooldown_fails_validation() {
        let mut config = IntakeConfig::default();
        config.limits.submission_cooldown_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("submission_cooldown_secs"))
        ));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = IntakeConfig::default();
        config.bot.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn forward_chat_targets() {
        let mut config = IntakeConfig::default();
        for good in ["-1001234567890", "42", "@sales_team"] {
            config.telegram.forward_chat = Some(good.to_string());
            assert!(validate_config(&config).is_ok(), "{good} should be accepted");
        }
        for bad in ["sales team", "@", "@bad-name", ""] {
            config.telegram.forward_chat = Some(bad.to_string());
            assert!(validate_config(&config).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = IntakeConfig::default();
        config.storage.database_path = " ".to_string();
        config.limits.submission_cooldown_secs = 0;
        config.telegram.apply_button_label = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn require_bot_token_rejects_missing_and_blank() {
        let mut config = IntakeConfig::default();
        assert!(matches!(
            require_bot_token(&config),
            Err(ConfigError::MissingKey { key }) if key == "telegram.bot_token"
        ));

        config.telegram.bot_token = Some("   ".to_string());
        assert!(require_bot_token(&config).is_err());

        config.telegram.bot_token = Some("123456:ABC".to_string());
        assert_eq!(require_bot_token(&config).unwrap(), "123456:ABC");
    }
}
