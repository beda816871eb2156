// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Intake bot.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostic rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use intake_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("cooldown: {}s", config.limits.submission_cooldown_secs);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, SourceFile, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str, load_dotenv};
pub use model::IntakeConfig;
pub use validation::require_bot_token;

/// Loads the standard file hierarchy plus environment and validates the result.
pub fn load_and_validate() -> Result<IntakeConfig, Vec<ConfigError>> {
    finish(loader::load_config(), hierarchy_sources)
}

/// Loads one explicit file plus environment and validates the result.
pub fn load_and_validate_path(path: &Path) -> Result<IntakeConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        SourceFile::read(path).into_iter().collect()
    })
}

/// Loads a TOML string (no files, no environment) and validates the result.
pub fn load_and_validate_str(toml_content: &str) -> Result<IntakeConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![SourceFile::new("<inline>", toml_content)]
    })
}

/// Validates a successful load or converts figment errors into diagnostics.
///
/// Sources are only read back when there is an error to annotate.
fn finish(
    loaded: Result<IntakeConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<SourceFile>,
) -> Result<IntakeConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => validation::validate_config(&config).map(|()| config),
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Files of the standard hierarchy that exist, most specific first.
fn hierarchy_sources() -> Vec<SourceFile> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG.into());
    let user = dirs::config_dir().map(|dir| dir.join(loader::USER_CONFIG));

    [Some(local), user, Some(loader::SYSTEM_CONFIG.into())]
        .into_iter()
        .flatten()
        .filter_map(|path| SourceFile::read(&path))
        .collect()
}
