// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Intake bot.

use thiserror::Error;

/// The primary error type used across all Intake adapter traits and core operations.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Configuration errors (missing bot token, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database unavailable, constraint violation, disk full).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (send failure, invalid chat or message id).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The channel's inbound stream has ended; no further events will arrive.
    #[error("channel closed")]
    ChannelClosed,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntakeError {
    /// Shorthand for a [`IntakeError::Channel`] without an underlying source.
    pub fn channel(message: impl Into<String>) -> Self {
        IntakeError::Channel {
            message: message.into(),
            source: None,
        }
    }

    /// Returns `true` if the inbound stream has ended for good.
    pub fn is_channel_closed(&self) -> bool {
        matches!(self, IntakeError::ChannelClosed)
    }

    /// Returns `true` if this error came from the persistence layer.
    pub fn is_storage(&self) -> bool {
        matches!(self, IntakeError::Storage { .. })
    }
}
