// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Intake bot.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by the Telegram channel adapter, the SQLite store, and the intake
//! flow that connects them.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::IntakeError;
pub use types::{
    AdapterType, Application, ChatId, ChatKind, EventKind, HealthStatus, InboundEvent, Keyboard,
    MessageId, NewApplication, OutboundMessage, TriggerOrigin, UserId,
};

pub use traits::{ApplicationStore, ChannelAdapter, PluginAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intake_error_variants_render() {
        let config = IntakeError::Config("telegram.bot_token is required".into());
        assert_eq!(
            config.to_string(),
            "configuration error: telegram.bot_token is required"
        );

        let storage = IntakeError::Storage {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert!(storage.is_storage());
        assert_eq!(storage.to_string(), "storage error: disk full");

        let channel = IntakeError::channel("chat not found");
        assert!(!channel.is_storage());
        assert_eq!(channel.to_string(), "channel error: chat not found");

        assert!(IntakeError::ChannelClosed.is_channel_closed());
        assert!(!IntakeError::channel("connection closed by peer").is_channel_closed());

        let _internal = IntakeError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [AdapterType::Channel, AdapterType::Storage] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn chat_kind_displays_lowercase() {
        assert_eq!(ChatKind::Private.to_string(), "private");
        assert_eq!(ChatKind::Group.to_string(), "group");
    }

    #[test]
    fn outbound_message_builder() {
        let msg = OutboundMessage::text(ChatId(42), "hello").with_keyboard(Keyboard::ApplyMenu);
        assert_eq!(msg.chat_id, ChatId(42));
        assert_eq!(msg.text, "hello");
        assert_eq!(msg.keyboard, Some(Keyboard::ApplyMenu));

        let plain = OutboundMessage::text(ChatId(1), "plain");
        assert!(plain.keyboard.is_none());
    }

    #[test]
    fn application_serializes_with_nullable_username() {
        let app = Application {
            id: 1,
            user_id: 12345,
            username: None,
            application_text: "Need a website".into(),
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&app).expect("should serialize");
        assert!(json["username"].is_null());
        assert_eq!(json["application_text"], "Need a website");
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_application_store<T: ApplicationStore>() {}
    }
}
