// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the adapters, the intake flow, and storage.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Telegram-assigned identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the chat a message arrived from or is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Identifier of a message sent through a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
}

// --- Applications ---

/// A persisted application record.
///
/// `id` and `created_at` are assigned by the store; records are never
/// updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub application_text: String,
    pub created_at: String,
}

/// Payload for appending a new application to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub user_id: UserId,
    pub username: Option<String>,
    pub application_text: String,
}

// --- Channel events ---

/// Kind of chat an event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
}

/// The UI affordance that produced an [`EventKind::EnterApplication`].
///
/// All origins have the same effect on the conversation state; the origin
/// only decides how the prompt is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOrigin {
    /// The `/apply` command.
    Command,
    /// The persistent reply-keyboard button.
    ReplyButton,
    /// An inline button attached to an earlier bot message.
    InlineButton { message_id: MessageId },
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The `/start` command.
    Start,
    /// A request to begin writing an application.
    EnterApplication { origin: TriggerOrigin },
    /// Free text.
    Text(String),
    /// Anything else (stickers, photos, unknown callbacks).
    Other,
}

/// An inbound event delivered by a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: UserId,
    pub username: Option<String>,
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
    pub kind: EventKind,
}

/// Keyboard attached to an outbound reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// The entry point for starting an application (reply keyboard or inline button,
    /// depending on the channel's trigger style).
    ApplyMenu,
    /// Focus the user's input field on a reply to this message.
    ForceReply,
}

/// An outbound reply to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    /// A plain text reply without a keyboard.
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }

    /// Attach a keyboard to the reply.
    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
