// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging platform integrations.

use async_trait::async_trait;

use crate::error::IntakeError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatId, InboundEvent, MessageId, OutboundMessage};

/// Adapter for the message transport the bot is served over.
///
/// Channel adapters deliver inbound events one at a time and accept
/// outbound replies, forwards, and edits.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform and starts
    /// delivering inbound events.
    async fn connect(&mut self) -> Result<(), IntakeError>;

    /// Receives the next inbound event from the channel.
    async fn receive(&self) -> Result<InboundEvent, IntakeError>;

    /// Sends a reply to a chat.
    async fn reply(&self, msg: OutboundMessage) -> Result<MessageId, IntakeError>;

    /// Sends a copy of a message to a secondary destination.
    ///
    /// `destination` is either a numeric chat id or an `@channel` username.
    async fn forward_to_chat(&self, destination: &str, text: &str)
    -> Result<MessageId, IntakeError>;

    /// Replaces the text of a previously sent message.
    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: &MessageId,
        text: &str,
    ) -> Result<(), IntakeError>;
}
