// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of Telegram updates to channel-agnostic [`InboundEvent`]s.
//!
//! Messages and callback queries are classified here; the intake flow
//! decides what to do with them.

use intake_config::model::TriggerStyle;
use intake_core::{ChatId, ChatKind, EventKind, InboundEvent, MessageId, TriggerOrigin, UserId};
use teloxide::prelude::*;
use teloxide::types::{Chat, ChatKind as TgChatKind};
use teloxide::utils::command::BotCommands;

use crate::keyboard::APPLY_CALLBACK;

/// Commands the bot registers and understands.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Show the welcome message.")]
    Start,
    #[command(description = "Submit an application.")]
    Apply,
}

/// What the update mapper needs to know about the running bot.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// The bot's own username, for `/command@botname` parsing.
    pub bot_username: String,
    pub trigger: TriggerStyle,
    pub apply_button_label: String,
}

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    is_private_chat(&msg.chat)
}

fn is_private_chat(chat: &Chat) -> bool {
    matches!(chat.kind, TgChatKind::Private(_))
}

fn chat_kind(chat: &Chat) -> ChatKind {
    if is_private_chat(chat) {
        ChatKind::Private
    } else {
        ChatKind::Group
    }
}

/// Classifies the text of a message.
pub fn classify_text(text: &str, ctx: &HandlerContext) -> EventKind {
    if text.starts_with('/') {
        return match Command::parse(text, &ctx.bot_username) {
            Ok(Command::Start) => EventKind::Start,
            Ok(Command::Apply) => EventKind::EnterApplication {
                origin: TriggerOrigin::Command,
            },
            // Anything else starting with a slash is ordinary text.
            Err(_) => EventKind::Text(text.to_string()),
        };
    }

    if ctx.trigger == TriggerStyle::ReplyKeyboard && text.trim() == ctx.apply_button_label.trim()
    {
        return EventKind::EnterApplication {
            origin: TriggerOrigin::ReplyButton,
        };
    }

    EventKind::Text(text.to_string())
}

/// Converts a Telegram message into an [`InboundEvent`].
///
/// Returns `None` for messages without a sender (e.g. channel posts).
pub fn message_to_event(msg: &Message, ctx: &HandlerContext) -> Option<InboundEvent> {
    let user = msg.from.as_ref()?;

    let kind = match msg.text() {
        Some(text) => classify_text(text, ctx),
        None => EventKind::Other,
    };

    Some(InboundEvent {
        user_id: UserId(user.id.0 as i64),
        username: user.username.clone(),
        chat_id: ChatId(msg.chat.id.0),
        chat_kind: chat_kind(&msg.chat),
        kind,
    })
}

/// Converts a callback query into an [`InboundEvent`].
///
/// Returns `None` when the query is not attached to a message, since there
/// is no chat to answer in.
pub fn callback_to_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let message = query.message.as_ref()?;
    let chat = message.chat();

    let kind = match query.data.as_deref() {
        Some(APPLY_CALLBACK) => EventKind::EnterApplication {
            origin: TriggerOrigin::InlineButton {
                message_id: MessageId(message.id().0.to_string()),
            },
        },
        _ => EventKind::Other,
    };

    Some(InboundEvent {
        user_id: UserId(query.from.id.0 as i64),
        username: query.from.username.clone(),
        chat_id: ChatId(chat.id.0),
        chat_kind: chat_kind(chat),
        kind,
    })
}
