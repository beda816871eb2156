// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Constructors for inbound events.
//!
//! Private-chat events use the user id as the chat id, as Telegram does.

use intake_core::{
    ChatId, ChatKind, EventKind, InboundEvent, MessageId, TriggerOrigin, UserId,
};

fn private(user_id: i64, kind: EventKind) -> InboundEvent {
    InboundEvent {
        user_id: UserId(user_id),
        username: Some(format!("user{user_id}")),
        chat_id: ChatId(user_id),
        chat_kind: ChatKind::Private,
        kind,
    }
}

/// `/start` in a private chat.
pub fn start(user_id: i64) -> InboundEvent {
    private(user_id, EventKind::Start)
}

/// `/apply` in a private chat.
pub fn apply(user_id: i64) -> InboundEvent {
    private(
        user_id,
        EventKind::EnterApplication {
            origin: TriggerOrigin::Command,
        },
    )
}

/// A press of the reply-keyboard button.
pub fn apply_button(user_id: i64) -> InboundEvent {
    private(
        user_id,
        EventKind::EnterApplication {
            origin: TriggerOrigin::ReplyButton,
        },
    )
}

/// A press of the inline button attached to `message_id`.
pub fn apply_inline(user_id: i64, message_id: &str) -> InboundEvent {
    private(
        user_id,
        EventKind::EnterApplication {
            origin: TriggerOrigin::InlineButton {
                message_id: MessageId(message_id.to_string()),
            },
        },
    )
}

/// Free text in a private chat.
pub fn text(user_id: i64, body: &str) -> InboundEvent {
    private(user_id, EventKind::Text(body.to_string()))
}

/// Free text from a user without a username.
pub fn anonymous_text(user_id: i64, body: &str) -> InboundEvent {
    InboundEvent {
        username: None,
        ..text(user_id, body)
    }
}

/// A sticker, photo, or other unsupported update.
pub fn other(user_id: i64) -> InboundEvent {
    private(user_id, EventKind::Other)
}

/// Free text posted in a group chat.
pub fn group_text(user_id: i64, group_chat_id: i64, body: &str) -> InboundEvent {
    InboundEvent {
        chat_id: ChatId(group_chat_id),
        chat_kind: ChatKind::Group,
        ..text(user_id, body)
    }
}
