// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of [`Keyboard`] hints into Telegram reply markup.

use intake_config::model::TriggerStyle;
use intake_core::Keyboard;
use teloxide::types::{
    ForceReply, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    ReplyMarkup,
};

/// Callback data carried by the inline "apply" button.
pub const APPLY_CALLBACK: &str = "apply";

/// Render a keyboard hint for the configured trigger style.
pub fn render(keyboard: Keyboard, style: TriggerStyle, apply_label: &str) -> ReplyMarkup {
    match keyboard {
        Keyboard::ApplyMenu => apply_menu(style, apply_label),
        Keyboard::ForceReply => ReplyMarkup::ForceReply(ForceReply::new()),
    }
}

fn apply_menu(style: TriggerStyle, apply_label: &str) -> ReplyMarkup {
    match style {
        TriggerStyle::ReplyKeyboard => ReplyMarkup::Keyboard(
            KeyboardMarkup::new(vec![vec![KeyboardButton::new(apply_label)]])
                .resize_keyboard()
                .persistent(),
        ),
        TriggerStyle::Inline => ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(vec![
            vec![InlineKeyboardButton::callback(apply_label, APPLY_CALLBACK)],
        ])),
    }
}
