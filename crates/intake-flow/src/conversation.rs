// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation state: Idle <-> AwaitingText.

use std::collections::HashSet;

use intake_core::UserId;

/// Where a user is in the application conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// Text from the user is not treated as an application.
    Idle,
    /// The next text from the user is the application body.
    AwaitingText,
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationState::Idle => write!(f, "idle"),
            ConversationState::AwaitingText => write!(f, "awaiting_text"),
        }
    }
}

/// Set of users currently awaiting application text.
///
/// Users not in the set are Idle. State lives for the process lifetime only.
#[derive(Debug, Default)]
pub struct ConversationTracker {
    awaiting: HashSet<UserId>,
}

impl ConversationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `user` to AwaitingText.
    ///
    /// Returns `false` if the user was already awaiting.
    pub fn enter_application_mode(&mut self, user: UserId) -> bool {
        self.awaiting.insert(user)
    }

    pub fn is_awaiting(&self, user: UserId) -> bool {
        self.awaiting.contains(&user)
    }

    pub fn state(&self, user: UserId) -> ConversationState {
        if self.is_awaiting(user) {
            ConversationState::AwaitingText
        } else {
            ConversationState::Idle
        }
    }

    /// Return `user` to Idle. No-op if already Idle.
    pub fn consume(&mut self, user: UserId) {
        self.awaiting.remove(&user);
    }

    pub fn awaiting_count(&self) -> usize {
        self.awaiting.len()
    }
}
