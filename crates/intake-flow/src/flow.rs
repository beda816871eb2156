// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The intake state machine applied to one inbound event at a time.
//!
//! [`IntakeFlow`] owns all mutable conversation state (awaiting users and
//! cooldown timestamps). It is driven by a single consumer, so the
//! check-then-record sequence around persistence never races.

use std::sync::Arc;

use intake_config::IntakeConfig;
use intake_config::model::MessagesConfig;
use intake_core::{
    ApplicationStore, ChannelAdapter, ChatId, ChatKind, EventKind, InboundEvent, IntakeError,
    Keyboard, NewApplication, OutboundMessage, TriggerOrigin, UserId,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::conversation::{ConversationState, ConversationTracker};
use crate::cooldown::{CooldownDecision, SubmissionCooldown};

/// What handling an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event was dropped without a reply.
    Ignored,
    /// The welcome message was sent.
    Welcomed,
    /// The user was asked for application text.
    Prompted { already_awaiting: bool },
    /// Text from an idle user; the user was pointed at the menu.
    Guided,
    /// The application was persisted.
    Submitted { application_id: i64 },
    /// A submission arrived inside the cooldown window.
    RateLimited { seconds_remaining: u64 },
    /// Blank application text.
    EmptyText,
    /// The store rejected the insert; the user stays in application mode.
    PersistenceFailed,
}

/// Applies the intake state machine to inbound events.
pub struct IntakeFlow {
    channel: Arc<dyn ChannelAdapter>,
    store: Arc<dyn ApplicationStore>,
    tracker: ConversationTracker,
    cooldown: SubmissionCooldown,
    messages: MessagesConfig,
    forward_chat: Option<String>,
}

impl IntakeFlow {
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        store: Arc<dyn ApplicationStore>,
        config: &IntakeConfig,
    ) -> Self {
        Self {
            channel,
            store,
            tracker: ConversationTracker::new(),
            cooldown: SubmissionCooldown::from_secs(config.limits.submission_cooldown_secs),
            messages: config.messages.clone(),
            forward_chat: config.telegram.forward_chat.clone(),
        }
    }

    pub fn channel(&self) -> &Arc<dyn ChannelAdapter> {
        &self.channel
    }

    pub fn store(&self) -> &Arc<dyn ApplicationStore> {
        &self.store
    }

    /// Current conversation state of `user`.
    pub fn state_of(&self, user: UserId) -> ConversationState {
        self.tracker.state(user)
    }

    pub fn awaiting_count(&self) -> usize {
        self.tracker.awaiting_count()
    }

    /// Cooldown decision for `user` at `now`, without side effects.
    pub fn cooldown_for(&self, user: UserId, now: Instant) -> CooldownDecision {
        self.cooldown.check(user, now)
    }

    /// Handle one inbound event to completion.
    ///
    /// Errors are transport failures on the primary reply; they leave
    /// conversation state consistent and do not stop the caller's loop.
    pub async fn handle_event(
        &mut self,
        event: InboundEvent,
        now: Instant,
    ) -> Result<Outcome, IntakeError> {
        if event.chat_kind != ChatKind::Private {
            debug!(
                user_id = %event.user_id,
                chat_id = event.chat_id.0,
                chat_kind = %event.chat_kind,
                "ignoring event from non-private chat"
            );
            return Ok(Outcome::Ignored);
        }

        let InboundEvent {
            user_id,
            username,
            chat_id,
            kind,
            ..
        } = event;

        match kind {
            EventKind::Start => {
                self.send(chat_id, &self.messages.welcome, Some(Keyboard::ApplyMenu))
                    .await?;
                Ok(Outcome::Welcomed)
            }
            EventKind::EnterApplication { origin } => {
                self.enter_application(user_id, chat_id, origin).await
            }
            EventKind::Text(text) => {
                if self.tracker.is_awaiting(user_id) {
                    self.submit(user_id, username, chat_id, text, now).await
                } else {
                    debug!(user_id = %user_id, "text from idle user");
                    self.send(chat_id, &self.messages.guidance, Some(Keyboard::ApplyMenu))
                        .await?;
                    Ok(Outcome::Guided)
                }
            }
            EventKind::Other => {
                debug!(user_id = %user_id, "ignoring unsupported event");
                Ok(Outcome::Ignored)
            }
        }
    }

    async fn enter_application(
        &mut self,
        user_id: UserId,
        chat_id: ChatId,
        origin: TriggerOrigin,
    ) -> Result<Outcome, IntakeError> {
        if !self.tracker.enter_application_mode(user_id) {
            self.send(
                chat_id,
                &self.messages.already_awaiting,
                Some(Keyboard::ForceReply),
            )
            .await?;
            return Ok(Outcome::Prompted {
                already_awaiting: true,
            });
        }

        debug!(user_id = %user_id, ?origin, "entered application mode");

        if let TriggerOrigin::InlineButton { message_id } = &origin {
            match self
                .channel
                .edit_message(chat_id, message_id, &self.messages.prompt)
                .await
            {
                Ok(()) => {
                    return Ok(Outcome::Prompted {
                        already_awaiting: false,
                    });
                }
                Err(e) => {
                    debug!(error = %e, "failed to edit inline message, sending prompt instead");
                }
            }
        }

        self.send(chat_id, &self.messages.prompt, Some(Keyboard::ForceReply))
            .await?;
        Ok(Outcome::Prompted {
            already_awaiting: false,
        })
    }

    async fn submit(
        &mut self,
        user_id: UserId,
        username: Option<String>,
        chat_id: ChatId,
        text: String,
        now: Instant,
    ) -> Result<Outcome, IntakeError> {
        if let CooldownDecision::Denied { seconds_remaining } = self.cooldown.check(user_id, now) {
            debug!(user_id = %user_id, seconds_remaining, "submission rate limited");
            let reply = self.messages.cooldown_text(seconds_remaining);
            self.send(chat_id, &reply, None).await?;
            return Ok(Outcome::RateLimited { seconds_remaining });
        }

        if text.trim().is_empty() {
            self.send(chat_id, &self.messages.empty_text, Some(Keyboard::ForceReply))
                .await?;
            return Ok(Outcome::EmptyText);
        }

        let new_application = NewApplication {
            user_id,
            username: username.clone(),
            application_text: text,
        };

        let application_id = match self.store.insert_application(&new_application).await {
            Ok(id) => id,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "failed to persist application");
                self.send(chat_id, &self.messages.storage_failure, None)
                    .await?;
                return Ok(Outcome::PersistenceFailed);
            }
        };

        self.tracker.consume(user_id);
        self.cooldown.record_success(user_id, now);
        info!(user_id = %user_id, application_id, "application received");

        // The record is durable from here on; reply and forward failures are logged only.
        if let Err(e) = self
            .send(chat_id, &self.messages.confirmation, Some(Keyboard::ApplyMenu))
            .await
        {
            warn!(error = %e, "failed to send confirmation");
        }

        if let Some(destination) = &self.forward_chat {
            let copy = self
                .messages
                .forward_text(username.as_deref(), &new_application.application_text);
            if let Err(e) = self.channel.forward_to_chat(destination, &copy).await {
                warn!(
                    destination = destination.as_str(),
                    error = %e,
                    "failed to forward application"
                );
            }
        }

        Ok(Outcome::Submitted { application_id })
    }

    async fn send(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<(), IntakeError> {
        let mut msg = OutboundMessage::text(chat_id, text);
        if let Some(keyboard) = keyboard {
            msg = msg.with_keyboard(keyboard);
        }
        self.channel.reply(msg).await?;
        Ok(())
    }
}
