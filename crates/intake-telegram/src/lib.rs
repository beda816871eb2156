// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Intake bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling, command registration, reply keyboards or inline buttons,
//! forwarding to a secondary chat, and in-place message edits.

pub mod handler;
pub mod keyboard;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use intake_config::model::TelegramConfig;
use intake_core::{
    AdapterType, ChannelAdapter, ChatId, HealthStatus, InboundEvent, IntakeError, MessageId,
    OutboundMessage, PluginAdapter,
};
use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;
use teloxide::types::{ChatId as TgChatId, MessageId as TgMessageId, Recipient};
use teloxide::utils::command::BotCommands;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::handler::{Command, HandlerContext};

/// Capacity of the queue between the dispatcher and the intake loop.
const INBOUND_QUEUE: usize = 100;

/// How long `shutdown()` waits for the dispatcher to finish in-flight updates.
const DISPATCHER_STOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Updates are mapped to [`InboundEvent`]s by the teloxide dispatcher and
/// queued for [`ChannelAdapter::receive`].
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    shutdown_token: Option<ShutdownToken>,
    polling_handle: tokio::sync::Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set and non-empty.
    pub fn new(config: TelegramConfig) -> Result<Self, IntakeError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            IntakeError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.trim().is_empty() {
            return Err(IntakeError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE);

        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            shutdown_token: None,
            polling_handle: tokio::sync::Mutex::new(None),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    fn markup(&self, keyboard: intake_core::Keyboard) -> teloxide::types::ReplyMarkup {
        keyboard::render(keyboard, self.config.trigger, &self.config.apply_button_label)
    }
}

fn channel_err(action: &str, e: teloxide::RequestError) -> IntakeError {
    IntakeError::Channel {
        message: format!("failed to {action}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Numeric destinations are chat ids; anything else is a public `@channel` username.
fn recipient(destination: &str) -> Recipient {
    match destination.trim().parse::<i64>() {
        Ok(id) => Recipient::Id(TgChatId(id)),
        Err(_) => Recipient::ChannelUsername(destination.trim().to_string()),
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, IntakeError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), IntakeError> {
        debug!("Telegram channel shutting down");

        if let Some(token) = &self.shutdown_token {
            // The returned future only signals completion; the handle below is awaited instead.
            if token.shutdown().is_err() {
                debug!("dispatcher already idle");
            }
        }

        if let Some(handle) = self.polling_handle.lock().await.take() {
            match tokio::time::timeout(DISPATCHER_STOP_TIMEOUT, handle).await {
                Ok(Ok(())) => info!("Telegram dispatcher stopped"),
                Ok(Err(e)) => warn!(error = %e, "Telegram dispatcher task failed"),
                Err(_) => warn!("timed out waiting for Telegram dispatcher to stop"),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), IntakeError> {
        if self.shutdown_token.is_some() {
            return Ok(()); // Already connected
        }

        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| channel_err("reach Telegram (getMe)", e))?;
        let bot_username = me.username().to_string();

        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %e, "failed to register bot commands");
        }

        let ctx = Arc::new(HandlerContext {
            bot_username: bot_username.clone(),
            trigger: self.config.trigger,
            apply_button_label: self.config.apply_button_label.clone(),
        });

        let message_tx = self.inbound_tx.clone();
        let message_ctx = ctx.clone();
        let callback_tx = self.inbound_tx.clone();

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(move |msg: Message| {
                let tx = message_tx.clone();
                let ctx = message_ctx.clone();
                async move {
                    match handler::message_to_event(&msg, &ctx) {
                        Some(event) => {
                            if tx.send(event).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => {
                            debug!(msg_id = msg.id.0, "ignoring message without sender");
                        }
                    }
                    respond(())
                }
            }))
            .branch(Update::filter_callback_query().endpoint(
                move |bot: Bot, query: CallbackQuery| {
                    let tx = callback_tx.clone();
                    async move {
                        // Stop the client-side spinner regardless of what the query carries.
                        if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                            debug!(error = %e, "failed to answer callback query");
                        }
                        if let Some(event) = handler::callback_to_event(&query)
                            && tx.send(event).await.is_err()
                        {
                            warn!("inbound channel closed, dropping callback");
                        }
                        respond(())
                    }
                },
            ));

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|_| async {}) // Silently ignore other update kinds
            .build();
        self.shutdown_token = Some(dispatcher.shutdown_token());

        info!(bot = bot_username.as_str(), trigger = ?self.config.trigger, "starting Telegram long polling");

        let handle = tokio::spawn(async move {
            dispatcher.dispatch().await;
        });
        *self.polling_handle.lock().await = Some(handle);
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, IntakeError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv()
            .await
            .ok_or(IntakeError::ChannelClosed)
    }

    async fn reply(&self, msg: OutboundMessage) -> Result<MessageId, IntakeError> {
        let mut request = self.bot.send_message(TgChatId(msg.chat_id.0), msg.text);
        if let Some(keyboard) = msg.keyboard {
            request = request.reply_markup(self.markup(keyboard));
        }
        let sent = request.await.map_err(|e| channel_err("send message", e))?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn forward_to_chat(
        &self,
        destination: &str,
        text: &str,
    ) -> Result<MessageId, IntakeError> {
        let sent = self
            .bot
            .send_message(recipient(destination), text)
            .await
            .map_err(|e| channel_err("forward application", e))?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: &MessageId,
        text: &str,
    ) -> Result<(), IntakeError> {
        let msg_id = message_id
            .0
            .parse::<i32>()
            .map(TgMessageId)
            .map_err(|e| IntakeError::channel(format!("invalid message_id: {e}")))?;

        match self
            .bot
            .edit_message_text(TgChatId(chat_id.0), msg_id, text)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("message is not modified") => Ok(()),
            Err(e) => Err(channel_err("edit message", e)),
        }
    }
}
