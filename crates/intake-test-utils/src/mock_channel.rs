// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captured replies, forwards, and edits for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use intake_core::{
    AdapterType, ChannelAdapter, ChatId, HealthStatus, InboundEvent, IntakeError, MessageId,
    OutboundMessage, PluginAdapter,
};

/// A forwarded copy captured by [`MockChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedMessage {
    pub destination: String,
    pub text: String,
}

/// A message edit captured by [`MockChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub text: String,
}

/// A mock messaging channel for testing.
///
/// - **inbound**: events injected via `inject_event()` are returned by `receive()`
/// - **sent**: replies passed to `reply()` are captured and retrievable via `sent_messages()`
/// - **forwards** and **edits** are captured the same way
///
/// After `close()`, `receive()` drains the queue and then reports a closed channel.
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    forwards: Arc<Mutex<Vec<ForwardedMessage>>>,
    edits: Arc<Mutex<Vec<EditedMessage>>>,
    notify: Arc<Notify>,
    next_id: AtomicU64,
    closed: AtomicBool,
    receive_error: Mutex<Option<String>>,
    fail_forward: AtomicBool,
    fail_edit: AtomicBool,
    shut_down: AtomicBool,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            forwards: Arc::new(Mutex::new(Vec::new())),
            edits: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
            receive_error: Mutex::new(None),
            fail_forward: AtomicBool::new(false),
            fail_edit: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Inject an inbound event into the receive queue.
    pub async fn inject_event(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Mark the channel closed. Queued events are still delivered first.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Make the next `receive()` return a transport error with `message`.
    pub async fn fail_next_receive(&self, message: &str) {
        *self.receive_error.lock().await = Some(message.to_string());
        self.notify.notify_one();
    }

    /// Make every subsequent `forward_to_chat()` fail.
    pub fn fail_forwards(&self, fail: bool) {
        self.fail_forward.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `edit_message()` fail.
    pub fn fail_edits(&self, fail: bool) {
        self.fail_edit.store(fail, Ordering::SeqCst);
    }

    /// Whether `shutdown()` has been called.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Get all replies that were sent through `reply()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Text of every reply, in order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|m| m.text.clone()).collect()
    }

    /// The most recent reply, if any.
    pub async fn last_sent(&self) -> Option<OutboundMessage> {
        self.sent.lock().await.last().cloned()
    }

    /// Get the count of sent replies.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Get all successful forwards.
    pub async fn forwarded(&self) -> Vec<ForwardedMessage> {
        self.forwards.lock().await.clone()
    }

    /// Get all successful edits.
    pub async fn edits(&self) -> Vec<EditedMessage> {
        self.edits.lock().await.clone()
    }

    /// Clear captured replies, forwards, and edits.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
        self.forwards.lock().await.clear();
        self.edits.lock().await.clear();
    }

    fn next_message_id(&self) -> MessageId {
        MessageId(format!("mock-msg-{}", self.next_id.fetch_add(1, Ordering::SeqCst)))
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, IntakeError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), IntakeError> {
        self.shut_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), IntakeError> {
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, IntakeError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(message) = self.receive_error.lock().await.take() {
                    return Err(IntakeError::channel(message));
                }
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
                if self.closed.load(Ordering::SeqCst) {
                    return Err(IntakeError::ChannelClosed);
                }
            }
            self.notify.notified().await;
        }
    }

    async fn reply(&self, msg: OutboundMessage) -> Result<MessageId, IntakeError> {
        self.sent.lock().await.push(msg);
        Ok(self.next_message_id())
    }

    async fn forward_to_chat(
        &self,
        destination: &str,
        text: &str,
    ) -> Result<MessageId, IntakeError> {
        if self.fail_forward.load(Ordering::SeqCst) {
            return Err(IntakeError::channel(format!(
                "forward to {destination} failed: chat not found"
            )));
        }
        self.forwards.lock().await.push(ForwardedMessage {
            destination: destination.to_string(),
            text: text.to_string(),
        });
        Ok(self.next_message_id())
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: &MessageId,
        text: &str,
    ) -> Result<(), IntakeError> {
        if self.fail_edit.load(Ordering::SeqCst) {
            return Err(IntakeError::channel("message can't be edited"));
        }
        self.edits.lock().await.push(EditedMessage {
            chat_id,
            message_id: message_id.clone(),
            text: text.to_string(),
        });
        Ok(())
    }
}
