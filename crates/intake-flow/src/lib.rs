// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation flow and event loop for the Intake bot.
//!
//! The [`IntakeLoop`] is the single consumer of channel events:
//! - Receives events from a channel adapter
//! - Applies the intake state machine via [`IntakeFlow`]
//! - Stops on cancellation or when the channel closes, then shuts down
//!   the channel and closes the store

pub mod conversation;
pub mod cooldown;
pub mod flow;
pub mod shutdown;

use intake_core::IntakeError;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub use conversation::{ConversationState, ConversationTracker};
pub use cooldown::{CooldownDecision, SubmissionCooldown};
pub use flow::{IntakeFlow, Outcome};

/// Drives an [`IntakeFlow`] from its channel until shutdown.
pub struct IntakeLoop {
    flow: IntakeFlow,
}

impl IntakeLoop {
    pub fn new(flow: IntakeFlow) -> Self {
        info!("intake loop initialized");
        Self { flow }
    }

    pub fn flow(&self) -> &IntakeFlow {
        &self.flow
    }

    /// Runs until the cancellation token is triggered or the channel closes.
    ///
    /// Each event is handled to completion before the next is received.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), IntakeError> {
        info!("intake loop running");
        let channel = self.flow.channel().clone();

        loop {
            tokio::select! {
                event = channel.receive() => {
                    match event {
                        Ok(event) => {
                            let user_id = event.user_id;
                            match self.flow.handle_event(event, Instant::now()).await {
                                Ok(outcome) => {
                                    debug!(user_id = %user_id, ?outcome, "event handled");
                                }
                                Err(e) => {
                                    error!(user_id = %user_id, error = %e, "failed to handle event");
                                }
                            }
                        }
                        Err(e) if e.is_channel_closed() => {
                            info!("channel closed, stopping intake loop");
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping intake loop");
                    break;
                }
            }
        }

        if let Err(e) = channel.shutdown().await {
            error!(error = %e, "channel shutdown failed");
        }
        self.flow.store().close().await?;

        info!(
            awaiting = self.flow.awaiting_count(),
            "intake loop stopped"
        );
        Ok(())
    }
}
