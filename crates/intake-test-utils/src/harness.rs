// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` wires an [`IntakeFlow`] to a [`MockChannel`] and a temp
//! SQLite store (or a [`FailingStore`]). Provides `send()` to drive the
//! state machine in tests.

use std::sync::Arc;

use intake_config::IntakeConfig;
use intake_config::model::StorageConfig;
use intake_core::{
    Application, ApplicationStore, ChannelAdapter, InboundEvent, IntakeError, UserId,
};
use intake_flow::{ConversationState, IntakeFlow, IntakeLoop, Outcome};
use intake_storage::SqliteStorage;
use tokio::time::Instant;

use crate::mock_channel::MockChannel;
use crate::mock_store::FailingStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: IntakeConfig,
    failing_store: bool,
    database_path: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: IntakeConfig::default(),
            failing_store: false,
            database_path: None,
        }
    }

    /// Set the submission cooldown.
    pub fn with_cooldown_secs(mut self, secs: u64) -> Self {
        self.config.limits.submission_cooldown_secs = secs;
        self
    }

    /// Forward a copy of every application to `destination`.
    pub fn with_forward_chat(mut self, destination: &str) -> Self {
        self.config.telegram.forward_chat = Some(destination.to_string());
        self
    }

    /// Back the flow with a [`FailingStore`] instead of SQLite.
    pub fn with_failing_store(mut self) -> Self {
        self.failing_store = true;
        self
    }

    /// Use a SQLite file at `path` instead of a fresh temp database.
    pub fn with_database_path(mut self, path: &str) -> Self {
        self.database_path = Some(path.to_string());
        self
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: IntakeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the test harness.
    pub async fn build(self) -> Result<TestHarness, IntakeError> {
        let mock_channel = Arc::new(MockChannel::new());

        let store: Arc<dyn ApplicationStore>;
        let mut failing_store = None;
        let mut temp_dir = None;

        if self.failing_store {
            let failing = Arc::new(FailingStore::new());
            store = failing.clone();
            failing_store = Some(failing);
        } else {
            let database_path = match self.database_path {
                Some(path) => path,
                None => {
                    let dir = tempfile::TempDir::new()
                        .map_err(|e| IntakeError::Storage { source: e.into() })?;
                    let path = dir.path().join("test.db").to_string_lossy().to_string();
                    temp_dir = Some(dir);
                    path
                }
            };
            let storage = SqliteStorage::new(StorageConfig {
                database_path,
                wal_mode: true,
            });
            storage.initialize().await?;
            store = Arc::new(storage);
        }

        let channel: Arc<dyn ChannelAdapter> = mock_channel.clone();
        let flow = IntakeFlow::new(channel, store.clone(), &self.config);

        Ok(TestHarness {
            mock_channel,
            store,
            failing_store,
            flow,
            config: self.config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock channel and temp storage.
pub struct TestHarness {
    /// The mock channel adapter.
    pub mock_channel: Arc<MockChannel>,
    /// The application store the flow writes to.
    pub store: Arc<dyn ApplicationStore>,
    /// Set when built with [`TestHarnessBuilder::with_failing_store`].
    pub failing_store: Option<Arc<FailingStore>>,
    /// The flow under test.
    pub flow: IntakeFlow,
    /// Configuration the flow was built from.
    pub config: IntakeConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: Option<tempfile::TempDir>,
}

/// Pieces of a harness turned into a runnable loop.
pub struct LoopParts {
    pub intake_loop: IntakeLoop,
    pub mock_channel: Arc<MockChannel>,
    pub store: Arc<dyn ApplicationStore>,
    /// Temp directory kept alive for cleanup on drop.
    pub temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default configuration and a SQLite store.
    pub async fn new() -> Result<Self, IntakeError> {
        Self::builder().build().await
    }

    /// Handle one event at the current (possibly paused) tokio time.
    pub async fn send(&mut self, event: InboundEvent) -> Result<Outcome, IntakeError> {
        self.flow.handle_event(event, Instant::now()).await
    }

    /// Handle a sequence of events, returning each outcome in order.
    pub async fn send_all(
        &mut self,
        events: impl IntoIterator<Item = InboundEvent>,
    ) -> Result<Vec<Outcome>, IntakeError> {
        let mut outcomes = Vec::new();
        for event in events {
            outcomes.push(self.send(event).await?);
        }
        Ok(outcomes)
    }

    pub fn state_of(&self, user_id: i64) -> ConversationState {
        self.flow.state_of(UserId(user_id))
    }

    /// All stored applications in id order.
    pub async fn applications(&self) -> Result<Vec<Application>, IntakeError> {
        self.store.list_applications().await
    }

    /// Turn the harness into an [`IntakeLoop`] fed by the mock channel.
    pub fn into_loop(self) -> LoopParts {
        LoopParts {
            intake_loop: IntakeLoop::new(self.flow),
            mock_channel: self.mock_channel,
            store: self.store,
            temp_dir: self._temp_dir,
        }
    }
}
