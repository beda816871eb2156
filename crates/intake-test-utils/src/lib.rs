// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Intake integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a Telegram connection.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock channel with event injection and reply capture
//! - [`FailingStore`] - Application store whose writes always fail
//! - [`TestHarness`] - Intake flow wired to a mock channel and temp SQLite store
//! - [`events`] - Constructors for common inbound events

pub mod events;
pub mod harness;
pub mod mock_channel;
pub mod mock_store;

pub use harness::TestHarness;
pub use mock_channel::MockChannel;
pub use mock_store::FailingStore;
