// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the append-only application log.

use async_trait::async_trait;

use crate::error::IntakeError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Application, NewApplication};

/// Append-only store of submitted applications.
///
/// Records are immutable once written; there is no update or delete.
/// Implementations must serialize concurrent access themselves.
#[async_trait]
pub trait ApplicationStore: PluginAdapter {
    /// Opens the backend and ensures the schema exists. Safe on every startup.
    async fn initialize(&self) -> Result<(), IntakeError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), IntakeError>;

    /// Appends a new application and returns its store-assigned id.
    async fn insert_application(&self, application: &NewApplication) -> Result<i64, IntakeError>;

    /// Lists every stored application in insertion order.
    async fn list_applications(&self) -> Result<Vec<Application>, IntakeError>;

    /// Number of stored applications.
    async fn count_applications(&self) -> Result<i64, IntakeError>;
}
