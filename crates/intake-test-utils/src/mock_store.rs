// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory application store with switchable write failures.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use intake_core::{
    AdapterType, Application, ApplicationStore, HealthStatus, IntakeError, NewApplication,
    PluginAdapter,
};

/// An application store that fails every insert while `failing` is set.
///
/// Successful inserts are kept in memory so a test can switch failures off
/// and verify a retry.
pub struct FailingStore {
    failing: AtomicBool,
    records: Mutex<Vec<Application>>,
    closed: AtomicBool,
}

impl FailingStore {
    /// A store whose inserts fail until `set_failing(false)`.
    pub fn new() -> Self {
        Self {
            failing: AtomicBool::new(true),
            records: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for FailingStore {
    fn name(&self) -> &str {
        "failing-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, IntakeError> {
        if self.failing.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("writes failing".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), IntakeError> {
        Ok(())
    }
}

#[async_trait]
impl ApplicationStore for FailingStore {
    async fn initialize(&self) -> Result<(), IntakeError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), IntakeError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn insert_application(&self, application: &NewApplication) -> Result<i64, IntakeError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(IntakeError::Storage {
                source: "database is locked".into(),
            });
        }
        let mut records = self.records.lock().await;
        let id = records.len() as i64 + 1;
        records.push(Application {
            id,
            user_id: application.user_id.0,
            username: application.username.clone(),
            application_text: application.application_text.clone(),
            created_at: "1970-01-01T00:00:00.000Z".to_string(),
        });
        Ok(id)
    }

    async fn list_applications(&self) -> Result<Vec<Application>, IntakeError> {
        Ok(self.records.lock().await.clone())
    }

    async fn count_applications(&self) -> Result<i64, IntakeError> {
        Ok(self.records.lock().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::UserId;

    fn app(text: &str) -> NewApplication {
        NewApplication {
            user_id: UserId(1),
            username: None,
            application_text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn inserts_fail_until_switched_off() {
        let store = FailingStore::new();
        let err = store.insert_application(&app("first")).await.unwrap_err();
        assert!(err.is_storage());
        assert_eq!(store.count_applications().await.unwrap(), 0);

        store.set_failing(false);
        assert_eq!(store.insert_application(&app("second")).await.unwrap(), 1);
        assert_eq!(store.list_applications().await.unwrap()[0].application_text, "second");
    }

    #[tokio::test]
    async fn health_reflects_failure_mode() {
        let store = FailingStore::new();
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
        store.set_failing(false);
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
