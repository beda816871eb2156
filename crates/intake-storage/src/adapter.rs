// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`ApplicationStore`] backed by a single SQLite file.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use intake_config::model::StorageConfig;
use intake_core::{
    AdapterType, Application, ApplicationStore, HealthStatus, IntakeError, NewApplication,
    PluginAdapter,
};

use crate::database::Database;
use crate::queries::applications;

/// SQLite-backed application store.
///
/// Nothing touches the disk until [`ApplicationStore::initialize`] opens the
/// database; every other operation fails with a storage error before that.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Path of the database file this store writes to.
    pub fn path(&self) -> &str {
        &self.config.database_path
    }

    fn db(&self) -> Result<&Database, IntakeError> {
        self.db.get().ok_or_else(|| IntakeError::Storage {
            source: format!("database {} is not open", self.config.database_path).into(),
        })
    }

    /// Applications submitted by a single user, oldest first.
    pub async fn list_applications_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<Application>, IntakeError> {
        applications::list_applications_for_user(self.db()?, user_id).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, IntakeError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("database not open".into()));
        };
        Ok(match db.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), IntakeError> {
        match self.db.get() {
            Some(db) => db.checkpoint().await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ApplicationStore for SqliteStorage {
    async fn initialize(&self) -> Result<(), IntakeError> {
        if self.db.initialized() {
            return Err(IntakeError::Storage {
                source: "database is already open".into(),
            });
        }
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        if self.db.set(db).is_err() {
            return Err(IntakeError::Storage {
                source: "database was opened concurrently".into(),
            });
        }
        info!(
            path = self.config.database_path.as_str(),
            wal = self.config.wal_mode,
            "application store open"
        );
        Ok(())
    }

    async fn close(&self) -> Result<(), IntakeError> {
        self.db()?.checkpoint().await?;
        debug!("application store flushed");
        Ok(())
    }

    async fn insert_application(&self, application: &NewApplication) -> Result<i64, IntakeError> {
        applications::insert_application(self.db()?, application).await
    }

    async fn list_applications(&self) -> Result<Vec<Application>, IntakeError> {
        applications::list_applications(self.db()?).await
    }

    async fn count_applications(&self) -> Result<i64, IntakeError> {
        applications::count_applications(self.db()?).await
    }
}
