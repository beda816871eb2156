// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append and read operations on the `applications` table.
//!
//! There are deliberately no update or delete queries: records are immutable.

use intake_core::{Application, IntakeError, NewApplication};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

const SELECT_COLUMNS: &str = "SELECT id, user_id, username, application_text, created_at FROM applications";

fn row_to_application(row: &rusqlite::Row<'_>) -> rusqlite::Result<Application> {
    Ok(Application {
        id: row.get(0)?,
        user_id: row.get(1)?,
        username: row.get(2)?,
        application_text: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Append a new application. Returns the store-assigned id.
pub async fn insert_application(db: &Database, app: &NewApplication) -> Result<i64, IntakeError> {
    let app = app.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO applications (user_id, username, application_text)
                 VALUES (?1, ?2, ?3)",
                params![app.user_id.0, app.username, app.application_text],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// All applications in insertion order.
pub async fn list_applications(db: &Database) -> Result<Vec<Application>, IntakeError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;
            let rows = stmt.query_map([], row_to_application)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Applications submitted by one user, oldest first.
pub async fn list_applications_for_user(
    db: &Database,
    user_id: i64,
) -> Result<Vec<Application>, IntakeError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE user_id = ?1 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(params![user_id], row_to_application)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Total number of stored applications.
pub async fn count_applications(db: &Database) -> Result<i64, IntakeError> {
    db.connection()
        .call(|conn| conn.query_row("SELECT COUNT(*) FROM applications", [], |row| row.get(0)))
        .await
        .map_err(map_tr_err)
}
