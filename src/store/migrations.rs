//! Schema setup for the libSQL session store.
//!
//! The applied schema version lives in SQLite's `user_version` pragma.
//! Each step runs in its own transaction together with the version bump.

use libsql::Connection;
use tracing::info;

use crate::error::DatabaseError;

/// Schema steps; entry `i` brings the database to version `i + 1`.
const SCHEMA: &[(&str, &str)] = &[(
    "sessions",
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        step TEXT NOT NULL,
        data TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions (user_id);
    "#,
)];

/// Version a fully migrated database reports.
pub fn latest_version() -> i64 {
    SCHEMA.len() as i64
}

/// Bring the schema up to date. Safe to call on every open.
pub async fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let applied = schema_version(conn).await?;

    for (idx, (label, sql)) in SCHEMA.iter().enumerate() {
        let version = idx as i64 + 1;
        if version <= applied {
            continue;
        }
        info!(version, label, "Upgrading session schema");
        let batch = format!("BEGIN;\n{sql}\nPRAGMA user_version = {version};\nCOMMIT;");
        if let Err(e) = conn.execute_batch(&batch).await {
            let _ = conn.execute("ROLLBACK", ()).await;
            return Err(DatabaseError::Migration(format!(
                "schema step {version} ({label}): {e}"
            )));
        }
    }

    Ok(())
}

/// Current `user_version`; 0 on a fresh database.
pub async fn schema_version(conn: &Connection) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query("PRAGMA user_version", ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("reading user_version: {e}")))?;

    let Some(row) = rows
        .next()
        .await
        .map_err(|e| DatabaseError::Migration(format!("reading user_version: {e}")))?
    else {
        return Ok(0);
    };
    row.get::<i64>(0)
        .map_err(|e| DatabaseError::Migration(format!("decoding user_version: {e}")))
}
