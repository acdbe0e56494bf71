//! libSQL backend: sessions persisted as JSON rows.
//!
//! Supports local file and in-memory databases.

use std::path::Path;

use async_trait::async_trait;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};
use uuid::Uuid;

use super::migrations;
use super::traits::SessionStore;
use crate::error::DatabaseError;
use crate::session::Session;

/// Session store backed by one libSQL connection.
///
/// Callers serialize writes per session; the connection itself is shared.
pub struct LibSqlSessionStore {
    // The connection borrows from the database handle; keep it alive.
    _db: LibSqlDatabase,
    conn: Connection,
}

impl LibSqlSessionStore {
    /// Open a database file, creating it and its directory when missing.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| DatabaseError::Pool(format!("{}: {e}", dir.display())))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("{}: {e}", path.display())))?;

        let store = Self::from_database(db)?;
        migrations::run_migrations(&store.conn).await?;
        info!(path = %path.display(), "Session database ready");
        Ok(store)
    }

    /// Throwaway database that lives as long as the store.
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("in-memory database: {e}")))?;

        let store = Self::from_database(db)?;
        migrations::run_migrations(&store.conn).await?;
        Ok(store)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("connect: {e}")))?;
        Ok(Self {
            _db: db,
            conn,
        })
    }
}

#[async_trait]
impl SessionStore for LibSqlSessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<Session>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT data FROM sessions WHERE id = ?1",
                params![id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("load_session: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let data: String = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("load_session: {e}")))?;
                let session = serde_json::from_str(&data)
                    .map_err(|e| DatabaseError::Serialization(e.to_string()))?;
                Ok(Some(session))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("load_session: {e}"))),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), DatabaseError> {
        let data = serde_json::to_string(session)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO sessions (id, user_id, step, data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (id) DO UPDATE SET step = ?3, data = ?4, updated_at = ?6",
                params![
                    session.id.to_string(),
                    session.user_id.to_string(),
                    session.wizard.current_step.to_string(),
                    data,
                    session.created_at.to_rfc3339(),
                    session.updated_at.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("save_session: {e}")))?;

        debug!(session_id = %session.id, step = %session.wizard.current_step, "Session saved");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let count = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?1", params![id.to_string()])
            .await
            .map_err(|e| DatabaseError::Query(format!("delete_session: {e}")))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> LibSqlSessionStore {
        LibSqlSessionStore::new_memory().await.unwrap()
    }

    #[tokio::test]
    async fn session_crud() {
        let db = test_db().await;
        let mut session = Session::new();

        assert!(db.load(session.id).await.unwrap().is_none());

        db.save(&session).await.unwrap();
        assert_eq!(db.load(session.id).await.unwrap().unwrap(), session);

        // Upsert
        session.wizard.submit("Acme").unwrap();
        session.wizard.submit("Fintech").unwrap();
        db.save(&session).await.unwrap();
        let loaded = db.load(session.id).await.unwrap().unwrap();
        assert_eq!(loaded.wizard.profile.sector.as_deref(), Some("Fintech"));
        assert_eq!(loaded.wizard.history.len(), 4);

        assert!(db.delete(session.id).await.unwrap());
        assert!(db.load(session.id).await.unwrap().is_none());
        assert!(!db.delete(session.id).await.unwrap());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let db = test_db().await;
        let mut a = Session::new();
        let b = Session::new();
        a.wizard.submit("Alpha").unwrap();

        db.save(&a).await.unwrap();
        db.save(&b).await.unwrap();

        let la = db.load(a.id).await.unwrap().unwrap();
        let lb = db.load(b.id).await.unwrap().unwrap();
        assert_eq!(la.wizard.profile.company_name.as_deref(), Some("Alpha"));
        assert!(lb.wizard.profile.company_name.is_none());
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("sessions.db");
        let session = Session::new();

        {
            let db = LibSqlSessionStore::new_local(&path).await.unwrap();
            db.save(&session).await.unwrap();
        }

        let db = LibSqlSessionStore::new_local(&path).await.unwrap();
        assert_eq!(db.load(session.id).await.unwrap().unwrap().id, session.id);
    }
}
