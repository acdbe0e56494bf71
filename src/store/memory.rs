//! In-process session store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::SessionStore;
use crate::error::DatabaseError;
use crate::session::Session;

/// Sessions kept in a map; lost on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<Session>, DatabaseError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), DatabaseError> {
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.sessions.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_load_delete() {
        let store = MemorySessionStore::new();
        let mut session = Session::new();

        assert!(store.load(session.id).await.unwrap().is_none());

        store.save(&session).await.unwrap();
        assert_eq!(store.load(session.id).await.unwrap().unwrap(), session);

        session.wizard.submit("Acme").unwrap();
        store.save(&session).await.unwrap();
        assert_eq!(store.len().await, 1);
        let loaded = store.load(session.id).await.unwrap().unwrap();
        assert_eq!(loaded.wizard.profile.company_name.as_deref(), Some("Acme"));

        assert!(store.delete(session.id).await.unwrap());
        assert!(!store.delete(session.id).await.unwrap());
        assert!(store.load(session.id).await.unwrap().is_none());
    }
}
