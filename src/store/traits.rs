//! `SessionStore` trait, the one persistence seam the service needs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::session::Session;

/// Backend-agnostic session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session, or `None` if it was never saved or was deleted.
    async fn load(&self, id: Uuid) -> Result<Option<Session>, DatabaseError>;

    /// Insert or replace a session.
    async fn save(&self, session: &Session) -> Result<(), DatabaseError>;

    /// Remove a session. Returns whether it existed.
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;
}
