//! REST endpoints for session lifecycle.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::SessionManager;
use crate::onboarding::WizardView;
use crate::server::ApiError;

/// POST /api/sessions
///
/// Starts a session at the first onboarding question.
async fn create_session(
    State(sessions): State<Arc<SessionManager>>,
) -> Result<impl IntoResponse, ApiError> {
    let session = sessions.create().await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session_id": session.id,
            "onboarding": WizardView::project(&session.wizard),
        })),
    ))
}

/// POST /api/sessions/{id}/reset
///
/// Full reset: profile, onboarding history and chat are all discarded.
async fn reset_session(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let session = sessions.reset(id).await?;
    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "onboarding": WizardView::project(&session.wizard),
    })))
}

/// DELETE /api/sessions/{id}
async fn end_session(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if sessions.end(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(crate::error::Error::SessionNotFound(id.to_string()).into())
    }
}

/// Build the session lifecycle routes.
pub fn session_routes(sessions: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", delete(end_session))
        .route("/api/sessions/{id}/reset", post(reset_session))
        .with_state(sessions)
}
