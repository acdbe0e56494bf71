//! REST endpoints for the onboarding wizard.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::view::WizardView;
use crate::server::ApiError;
use crate::session::SessionManager;

#[derive(Debug, Deserialize)]
struct AnswerRequest {
    input: String,
}

/// GET /api/sessions/{id}/onboarding
///
/// Current step, conversation so far and the next question.
async fn get_onboarding(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let session = sessions.get(id).await?;
    Ok(Json(WizardView::project(&session.wizard)))
}

/// POST /api/sessions/{id}/onboarding
///
/// Submits one answer. Empty input and unknown status choices come back as
/// `accepted: false` with no message; a bad date is a 422 carrying
/// "invalid date format".
async fn submit_answer(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<Uuid>,
    Json(body): Json<AnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reply = sessions.submit_onboarding(id, &body.input).await?;
    let response = match reply.result {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "accepted": true,
                "outcome": outcome,
                "view": reply.view,
            })),
        ),
        Err(e) => {
            let status = if e.is_silent() {
                StatusCode::OK
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            (
                status,
                Json(serde_json::json!({
                    "accepted": false,
                    "error": e.user_message(),
                    "view": reply.view,
                })),
            )
        }
    };
    Ok(response)
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(sessions: Arc<SessionManager>) -> Router {
    Router::new()
        .route(
            "/api/sessions/{id}/onboarding",
            get(get_onboarding).post(submit_answer),
        )
        .with_state(sessions)
}
