//! REST endpoints for chat and document uploads.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::server::ApiError;
use crate::session::SessionManager;

/// Largest PDF accepted in one upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Debug, Deserialize)]
struct UploadParams {
    name: String,
}

/// GET /api/sessions/{id}/chat
async fn get_history(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let history = sessions.chat_history(id).await?;
    Ok(Json(serde_json::json!({ "messages": history })))
}

/// POST /api/sessions/{id}/chat
async fn send_message(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reply = sessions.send_chat(id, &body.message).await?;
    Ok(Json(reply))
}

/// POST /api/sessions/{id}/chat/reset
async fn reset_chat(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    sessions.reset_chat(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sessions/{id}/documents
async fn list_documents(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = sessions.documents(id).await?;
    Ok(Json(serde_json::json!({ "documents": documents })))
}

/// POST /api/sessions/{id}/documents?name=<file name>
///
/// Body is the raw PDF.
async fn upload_document(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<Uuid>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let result = sessions
        .upload_document(id, params.name.trim(), body.to_vec())
        .await?;
    let status = if result.added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(result)))
}

/// Build the chat and document routes.
pub fn chat_routes(sessions: Arc<SessionManager>) -> Router {
    Router::new()
        .route(
            "/api/sessions/{id}/chat",
            get(get_history).post(send_message),
        )
        .route("/api/sessions/{id}/chat/reset", post(reset_chat))
        .route(
            "/api/sessions/{id}/documents",
            get(list_documents)
                .post(upload_document)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(sessions)
}
