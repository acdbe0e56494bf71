//! HTTP server: route assembly, health check and error mapping.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::chat::chat_routes;
use crate::error::{ChatError, DocumentError, Error, LlmError};
use crate::onboarding::onboarding_routes;
use crate::session::SessionManager;
use crate::session::routes::session_routes;

/// Build the full application router.
pub fn app_routes(sessions: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(session_routes(Arc::clone(&sessions)))
        .merge(onboarding_routes(Arc::clone(&sessions)))
        .merge(chat_routes(sessions))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "compliance-assist"
    }))
}

/// Handler error: wraps the crate error and picks the status code.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl<E: Into<Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Error::Chat(ChatError::OnboardingIncomplete) => StatusCode::CONFLICT,
            Error::Chat(ChatError::EmptyMessage) | Error::Document(DocumentError::MissingName) => {
                StatusCode::BAD_REQUEST
            }
            Error::Chat(ChatError::Llm(LlmError::RateLimited { .. })) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            Error::Chat(ChatError::Llm(_)) | Error::Llm(_) => StatusCode::BAD_GATEWAY,
            Error::Document(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Config(_) | Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (
            status,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (Error::SessionNotFound("x".into()), StatusCode::NOT_FOUND),
            (
                Error::Chat(ChatError::OnboardingIncomplete),
                StatusCode::CONFLICT,
            ),
            (
                Error::Chat(ChatError::Llm(LlmError::AuthFailed {
                    provider: "gemini".into(),
                })),
                StatusCode::BAD_GATEWAY,
            ),
            (
                Error::Document(DocumentError::Empty { name: "a".into() }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                Error::Document(DocumentError::MissingName),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }
}
