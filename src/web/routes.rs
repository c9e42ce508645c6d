use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use std::sync::Arc;

use crate::chat::{ChatRequest, Dispatcher};
use crate::error::ChatError;

/// Body returned for every failure; error detail stays in the logs.
const GENERIC_ERROR: &str = "An error occurred while processing your request";

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/api/chat", post(chat))
        .with_state(state)
}

/// POST /chat - dispatch one chat request
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    match state.dispatcher.handle(request).await {
        Ok(response) => (
            StatusCode::OK,
            Json(serde_json::json!({ "response": response })),
        ),
        Err(err) => {
            tracing::error!("[Web] Chat request failed: {:#}", err);

            // Client mistakes (bad model) vs backend trouble; the body is
            // the same generic message either way.
            let status = match err {
                ChatError::UnsupportedModel(_) | ChatError::NotImplemented(_) => {
                    StatusCode::BAD_REQUEST
                }
                ChatError::Provider(_) => StatusCode::BAD_GATEWAY,
            };

            (status, Json(serde_json::json!({ "error": GENERIC_ERROR })))
        }
    }
}
