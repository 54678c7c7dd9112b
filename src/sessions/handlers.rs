use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::SessionResponse;
use crate::state::AppState;

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(end_session))
}

#[instrument(skip(state))]
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, HeaderMap, Json<SessionResponse>) {
    let id = state.sessions.create();
    info!(session_id = %id, active = state.sessions.len(), "session started");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/sessions/{}", id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }

    (
        StatusCode::CREATED,
        headers,
        Json(SessionResponse {
            id,
            nutrition_log: Vec::new(),
        }),
    )
}

#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    match state.sessions.log(id) {
        Some(nutrition_log) => Ok(Json(SessionResponse { id, nutrition_log })),
        None => {
            warn!(session_id = %id, "session not found");
            Err((StatusCode::NOT_FOUND, "Session not found".into()))
        }
    }
}

#[instrument(skip(state))]
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.sessions.end(id) {
        info!(session_id = %id, "session ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Session not found".into()))
    }
}
