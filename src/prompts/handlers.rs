use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use super::dto::{ActivityLevel, AskResponse, Mode, ModeInfo, PreviewResponse, PromptRequest};
use super::services::{self, AskError};
use crate::llm::CompletionError;
use crate::state::AppState;

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/modes", get(list_modes))
        .route("/activity-levels", get(list_activity_levels))
        .route("/prompts/preview", post(preview_prompt))
}

pub fn ask_routes() -> Router<AppState> {
    Router::new().route("/sessions/:id/ask", post(ask))
}

pub async fn list_modes() -> Json<Vec<ModeInfo>> {
    Json(Mode::ALL.into_iter().map(ModeInfo::from).collect())
}

pub async fn list_activity_levels() -> Json<Vec<&'static str>> {
    Json(ActivityLevel::ALL.into_iter().map(ActivityLevel::label).collect())
}

/// Builds the prompt without contacting the completion service.
pub async fn preview_prompt(Json(req): Json<PromptRequest>) -> Json<PreviewResponse> {
    let built = services::build_prompt(&req);
    Json(PreviewResponse {
        mode: built.mode,
        prompt: built.text,
        item: built.item,
    })
}

#[instrument(skip(state, req))]
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PromptRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    services::ask(&state, id, &req).await.map(Json).map_err(|e| {
        match &e {
            AskError::UnknownSession(_) => {
                warn!(session_id = %id, "ask on unknown session");
                (StatusCode::NOT_FOUND, "Session not found".into())
            }
            AskError::Completion(inner) => {
                error!(error = %inner, session_id = %id, "completion failed");
                (completion_status(inner), e.to_string())
            }
        }
    })
}

fn completion_status(e: &CompletionError) -> StatusCode {
    match e {
        CompletionError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::BAD_GATEWAY,
    }
}
