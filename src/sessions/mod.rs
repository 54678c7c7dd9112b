mod dto;
pub mod handlers;
mod repo;

pub use repo::{NutritionLogEntry, SessionStore};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::session_routes())
}
