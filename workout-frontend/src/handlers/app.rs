use super::Screen;
use crate::error::FrontendError;
use crate::AppState;
use axum::{extract::State, response::Response};
use tower_sessions::Session;

/// Current view of this browser.
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, FrontendError> {
    Screen::open(&state, session).await?.finish().await
}

pub async fn health_check() -> &'static str {
    "OK"
}
