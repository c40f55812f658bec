use super::Screen;
use crate::error::FrontendError;
use crate::AppState;
use axum::{extract::State, response::Response, Form};
use serde::Deserialize;
use tower_sessions::Session;
use workout_core::ViewState;

/// A saved workout picked from the history list.
#[derive(Deserialize)]
pub struct SavedWorkoutForm {
    pub id: String,
}

pub async fn open_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, FrontendError> {
    let mut screen = Screen::open(&state, session).await?;
    screen.controller.open_history().await;
    screen.finish().await
}

pub async fn close_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, FrontendError> {
    let mut screen = Screen::open(&state, session).await?;
    screen.controller.close_history();
    screen.finish().await
}

pub async fn detail_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SavedWorkoutForm>,
) -> Result<Response, FrontendError> {
    let mut screen = Screen::open(&state, session).await?;
    // the browser resubmitting the selection from a detail page
    if matches!(screen.controller.state(), ViewState::HistoryDetail { .. }) {
        screen.controller.back_to_history();
    }
    screen.controller.select_saved(&form.id);
    screen.finish().await
}

pub async fn back_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, FrontendError> {
    let mut screen = Screen::open(&state, session).await?;
    screen.controller.back_to_history();
    screen.finish().await
}

pub async fn delete_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SavedWorkoutForm>,
) -> Result<Response, FrontendError> {
    let mut screen = Screen::open(&state, session).await?;
    screen.controller.delete_saved(&form.id).await;
    screen.finish().await
}
