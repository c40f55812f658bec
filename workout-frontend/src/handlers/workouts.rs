use super::Screen;
use crate::error::FrontendError;
use crate::AppState;
use axum::{extract::State, response::Response, Form};
use tower_sessions::Session;
use workout_core::validation::WorkoutForm;

pub async fn generate_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<WorkoutForm>,
) -> Result<Response, FrontendError> {
    let mut screen = Screen::open(&state, session).await?;
    screen.controller.generate(form).await;
    screen.finish().await
}

pub async fn new_workout_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, FrontendError> {
    let mut screen = Screen::open(&state, session).await?;
    screen.controller.generate_new();
    screen.finish().await
}

pub async fn save_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, FrontendError> {
    let mut screen = Screen::open(&state, session).await?;
    screen.controller.save_result().await;
    screen.finish().await
}
