use super::Screen;
use crate::error::FrontendError;
use crate::AppState;
use axum::{extract::State, response::Response, Form};
use tower_sessions::Session;
use workout_core::validation::LoginForm;

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, FrontendError> {
    let mut screen = Screen::open(&state, session).await?;
    screen.controller.login(form).await;
    screen.finish().await
}

pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, FrontendError> {
    let mut screen = Screen::open(&state, session).await?;
    screen.controller.logout().await;
    screen.end().await
}
