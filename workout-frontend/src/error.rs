use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use workout_core::error::{STORAGE_ERROR, UNKNOWN_ERROR};
use workout_core::ClientError;

/// Failures outside the view controller's own error handling.
#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl IntoResponse for FrontendError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");

        let message = match &self {
            FrontendError::Session(_) | FrontendError::Client(ClientError::Storage(_)) => {
                STORAGE_ERROR
            }
            _ => UNKNOWN_ERROR,
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!("<p class='notice notice-error'>{}</p>", message)),
        )
            .into_response()
    }
}
