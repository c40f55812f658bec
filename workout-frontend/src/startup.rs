use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::ServerSettings;
use crate::handlers::{
    app::{health_check, index},
    auth::{login_handler, logout_handler},
    history::{back_handler, close_handler, delete_handler, detail_handler, open_handler},
    metrics::metrics,
    workouts::{generate_handler, new_workout_handler, save_handler},
};
use crate::middleware::{
    metrics::metrics_middleware, request_id::request_id_middleware,
    security_headers::security_headers_middleware,
};
use crate::AppState;

pub fn build_router(state: AppState, server: &ServerSettings) -> Router {
    // Session setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            server.session_idle_hours,
        )));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/workouts/generate", post(generate_handler))
        .route("/workouts/new", post(new_workout_handler))
        .route("/workouts/save", post(save_handler))
        .route("/history", post(open_handler))
        .route("/history/close", post(close_handler))
        .route("/history/back", post(back_handler))
        .route("/history/select", post(detail_handler))
        .route("/history/delete", post(delete_handler))
        .route_layer(from_fn(metrics_middleware))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost, so the id exists before the span is created
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
