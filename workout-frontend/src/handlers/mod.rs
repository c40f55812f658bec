pub mod app;
pub mod auth;
pub mod history;
pub mod metrics;
pub mod workouts;

use crate::error::FrontendError;
use crate::services::client_locks::ClientLocks;
use crate::services::session_storage::CookieSessionStorage;
use crate::views;
use crate::AppState;
use axum::response::Response;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tower_sessions::Session;
use workout_core::{SessionStore, ViewController, ViewState};

pub const VIEW_STATE_KEY: &str = "view_state";

/// The view controller of one browser, loaded from its session record.
///
/// Holds the browser's lock from [`Screen::open`] until the response is
/// rendered, so requests from the same browser never interleave.
pub struct Screen {
    pub controller: ViewController,
    session: Session,
    locks: ClientLocks,
    lock: Option<(String, OwnedMutexGuard<()>)>,
    had_view_state: bool,
}

impl Screen {
    pub async fn open(state: &AppState, session: Session) -> Result<Self, FrontendError> {
        // The session record is read only after the lock is held.
        let lock = match session.id() {
            Some(id) => {
                let key = id.to_string();
                let guard = state.locks.acquire(&key).await;
                Some((key, guard))
            }
            None => None,
        };

        let saved = match session.get::<ViewState>(VIEW_STATE_KEY).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable view state");
                None
            }
        };
        let had_view_state = saved.is_some();

        let store = SessionStore::new(Arc::new(CookieSessionStorage::new(session.clone())));
        let resumed =
            ViewController::resume(state.webhooks.clone(), store, state.policy, saved).await;
        let controller = match resumed {
            Ok(controller) => controller,
            Err(e) => {
                if let Some((key, guard)) = lock {
                    state.locks.release(&key, guard);
                }
                return Err(e.into());
            }
        };

        Ok(Self {
            controller,
            session,
            locks: state.locks.clone(),
            lock,
            had_view_state,
        })
    }

    /// Persist the view state and render the current page.
    pub async fn finish(mut self) -> Result<Response, FrontendError> {
        match self.controller.state() {
            ViewState::LoggedOut => {
                if self.had_view_state {
                    self.session.remove_value(VIEW_STATE_KEY).await?;
                }
            }
            // a generation in flight is never persisted
            ViewState::Generating { .. } => {}
            state => {
                self.session.insert(VIEW_STATE_KEY, state).await?;
            }
        }

        let response = views::render(&mut self.controller);
        self.unlock();
        Ok(response)
    }

    /// End the browser session: drop its record and cookie.
    pub async fn end(mut self) -> Result<Response, FrontendError> {
        self.session.flush().await?;

        let response = views::render(&mut self.controller);
        self.unlock();
        Ok(response)
    }

    fn unlock(&mut self) {
        if let Some((key, guard)) = self.lock.take() {
            self.locks.release(&key, guard);
        }
    }
}

impl Drop for Screen {
    // error paths return before `finish`; the entry must not outlive them
    fn drop(&mut self) {
        self.unlock();
    }
}
