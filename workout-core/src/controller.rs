//! View controller: the single state machine behind every screen.
//!
//! ```text
//! LoggedOut --login--> GeneratorIdle --submit--> Generating --ok--> ResultShown
//!                          ^    ^                     |                 |
//!                          |    +------ failure ------+   generate new  |
//!                          |    +---------------------------------------+
//!   GeneratorIdle/ResultShown --history--> HistoryList <--back-- HistoryDetail
//! ```
//!
//! Every event method catches its own errors and turns them into notices, so
//! the controller is always left in a valid state.

use crate::error::ClientError;
use crate::models::{SavedWorkout, WorkoutPlan};
use crate::session::{Session, SessionStore};
use crate::validation::{LoginForm, WorkoutForm, WorkoutRequest};
use crate::webhooks::WorkoutWebhooks;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEV_EMAIL: &str = "teste@tribo.com";
pub const DEV_PASSWORD: &str = "123456";

const INVALID_TRANSITION: &str = "Ação indisponível nesta tela";
const WORKOUT_NOT_FOUND: &str = "Treino não encontrado";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewState {
    LoggedOut,
    GeneratorIdle {
        #[serde(default)]
        draft: WorkoutForm,
    },
    Generating {
        request: WorkoutRequest,
    },
    ResultShown {
        request: WorkoutRequest,
        plan: WorkoutPlan,
    },
    HistoryList {
        workouts: Vec<SavedWorkout>,
    },
    HistoryDetail {
        workouts: Vec<SavedWorkout>,
        selected: SavedWorkout,
    },
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::LoggedOut => "logged_out",
            ViewState::GeneratorIdle { .. } => "generator_idle",
            ViewState::Generating { .. } => "generating",
            ViewState::ResultShown { .. } => "result_shown",
            ViewState::HistoryList { .. } => "history_list",
            ViewState::HistoryDetail { .. } => "history_detail",
        }
    }

    fn idle() -> Self {
        ViewState::GeneratorIdle {
            draft: WorkoutForm::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient message for the notification area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoginPolicy {
    /// Accept the fixed development credentials without calling the webhook.
    pub dev_bypass: bool,
}

impl LoginPolicy {
    /// Release builds never honour the bypass, whatever the configuration says.
    pub fn allows_bypass(&self) -> bool {
        self.dev_bypass && cfg!(debug_assertions)
    }
}

pub struct ViewController {
    webhooks: Arc<dyn WorkoutWebhooks>,
    store: SessionStore,
    policy: LoginPolicy,
    session: Option<Session>,
    state: ViewState,
    notices: Vec<Notice>,
    login_error: Option<String>,
}

impl ViewController {
    /// Start from scratch: the session store alone decides the first view.
    pub async fn start(
        webhooks: Arc<dyn WorkoutWebhooks>,
        store: SessionStore,
        policy: LoginPolicy,
    ) -> Result<Self, ClientError> {
        Self::resume(webhooks, store, policy, None).await
    }

    /// Continue from a previously persisted view state.
    ///
    /// The saved state is only trusted while the store still holds a session.
    pub async fn resume(
        webhooks: Arc<dyn WorkoutWebhooks>,
        store: SessionStore,
        policy: LoginPolicy,
        saved: Option<ViewState>,
    ) -> Result<Self, ClientError> {
        let session = store.load().await?;
        let state = match (&session, saved) {
            (None, _) => ViewState::LoggedOut,
            (Some(_), None) | (Some(_), Some(ViewState::LoggedOut)) => ViewState::idle(),
            // a generation that never finished is shown as the filled form
            (Some(_), Some(ViewState::Generating { request })) => ViewState::GeneratorIdle {
                draft: WorkoutForm::from(&request),
            },
            (Some(_), Some(state)) => state,
        };

        Ok(Self {
            webhooks,
            store,
            policy,
            session,
            state,
            notices: Vec::new(),
            login_error: None,
        })
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Inline message for the login form, if the last login attempt failed.
    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    pub async fn login(&mut self, form: LoginForm) {
        if !matches!(self.state, ViewState::LoggedOut) {
            self.reject("login");
            return;
        }
        self.login_error = None;

        let credentials = match form.validate() {
            Ok(credentials) => credentials,
            Err(err) => {
                self.login_error = Some(err.message.to_string());
                self.notices.push(Notice::error(err.message));
                return;
            }
        };

        if self.policy.allows_bypass() && credentials.matches(DEV_EMAIL, DEV_PASSWORD) {
            tracing::warn!(email = %credentials.email, "Development login bypass used");
        } else if let Err(err) = self.webhooks.login(&credentials).await {
            let message = err.user_message();
            self.login_error = Some(message.clone());
            self.notices.push(Notice::error(message));
            return;
        }

        match self.store.save(&credentials.email).await {
            Ok(session) => {
                tracing::info!(email = %session.email, "User logged in successfully");
                self.session = Some(session);
                self.state = ViewState::idle();
            }
            Err(err) => {
                let err = ClientError::from(err);
                tracing::error!(error = %err, "Failed to persist session");
                self.login_error = Some(err.user_message());
                self.notices.push(Notice::error(err.user_message()));
            }
        }
    }

    pub async fn generate(&mut self, form: WorkoutForm) {
        if !matches!(self.state, ViewState::GeneratorIdle { .. }) {
            self.reject("generate");
            return;
        }

        let request = match form.validate() {
            Ok(request) => request,
            Err(err) => {
                self.notices.push(Notice::error(err.message));
                self.state = ViewState::GeneratorIdle { draft: form };
                return;
            }
        };

        self.state = ViewState::Generating {
            request: request.clone(),
        };
        tracing::info!(focus = %request.focus, equipment = %request.equipment, "Generating workout");

        match self.webhooks.generate_workout(&request).await {
            Ok(plan) => {
                self.state = ViewState::ResultShown { request, plan };
            }
            Err(err) => {
                self.state = ViewState::GeneratorIdle { draft: form };
                self.fail(err).await;
            }
        }
    }

    /// Drop the result and start over with an empty form.
    pub fn generate_new(&mut self) {
        if !matches!(self.state, ViewState::ResultShown { .. }) {
            self.reject("generate_new");
            return;
        }
        self.state = ViewState::idle();
    }

    pub async fn save_result(&mut self) {
        if !matches!(self.state, ViewState::ResultShown { .. }) {
            self.reject("save_result");
            return;
        }
        let Some(email) = self.session.as_ref().map(|s| s.email.clone()) else {
            self.reject("save_result");
            return;
        };
        let ViewState::ResultShown { request, plan } = &self.state else {
            return;
        };

        let result = self
            .webhooks
            .save_workout(&email, &request.focus, plan)
            .await;
        match result {
            Ok(()) => self.notices.push(Notice::success("Treino salvo com sucesso!")),
            Err(err) => self.fail(err).await,
        }
    }

    /// Enter the history list, fetching the saved workouts.
    pub async fn open_history(&mut self) {
        if !matches!(
            self.state,
            ViewState::GeneratorIdle { .. } | ViewState::ResultShown { .. }
        ) {
            self.reject("open_history");
            return;
        }
        let Some(session) = &self.session else {
            self.reject("open_history");
            return;
        };

        match self.webhooks.list_workouts(&session.email).await {
            Ok(workouts) => {
                self.state = ViewState::HistoryList { workouts };
            }
            Err(err) => {
                self.state = ViewState::HistoryList {
                    workouts: Vec::new(),
                };
                self.fail(err).await;
            }
        }
    }

    pub fn close_history(&mut self) {
        if !matches!(
            self.state,
            ViewState::HistoryList { .. } | ViewState::HistoryDetail { .. }
        ) {
            self.reject("close_history");
            return;
        }
        self.state = ViewState::idle();
    }

    pub fn select_saved(&mut self, workout_id: &str) {
        let ViewState::HistoryList { workouts } = &self.state else {
            self.reject("select_saved");
            return;
        };

        match workouts.iter().find(|w| w.id == workout_id).cloned() {
            Some(selected) => {
                self.state = ViewState::HistoryDetail {
                    workouts: workouts.clone(),
                    selected,
                };
            }
            None => self.notices.push(Notice::error(WORKOUT_NOT_FOUND)),
        }
    }

    pub fn back_to_history(&mut self) {
        match std::mem::replace(&mut self.state, ViewState::LoggedOut) {
            ViewState::HistoryDetail { workouts, .. } => {
                self.state = ViewState::HistoryList { workouts };
            }
            other => {
                self.state = other;
                self.reject("back_to_history");
            }
        }
    }

    pub async fn delete_saved(&mut self, workout_id: &str) {
        let ViewState::HistoryList { workouts } = &self.state else {
            self.reject("delete_saved");
            return;
        };
        if !workouts.iter().any(|w| w.id == workout_id) {
            self.notices.push(Notice::error(WORKOUT_NOT_FOUND));
            return;
        }
        let Some(session) = &self.session else {
            self.reject("delete_saved");
            return;
        };

        let result = self
            .webhooks
            .delete_workout(&session.email, workout_id)
            .await;
        match result {
            Ok(()) => {
                if let ViewState::HistoryList { workouts } = &mut self.state {
                    workouts.retain(|w| w.id != workout_id);
                }
                tracing::info!(workout_id = %workout_id, "Saved workout deleted");
                self.notices.push(Notice::success("Treino deletado com sucesso!"));
            }
            Err(err) => self.fail(err).await,
        }
    }

    /// Valid from every state.
    pub async fn logout(&mut self) {
        if let Err(err) = self.store.clear().await {
            tracing::error!(error = %err, "Failed to clear session during logout");
            self.notices.push(Notice::error(ClientError::from(err).user_message()));
        }
        if let Some(session) = self.session.take() {
            tracing::info!(email = %session.email, "User logged out");
        }
        self.state = ViewState::LoggedOut;
        self.login_error = None;
    }

    /// Report a failed action; a 403 ends the session.
    async fn fail(&mut self, err: ClientError) {
        self.notices.push(Notice::error(err.user_message()));
        if err.is_session_expired() && self.session.is_some() {
            tracing::warn!(error = %err, "Webhook reported an expired session, logging out");
            self.logout().await;
        }
    }

    fn reject(&mut self, event: &'static str) {
        tracing::debug!(event, state = self.state.name(), "Event ignored in current view");
        self.notices.push(Notice::error(INVALID_TRANSITION));
    }
}
