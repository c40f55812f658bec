//! External webhooks of the automation backend.
//!
//! Every call is a JSON `POST` whose body carries a `tag` naming the action,
//! which the backend uses for routing.

pub mod client;

pub use client::WebhookClient;

use crate::error::ClientError;
use crate::models::{SavedWorkout, WorkoutPlan};
use crate::validation::{Credentials, WorkoutRequest};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebhookAction {
    Login,
    GenerateWorkout,
    SaveWorkout,
    GetWorkouts,
    DeleteWorkout,
}

impl WebhookAction {
    pub const ALL: [WebhookAction; 5] = [
        WebhookAction::Login,
        WebhookAction::GenerateWorkout,
        WebhookAction::SaveWorkout,
        WebhookAction::GetWorkouts,
        WebhookAction::DeleteWorkout,
    ];

    /// Value of the `tag` field in the request body.
    pub fn tag(self) -> &'static str {
        match self {
            WebhookAction::Login => "LOGIN",
            WebhookAction::GenerateWorkout => "GENERATE_WORKOUT",
            WebhookAction::SaveWorkout => "SAVE_WORKOUT",
            WebhookAction::GetWorkouts => "GET_WORKOUTS",
            WebhookAction::DeleteWorkout => "DELETE_WORKOUT",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WebhookAction::Login => "login",
            WebhookAction::GenerateWorkout => "generate_workout",
            WebhookAction::SaveWorkout => "save_workout",
            WebhookAction::GetWorkouts => "get_workouts",
            WebhookAction::DeleteWorkout => "delete_workout",
        }
    }
}

impl fmt::Display for WebhookAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSettings {
    /// Prefix for endpoints configured as relative paths.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_login")]
    pub login: String,
    #[serde(default = "default_generate_workout")]
    pub generate_workout: String,
    #[serde(default = "default_save_workout")]
    pub save_workout: String,
    #[serde(default = "default_get_workouts")]
    pub get_workouts: String,
    #[serde(default = "default_delete_workout")]
    pub delete_workout: String,
    #[serde(default = "default_login_timeout_ms")]
    pub login_timeout_ms: u64,
    #[serde(default = "default_generate_timeout_ms")]
    pub generate_timeout_ms: u64,
    /// Bound for save, list and delete.
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5678".to_string()
}

fn default_login() -> String {
    "/webhook-login".to_string()
}

fn default_generate_workout() -> String {
    "/webhook-treino".to_string()
}

fn default_save_workout() -> String {
    "/webhook-save-workout".to_string()
}

fn default_get_workouts() -> String {
    "/webhook-get-workouts".to_string()
}

fn default_delete_workout() -> String {
    "/webhook-delete-workout".to_string()
}

fn default_login_timeout_ms() -> u64 {
    15_000
}

fn default_generate_timeout_ms() -> u64 {
    60_000
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self::with_base_url(default_base_url())
    }
}

impl WebhookSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            login: default_login(),
            generate_workout: default_generate_workout(),
            save_workout: default_save_workout(),
            get_workouts: default_get_workouts(),
            delete_workout: default_delete_workout(),
            login_timeout_ms: default_login_timeout_ms(),
            generate_timeout_ms: default_generate_timeout_ms(),
            default_timeout_ms: default_timeout_ms(),
        }
    }

    /// Absolute URL of the webhook for `action`.
    pub fn endpoint(&self, action: WebhookAction) -> String {
        let configured = match action {
            WebhookAction::Login => &self.login,
            WebhookAction::GenerateWorkout => &self.generate_workout,
            WebhookAction::SaveWorkout => &self.save_workout,
            WebhookAction::GetWorkouts => &self.get_workouts,
            WebhookAction::DeleteWorkout => &self.delete_workout,
        };

        if configured.starts_with("http://") || configured.starts_with("https://") {
            return configured.clone();
        }

        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            configured.trim_start_matches('/')
        )
    }

    pub fn timeout(&self, action: WebhookAction) -> Duration {
        let millis = match action {
            WebhookAction::Login => self.login_timeout_ms,
            WebhookAction::GenerateWorkout => self.generate_timeout_ms,
            _ => self.default_timeout_ms,
        };
        Duration::from_millis(millis)
    }
}

/// The remote actions the view controller depends on.
#[async_trait]
pub trait WorkoutWebhooks: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<(), ClientError>;

    async fn generate_workout(&self, request: &WorkoutRequest) -> Result<WorkoutPlan, ClientError>;

    async fn save_workout(
        &self,
        email: &str,
        focus: &str,
        plan: &WorkoutPlan,
    ) -> Result<(), ClientError>;

    async fn list_workouts(&self, email: &str) -> Result<Vec<SavedWorkout>, ClientError>;

    async fn delete_workout(&self, email: &str, workout_id: &str) -> Result<(), ClientError>;
}

/// Receives one event per finished webhook call; `outcome` is `ok` or an
/// error kind.
pub trait CallObserver: Send + Sync {
    fn record(&self, action: WebhookAction, outcome: &'static str, elapsed: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints_join_base_url() {
        let settings = WebhookSettings::with_base_url("http://n8n.local:5678/");

        assert_eq!(
            settings.endpoint(WebhookAction::Login),
            "http://n8n.local:5678/webhook-login"
        );
        assert_eq!(
            settings.endpoint(WebhookAction::GenerateWorkout),
            "http://n8n.local:5678/webhook-treino"
        );
    }

    #[test]
    fn test_absolute_endpoint_overrides_base_url() {
        let mut settings = WebhookSettings::default();
        settings.delete_workout = "https://hooks.example.com/delete".to_string();

        assert_eq!(
            settings.endpoint(WebhookAction::DeleteWorkout),
            "https://hooks.example.com/delete"
        );
    }

    #[test]
    fn test_default_bounds() {
        let settings = WebhookSettings::default();

        assert_eq!(settings.timeout(WebhookAction::Login), Duration::from_secs(15));
        assert_eq!(
            settings.timeout(WebhookAction::GenerateWorkout),
            Duration::from_secs(60)
        );
        assert_eq!(
            settings.timeout(WebhookAction::GetWorkouts),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_tags() {
        let tags: Vec<&str> = WebhookAction::ALL.iter().map(|a| a.tag()).collect();
        assert_eq!(
            tags,
            vec!["LOGIN", "GENERATE_WORKOUT", "SAVE_WORKOUT", "GET_WORKOUTS", "DELETE_WORKOUT"]
        );
    }
}
