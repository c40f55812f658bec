use super::{CallObserver, WebhookAction, WebhookSettings, WorkoutWebhooks};
use crate::error::{ClientError, DELETE_FAILED, LOAD_FAILED, LOGIN_FAILED, SAVE_FAILED};
use crate::models::{SavedWorkout, WorkoutPlan, INVALID_PLAN_MESSAGE};
use crate::observability::outbound_headers;
use crate::prompt::workout_prompt;
use crate::validation::{Credentials, WorkoutRequest};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// reqwest implementation of [`WorkoutWebhooks`].
///
/// Each call races its request against the action's bound and the client's
/// root cancellation token; whichever finishes first drops the others.
/// Cancelling the root token through [`WebhookClient::shutdown`] aborts every
/// call still running.
pub struct WebhookClient {
    client: Client,
    settings: WebhookSettings,
    root: CancellationToken,
    observer: Option<Arc<dyn CallObserver>>,
}

struct Reply {
    status: StatusCode,
    body: String,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    tag: &'static str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    tag: &'static str,
    prompt: String,
    foco: &'a str,
    equipamento: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sexo: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tempo: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limitacoes: Option<&'a str>,
}

#[derive(Serialize)]
struct SaveBody<'a> {
    tag: &'static str,
    email: &'a str,
    workout: &'a WorkoutPlan,
    foco: &'a str,
    date: String,
}

#[derive(Serialize)]
struct ListBody<'a> {
    tag: &'static str,
    email: &'a str,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    tag: &'static str,
    email: &'a str,
    #[serde(rename = "workoutId")]
    workout_id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct StatusReply {
    status: Option<String>,
    message: Option<String>,
}

impl WebhookClient {
    pub fn new(settings: WebhookSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
            root: CancellationToken::new(),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn settings(&self) -> &WebhookSettings {
        &self.settings
    }

    /// Abort all in-flight calls and refuse new ones.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    async fn call<B, T, P>(&self, action: WebhookAction, body: &B, parse: P) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        P: FnOnce(Reply) -> Result<T, ClientError>,
    {
        let url = self.settings.endpoint(action);
        let started = Instant::now();

        let result = match self.post(action, &url, body).await {
            Ok(reply) if reply.status.is_success() => parse(reply),
            Ok(reply) => Err(ClientError::Http {
                action,
                status: reply.status.as_u16(),
            }),
            Err(err) => Err(err),
        };

        let elapsed = started.elapsed();
        let outcome = match &result {
            Ok(_) => {
                tracing::info!(
                    action = %action,
                    url = %url,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Webhook call succeeded"
                );
                "ok"
            }
            Err(err) => {
                tracing::warn!(
                    action = %action,
                    url = %url,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %err,
                    "Webhook call failed"
                );
                err.kind()
            }
        };
        if let Some(observer) = &self.observer {
            observer.record(action, outcome, elapsed);
        }

        result
    }

    async fn post<B>(&self, action: WebhookAction, url: &str, body: &B) -> Result<Reply, ClientError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let bound = self.settings.timeout(action);

        let request = async {
            let response = self
                .client
                .post(url)
                .headers(outbound_headers())
                .json(body)
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(Reply { status, body })
        };

        tokio::select! {
            _ = self.root.cancelled() => Err(ClientError::Cancelled { action }),
            _ = tokio::time::sleep(bound) => Err(ClientError::Timeout { action, after: bound }),
            reply = request => reply.map_err(|e| ClientError::Connectivity {
                action,
                reason: e.to_string(),
            }),
        }
    }
}

/// Parses a JSON body, unwrapping the single-item arrays that automation
/// tools emit when they answer with "all items".
fn parse_body(body: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(body).ok()? {
        Value::Array(mut items) if items.len() == 1 => items.pop(),
        value => Some(value),
    }
}

fn status_reply(body: &str) -> Option<StatusReply> {
    parse_body(body).and_then(|value| serde_json::from_value(value).ok())
}

/// Save and delete answer with an optional `{status, message}` body.
fn optional_status(action: WebhookAction, body: &str, fallback: &str) -> Result<(), ClientError> {
    let reply = status_reply(body).unwrap_or_default();
    if reply.status.as_deref() == Some("error") {
        return Err(ClientError::Application {
            action,
            message: reply.message.unwrap_or_else(|| fallback.to_string()),
        });
    }
    Ok(())
}

fn parse_saved_workouts(body: &str) -> Result<Vec<SavedWorkout>, ClientError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let invalid = || ClientError::Application {
        action: WebhookAction::GetWorkouts,
        message: LOAD_FAILED.to_string(),
    };
    let value = parse_body(body).ok_or_else(invalid)?;
    let records = match value.get("workouts") {
        Some(Value::Array(records)) => records.clone(),
        Some(Value::Null) | None if value.is_object() => Vec::new(),
        _ => return Err(invalid()),
    };

    Ok(records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<SavedWorkout>(record) {
            Ok(saved) => Some(saved),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed saved workout");
                None
            }
        })
        .collect())
}

#[async_trait]
impl WorkoutWebhooks for WebhookClient {
    async fn login(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let action = WebhookAction::Login;
        let body = LoginBody {
            tag: action.tag(),
            email: &credentials.email,
            password: credentials.password.expose_secret(),
        };

        self.call(action, &body, |reply| {
            let reply = status_reply(&reply.body).unwrap_or_default();
            if reply.status.as_deref() == Some("success") {
                Ok(())
            } else {
                Err(ClientError::Application {
                    action,
                    message: reply.message.unwrap_or_else(|| LOGIN_FAILED.to_string()),
                })
            }
        })
        .await
    }

    async fn generate_workout(&self, request: &WorkoutRequest) -> Result<WorkoutPlan, ClientError> {
        let action = WebhookAction::GenerateWorkout;
        let body = GenerateBody {
            tag: action.tag(),
            prompt: workout_prompt(request),
            foco: &request.focus,
            equipamento: &request.equipment,
            sexo: request.sex.as_ref().map(|sex| sex.as_str()),
            tempo: request.minutes_available.as_deref(),
            limitacoes: request.limitations.as_deref(),
        };

        self.call(action, &body, |reply| {
            let invalid = |reason: String| {
                tracing::warn!(reason = %reason, "Generation service returned an invalid plan");
                ClientError::Application {
                    action,
                    message: INVALID_PLAN_MESSAGE.to_string(),
                }
            };
            let document =
                parse_body(&reply.body).ok_or_else(|| invalid("body is not JSON".to_string()))?;
            WorkoutPlan::try_from(document).map_err(|e| invalid(e.to_string()))
        })
        .await
    }

    async fn save_workout(
        &self,
        email: &str,
        focus: &str,
        plan: &WorkoutPlan,
    ) -> Result<(), ClientError> {
        let action = WebhookAction::SaveWorkout;
        let body = SaveBody {
            tag: action.tag(),
            email,
            workout: plan,
            foco: focus,
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        self.call(action, &body, |reply| {
            optional_status(action, &reply.body, SAVE_FAILED)
        })
        .await
    }

    async fn list_workouts(&self, email: &str) -> Result<Vec<SavedWorkout>, ClientError> {
        let action = WebhookAction::GetWorkouts;
        let body = ListBody {
            tag: action.tag(),
            email,
        };

        self.call(action, &body, |reply| parse_saved_workouts(&reply.body))
            .await
    }

    async fn delete_workout(&self, email: &str, workout_id: &str) -> Result<(), ClientError> {
        let action = WebhookAction::DeleteWorkout;
        let body = DeleteBody {
            tag: action.tag(),
            email,
            workout_id,
        };

        self.call(action, &body, |reply| {
            optional_status(action, &reply.body, DELETE_FAILED)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::plan_document;
    use serde_json::json;

    #[test]
    fn test_parse_body_unwraps_single_item_arrays() {
        assert_eq!(parse_body(r#"[{"status":"success"}]"#), Some(json!({"status": "success"})));
        assert_eq!(parse_body("[1, 2]"), Some(json!([1, 2])));
        assert_eq!(parse_body("not json"), None);
    }

    #[test]
    fn test_optional_status_tolerates_empty_and_plain_bodies() {
        assert!(optional_status(WebhookAction::SaveWorkout, "", SAVE_FAILED).is_ok());
        assert!(optional_status(WebhookAction::SaveWorkout, "OK", SAVE_FAILED).is_ok());

        let err = optional_status(
            WebhookAction::DeleteWorkout,
            r#"{"status":"error"}"#,
            DELETE_FAILED,
        )
        .unwrap_err();
        assert_eq!(err.user_message(), DELETE_FAILED);
    }

    #[test]
    fn test_saved_workouts_skip_malformed_records() {
        let body = json!({
            "workouts": [
                { "id": "a", "date": "2026-10-01T10:00:00.000Z", "foco": "Força", "workout": plan_document() },
                { "id": "b", "date": "2026-10-02T10:00:00.000Z", "foco": "Força", "workout": {} }
            ]
        })
        .to_string();

        let records = parse_saved_workouts(&body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");
    }

    #[test]
    fn test_saved_workouts_default_to_empty() {
        assert!(parse_saved_workouts("{}").unwrap().is_empty());
        assert!(parse_saved_workouts("").unwrap().is_empty());
        assert!(parse_saved_workouts("<html>").is_err());
    }
}
