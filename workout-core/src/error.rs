use crate::validation::ValidationError;
use crate::webhooks::WebhookAction;
use std::time::Duration;
use thiserror::Error;

pub const NETWORK_ERROR: &str = "Erro de conexão. Verifique sua internet e tente novamente";
pub const TIMEOUT_ERROR: &str = "Requisição demorou muito. Tente novamente";
pub const CANCELLED_ERROR: &str = "Requisição cancelada. Tente novamente";
pub const INVALID_CREDENTIALS: &str = "E-mail ou senha incorretos";
pub const SESSION_EXPIRED: &str = "Sessão expirada. Faça login novamente";
pub const ENDPOINT_NOT_FOUND: &str =
    "Recurso não encontrado. Verifique a configuração dos webhooks";
pub const SERVER_ERROR: &str = "Erro no servidor. Tente novamente mais tarde";
pub const UNKNOWN_ERROR: &str = "Erro desconhecido. Tente novamente";
pub const STORAGE_ERROR: &str = "Não foi possível acessar sua sessão. Tente novamente";
pub const LOGIN_FAILED: &str = "Erro ao fazer login. Tente novamente.";
pub const SAVE_FAILED: &str = "Erro ao salvar treino. Tente novamente";
pub const LOAD_FAILED: &str = "Erro ao carregar treinos. Tente novamente";
pub const DELETE_FAILED: &str = "Erro ao deletar treino. Tente novamente";

/// Failure of the session storage adapter.
#[derive(Debug, Clone, Error)]
#[error("session storage error: {0}")]
pub struct StorageError(pub String);

/// Every failure an action of the view controller can run into.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{action} webhook unreachable: {reason}")]
    Connectivity {
        action: WebhookAction,
        reason: String,
    },

    #[error("{action} webhook timed out after {}ms", after.as_millis())]
    Timeout {
        action: WebhookAction,
        after: Duration,
    },

    #[error("{action} webhook call cancelled")]
    Cancelled { action: WebhookAction },

    #[error("{action} webhook returned HTTP {status}")]
    Http { action: WebhookAction, status: u16 },

    #[error("{action} webhook rejected the request: {message}")]
    Application {
        action: WebhookAction,
        message: String,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Text shown to the user in the notification area.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(err) => err.message.to_string(),
            ClientError::Connectivity { .. } => NETWORK_ERROR.to_string(),
            ClientError::Timeout { .. } => TIMEOUT_ERROR.to_string(),
            ClientError::Cancelled { .. } => CANCELLED_ERROR.to_string(),
            ClientError::Http { status, .. } => status_message(*status).to_string(),
            ClientError::Application { message, .. } => message.clone(),
            ClientError::Storage(_) => STORAGE_ERROR.to_string(),
        }
    }

    /// A 403 from any webhook means the backend no longer accepts the session.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::Http { status: 403, .. })
    }

    /// Short label used for logs and the webhook call counter.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "validation_error",
            ClientError::Connectivity { .. } => "connectivity_error",
            ClientError::Timeout { .. } => "timeout",
            ClientError::Cancelled { .. } => "cancelled",
            ClientError::Http { .. } => "http_error",
            ClientError::Application { .. } => "application_error",
            ClientError::Storage(_) => "storage_error",
        }
    }
}

/// Maps a non-2xx status code to the message shown to the user.
pub fn status_message(status: u16) -> &'static str {
    match status {
        401 => INVALID_CREDENTIALS,
        403 => SESSION_EXPIRED,
        404 => ENDPOINT_NOT_FOUND,
        408 => TIMEOUT_ERROR,
        500..=599 => SERVER_ERROR,
        _ => UNKNOWN_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        assert_eq!(status_message(401), INVALID_CREDENTIALS);
        assert_eq!(status_message(403), SESSION_EXPIRED);
        assert_eq!(status_message(404), ENDPOINT_NOT_FOUND);
        assert_eq!(status_message(408), TIMEOUT_ERROR);
        assert_eq!(status_message(500), SERVER_ERROR);
        assert_eq!(status_message(504), SERVER_ERROR);
        assert_eq!(status_message(418), UNKNOWN_ERROR);
    }

    #[test]
    fn test_only_forbidden_expires_session() {
        let forbidden = ClientError::Http {
            action: WebhookAction::GetWorkouts,
            status: 403,
        };
        let unauthorized = ClientError::Http {
            action: WebhookAction::Login,
            status: 401,
        };

        assert!(forbidden.is_session_expired());
        assert!(!unauthorized.is_session_expired());
        assert_eq!(unauthorized.user_message(), INVALID_CREDENTIALS);
    }
}
