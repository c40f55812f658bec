//! Local checks on the login and workout forms.
//!
//! Both forms are checked field by field in a fixed order and stop at the
//! first failure, so the user always sees one message at a time.

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validator::{ValidateEmail, ValidateLength};

pub const EMAIL_MAX_CHARS: u64 = 255;
pub const PASSWORD_MIN_CHARS: u64 = 6;
pub const PASSWORD_MAX_CHARS: u64 = 100;
pub const FIELD_MIN_CHARS: u64 = 3;
pub const FIELD_MAX_CHARS: u64 = 100;
pub const LIMITATIONS_MAX_CHARS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

fn shorter_than(value: &String, min: u64) -> bool {
    !value.validate_length(Some(min), None, None)
}

fn longer_than(value: &String, max: u64) -> bool {
    !value.validate_length(None, Some(max), None)
}

/// Raw login form as submitted by the browser.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default = "empty_secret")]
    pub password: Secret<String>,
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Secret::new(password.into()),
        }
    }

    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(ValidationError::new("email", "E-mail é obrigatório"));
        }
        if !email.validate_email() {
            return Err(ValidationError::new("email", "E-mail inválido"));
        }
        if longer_than(&email, EMAIL_MAX_CHARS) {
            return Err(ValidationError::new("email", "E-mail muito longo"));
        }

        let password = self.password.expose_secret();
        if shorter_than(password, PASSWORD_MIN_CHARS) {
            return Err(ValidationError::new(
                "password",
                "A senha deve ter no mínimo 6 caracteres",
            ));
        }
        if longer_than(password, PASSWORD_MAX_CHARS) {
            return Err(ValidationError::new("password", "Senha muito longa"));
        }

        Ok(Credentials {
            email,
            password: Secret::new(password.clone()),
        })
    }
}

/// Login data that passed validation.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: Secret<String>,
}

impl Credentials {
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password.expose_secret() == password
    }
}

/// Value of the optional sex field. Unknown values are passed through as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sex {
    Male,
    Female,
    Undisclosed,
    Other(String),
}

impl Sex {
    pub const CHOICES: [Sex; 3] = [Sex::Male, Sex::Female, Sex::Undisclosed];

    pub fn as_str(&self) -> &str {
        match self {
            Sex::Male => "masculino",
            Sex::Female => "feminino",
            Sex::Undisclosed => "prefiro-nao-informar",
            Sex::Other(value) => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Sex::Male => "Masculino",
            Sex::Female => "Feminino",
            Sex::Undisclosed => "Prefiro não informar",
            Sex::Other(value) => value,
        }
    }
}

impl From<String> for Sex {
    fn from(value: String) -> Self {
        match value.as_str() {
            "masculino" => Sex::Male,
            "feminino" => Sex::Female,
            "prefiro-nao-informar" => Sex::Undisclosed,
            _ => Sex::Other(value),
        }
    }
}

impl From<Sex> for String {
    fn from(value: Sex) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw generator form. Also kept as the draft shown back after a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutForm {
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub minutes: String,
    #[serde(default)]
    pub limitations: String,
}

impl WorkoutForm {
    pub fn validate(&self) -> Result<WorkoutRequest, ValidationError> {
        let focus = self.focus.trim().to_string();
        if shorter_than(&focus, FIELD_MIN_CHARS) {
            return Err(ValidationError::new(
                "focus",
                "Foco deve ter no mínimo 3 caracteres",
            ));
        }
        if longer_than(&focus, FIELD_MAX_CHARS) {
            return Err(ValidationError::new("focus", "Foco muito longo"));
        }

        let equipment = self.equipment.trim().to_string();
        if shorter_than(&equipment, FIELD_MIN_CHARS) {
            return Err(ValidationError::new(
                "equipment",
                "Equipamento deve ter no mínimo 3 caracteres",
            ));
        }
        if longer_than(&equipment, FIELD_MAX_CHARS) {
            return Err(ValidationError::new("equipment", "Equipamento muito longo"));
        }

        // the bound applies to the text as typed, surrounding spaces included
        if longer_than(&self.limitations, LIMITATIONS_MAX_CHARS) {
            return Err(ValidationError::new(
                "limitations",
                "Limitações muito longas",
            ));
        }
        let limitations = non_empty(&self.limitations);

        Ok(WorkoutRequest {
            focus,
            equipment,
            sex: non_empty(&self.sex).map(Sex::from),
            minutes_available: non_empty(&self.minutes),
            limitations,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Generator input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRequest {
    pub focus: String,
    pub equipment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_available: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limitations: Option<String>,
}

impl WorkoutRequest {
    pub fn new(focus: impl Into<String>, equipment: impl Into<String>) -> Self {
        Self {
            focus: focus.into(),
            equipment: equipment.into(),
            sex: None,
            minutes_available: None,
            limitations: None,
        }
    }
}

impl From<&WorkoutRequest> for WorkoutForm {
    fn from(request: &WorkoutRequest) -> Self {
        Self {
            focus: request.focus.clone(),
            equipment: request.equipment.clone(),
            sex: request
                .sex
                .as_ref()
                .map(|sex| sex.as_str().to_string())
                .unwrap_or_default(),
            minutes: request.minutes_available.clone().unwrap_or_default(),
            limitations: request.limitations.clone().unwrap_or_default(),
        }
    }
}
