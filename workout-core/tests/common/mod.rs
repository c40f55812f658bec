//! Shared fixtures for workout-core integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use workout_core::models::{SavedWorkout, WorkoutPlan};
use workout_core::validation::{Credentials, WorkoutRequest};
use workout_core::{
    ClientError, LoginPolicy, MemoryStorage, SessionStore, ViewController, WorkoutWebhooks,
};

pub fn plan_document() -> Value {
    json!({
        "introducao": { "mensagem": "Vamos nessa!", "foco": "Perda de peso" },
        "aquecimento": [
            { "exercicio": "Polichinelo", "duracao": "5 minutos", "orientacao": "Ritmo leve" },
            { "exercicio": "Corrida estacionária", "duracao": "3 minutos", "orientacao": "Braços soltos" }
        ],
        "treino_principal": [
            { "exercicio": "Agachamento", "series": "4", "repeticoes": "15", "descanso": "45 segundos", "orientacao": "Peso nos calcanhares" },
            { "exercicio": "Flexão", "series": "3", "repeticoes": "10", "descanso": "60 segundos", "orientacao": "Core firme" }
        ],
        "desaquecimento": [
            { "exercicio": "Alongamento de posterior", "duracao": "30 segundos", "orientacao": "Sem forçar" }
        ]
    })
}

pub fn plan() -> WorkoutPlan {
    WorkoutPlan::try_from(plan_document()).expect("fixture plan is valid")
}

pub fn saved(id: &str, focus: &str) -> SavedWorkout {
    SavedWorkout {
        id: id.to_string(),
        date: "2026-10-15T09:30:00.000Z".to_string(),
        focus: focus.to_string(),
        plan: plan(),
    }
}

/// In-memory stand-in for the webhook backend that records every call.
#[derive(Default)]
pub struct FakeWebhooks {
    calls: Mutex<Vec<String>>,
    saved: Mutex<Vec<SavedWorkout>>,
    next_error: Mutex<Option<ClientError>>,
}

impl FakeWebhooks {
    pub fn with_saved(saved: Vec<SavedWorkout>) -> Self {
        Self {
            saved: Mutex::new(saved),
            ..Default::default()
        }
    }

    /// Make the next call fail with `err`.
    pub fn fail_next(&self, err: ClientError) {
        *self.next_error.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        match self.next_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WorkoutWebhooks for FakeWebhooks {
    async fn login(&self, credentials: &Credentials) -> Result<(), ClientError> {
        self.record(format!("login:{}", credentials.email))
    }

    async fn generate_workout(&self, request: &WorkoutRequest) -> Result<WorkoutPlan, ClientError> {
        self.record(format!("generate:{}:{}", request.focus, request.equipment))?;
        Ok(plan())
    }

    async fn save_workout(
        &self,
        email: &str,
        focus: &str,
        _plan: &WorkoutPlan,
    ) -> Result<(), ClientError> {
        self.record(format!("save:{}:{}", email, focus))
    }

    async fn list_workouts(&self, email: &str) -> Result<Vec<SavedWorkout>, ClientError> {
        self.record(format!("list:{}", email))?;
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn delete_workout(&self, email: &str, workout_id: &str) -> Result<(), ClientError> {
        self.record(format!("delete:{}:{}", email, workout_id))?;
        self.saved.lock().unwrap().retain(|w| w.id != workout_id);
        Ok(())
    }
}

pub struct Harness {
    pub webhooks: Arc<FakeWebhooks>,
    pub storage: Arc<MemoryStorage>,
}

impl Harness {
    pub fn new(webhooks: FakeWebhooks) -> Self {
        Self {
            webhooks: Arc::new(webhooks),
            storage: Arc::new(MemoryStorage::new()),
        }
    }

    pub fn store(&self) -> SessionStore {
        SessionStore::new(self.storage.clone())
    }

    /// Simulates a page load against the same storage.
    pub async fn start(&self, policy: LoginPolicy) -> ViewController {
        ViewController::start(self.webhooks.clone(), self.store(), policy)
            .await
            .expect("memory storage does not fail")
    }
}
