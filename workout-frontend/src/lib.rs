pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod startup;
pub mod utils;
pub mod views;

use services::client_locks::ClientLocks;
use std::sync::Arc;
use workout_core::{LoginPolicy, WorkoutWebhooks};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub webhooks: Arc<dyn WorkoutWebhooks>,
    pub policy: LoginPolicy,
    pub locks: ClientLocks,
}

impl AppState {
    pub fn new(webhooks: Arc<dyn WorkoutWebhooks>, policy: LoginPolicy) -> Self {
        Self {
            webhooks,
            policy,
            locks: ClientLocks::new(),
        }
    }
}
