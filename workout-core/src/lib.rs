//! workout-core: domain layer of the workout generator frontend.
//!
//! Holds everything that does not depend on the web server: form validation,
//! the webhook client for the external automation backend, the session store
//! abstraction and the view controller state machine.
pub mod controller;
pub mod error;
pub mod models;
pub mod observability;
pub mod prompt;
pub mod session;
pub mod validation;
pub mod webhooks;

pub use controller::{LoginPolicy, Notice, NoticeLevel, ViewController, ViewState};
pub use error::{ClientError, StorageError};
pub use session::{MemoryStorage, Session, SessionStorage, SessionStore};
pub use webhooks::{WebhookAction, WebhookClient, WebhookSettings, WorkoutWebhooks};
