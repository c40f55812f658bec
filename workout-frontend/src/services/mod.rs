pub mod client_locks;
pub mod metrics;
pub mod session_storage;
