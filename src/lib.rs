// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod buffer;
pub mod complete;
pub mod config;
pub mod error;
pub mod event_log;
pub mod key_action;
pub mod runtime;
pub mod session;
pub mod timing;
