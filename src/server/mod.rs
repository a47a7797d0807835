//! Connection acceptance and worker admission.

pub mod context;
pub mod listener;

pub use context::{ServerContext, ShutdownTrigger, shutdown_channel};
pub use listener::Listener;
