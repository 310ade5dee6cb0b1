//! AI Draft — email drafting through a remote model with a local fallback.

pub mod config;
pub mod draft;
pub mod error;
pub mod heartbeat;
pub mod llm;
pub mod session;

pub use error::{Error, Result};
