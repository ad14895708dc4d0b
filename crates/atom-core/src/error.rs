//! Error types for atom-core

use crate::ActionId;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("No handler registered for action: {0}")]
    UnknownAction(ActionId),

    #[error("Handler for {action} failed: {message}")]
    Handler { action: ActionId, message: String },

    #[error("Listener failed: {0}")]
    Listener(String),
}

impl Error {
    /// Create a handler error for the given action
    pub fn handler(action: impl Into<ActionId>, message: impl Into<String>) -> Self {
        Error::Handler {
            action: action.into(),
            message: message.into(),
        }
    }

    /// Create a listener error
    pub fn listener(message: impl Into<String>) -> Self {
        Error::Listener(message.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
