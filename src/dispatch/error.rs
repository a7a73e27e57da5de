//! Dispatch error types.

use std::any::Any;
use std::error::Error as StdError;

use thiserror::Error;

/// Failure raised by an action.
///
/// Caught at the dispatch boundary and turned into a terminated response;
/// it never propagates to the host framework.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Free-form failure.
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Any other error type.
    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),

    /// The action panicked while running.
    #[error("action panicked: {0}")]
    Panicked(String),
}

impl ActionError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Wrap an arbitrary error.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Other(Box::new(error))
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panicked(message)
    }

    /// The error and its source chain, one cause per line.
    pub fn diagnostic(&self) -> String {
        let mut text = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            text.push_str("\ncaused by: ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        text
    }
}

/// Errors raised while wiring the dispatcher into a host route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("controller '{0}' is not registered")]
    UnknownController(String),

    #[error("controller '{controller}' has no action '{action}'")]
    UnknownAction { controller: String, action: String },
}
