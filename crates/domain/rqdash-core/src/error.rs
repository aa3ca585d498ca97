use thiserror::Error;

use crate::target::{ActionKind, TargetKind};

/// A command that cannot be routed. This means the triggering gesture was
/// built wrong; it never reaches the broker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("unknown target kind: {0}")]
    UnknownTarget(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("no route for {target} {action}")]
    NoRoute {
        target: TargetKind,
        action: ActionKind,
    },
    #[error("{target} {action} requires a target id")]
    MissingTargetId {
        target: TargetKind,
        action: ActionKind,
    },
}

/// Any non-success answer from the monitor server, or a failure to get one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("{message} ({status} {reason})")]
    Http {
        status: u16,
        reason: String,
        message: String,
        traceback: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn message(&self) -> String {
        match self {
            RemoteError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Status badge text, e.g. `500 Internal Server Error`.
    pub fn status_label(&self) -> Option<String> {
        match self {
            RemoteError::Http { status, reason, .. } => {
                Some(format!("{status} {reason}").trim_end().to_string())
            }
            _ => None,
        }
    }

    pub fn traceback(&self) -> Option<&str> {
        match self {
            RemoteError::Http { traceback, .. } => traceback.as_deref().filter(|t| !t.is_empty()),
            _ => None,
        }
    }
}
