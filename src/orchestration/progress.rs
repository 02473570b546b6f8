//! # Progress Events
//!
//! Tri-state result returned by every phase and by the handler itself.
//!
//! `InProgress` with a zero callback delay means "keep going in this invocation"
//! and lets the next phase run. A non-zero delay hands control back to the host,
//! which re-invokes the handler with the carried context once the delay elapses.

use crate::error::{ErrorKind, HandlerErrorCode, StackSetError};
use crate::models::CallbackContext;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressEvent {
    InProgress {
        callback_context: CallbackContext,
        callback_delay_seconds: u64,
    },
    Success {
        message: Option<String>,
    },
    Failed {
        kind: ErrorKind,
        error_code: HandlerErrorCode,
        message: String,
        callback_context: CallbackContext,
    },
}

impl ProgressEvent {
    /// Forward progress within the current invocation
    pub fn progress(callback_context: CallbackContext) -> Self {
        Self::InProgress {
            callback_context,
            callback_delay_seconds: 0,
        }
    }

    /// Yield to the host and resume after `delay`; always at least one second
    pub fn defer(callback_context: CallbackContext, delay: Duration) -> Self {
        Self::InProgress {
            callback_context,
            callback_delay_seconds: delay.as_secs().max(1),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: Some(message.into()),
        }
    }

    pub fn failed(error: &StackSetError, callback_context: CallbackContext) -> Self {
        Self::Failed {
            kind: error.kind(),
            error_code: error.error_code(),
            message: error.to_string(),
            callback_context,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Whether the next phase may run in this invocation
    pub fn can_continue(&self) -> bool {
        matches!(
            self,
            Self::InProgress {
                callback_delay_seconds: 0,
                ..
            }
        )
    }

    pub fn callback_delay(&self) -> Option<Duration> {
        match self {
            Self::InProgress {
                callback_delay_seconds,
                ..
            } => Some(Duration::from_secs(*callback_delay_seconds)),
            _ => None,
        }
    }

    pub fn callback_context(&self) -> Option<&CallbackContext> {
        match self {
            Self::InProgress {
                callback_context, ..
            }
            | Self::Failed {
                callback_context, ..
            } => Some(callback_context),
            Self::Success { .. } => None,
        }
    }

    pub fn into_callback_context(self) -> Option<CallbackContext> {
        match self {
            Self::InProgress {
                callback_context, ..
            }
            | Self::Failed {
                callback_context, ..
            } => Some(callback_context),
            Self::Success { .. } => None,
        }
    }

    pub fn error_code(&self) -> Option<HandlerErrorCode> {
        match self {
            Self::Failed { error_code, .. } => Some(*error_code),
            _ => None,
        }
    }
}
