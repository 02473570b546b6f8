use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The three failure kinds every collaborator error is normalized into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Resource already absent; recovered locally as forward progress
    NotFound,
    /// Throttling, timeouts, service hiccups; retried with backoff
    Transient,
    /// Invalid request, permission denial, failed operation; never retried
    Permanent,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Transient => write!(f, "transient"),
            Self::Permanent => write!(f, "permanent"),
        }
    }
}

/// Handler error codes reported to the hosting framework on FAILED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerErrorCode {
    NotFound,
    Throttling,
    InvalidRequest,
    AccessDenied,
    NotStabilized,
    ServiceInternalError,
    GeneralServiceException,
    InternalFailure,
}

impl fmt::Display for HandlerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "NotFound",
            Self::Throttling => "Throttling",
            Self::InvalidRequest => "InvalidRequest",
            Self::AccessDenied => "AccessDenied",
            Self::NotStabilized => "NotStabilized",
            Self::ServiceInternalError => "ServiceInternalError",
            Self::GeneralServiceException => "GeneralServiceException",
            Self::InternalFailure => "InternalFailure",
        };
        write!(f, "{s}")
    }
}

/// Crate-wide error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StackSetError {
    #[error("Resource not found: {resource} '{resource_id}'")]
    NotFound {
        resource: &'static str,
        resource_id: String,
    },

    #[error("Transient service error ({code}): {message}")]
    Transient {
        code: HandlerErrorCode,
        message: String,
    },

    #[error("Service error ({code}): {message}")]
    Permanent {
        code: HandlerErrorCode,
        message: String,
    },

    #[error("Operation {operation} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        code: HandlerErrorCode,
        last_error: String,
    },

    #[error("Stack instances for {target} did not stabilize after {polls} polls")]
    NotStabilized { target: String, polls: u32 },

    #[error("Invalid workflow state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StackSetError {
    /// Collapse this error into the three-kind taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Transient { .. } | Self::RetriesExhausted { .. } => ErrorKind::Transient,
            Self::Permanent { .. }
            | Self::NotStabilized { .. }
            | Self::InvalidState(_)
            | Self::Configuration(_)
            | Self::Serialization(_) => ErrorKind::Permanent,
        }
    }

    /// Handler error code reported alongside a FAILED progress event
    pub fn error_code(&self) -> HandlerErrorCode {
        match self {
            Self::NotFound { .. } => HandlerErrorCode::NotFound,
            Self::Transient { code, .. }
            | Self::Permanent { code, .. }
            | Self::RetriesExhausted { code, .. } => *code,
            Self::NotStabilized { .. } => HandlerErrorCode::NotStabilized,
            Self::InvalidState(_) | Self::Serialization(_) => HandlerErrorCode::InternalFailure,
            Self::Configuration(_) => HandlerErrorCode::InvalidRequest,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

impl From<serde_json::Error> for StackSetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for StackSetError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StackSetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let not_found = StackSetError::NotFound {
            resource: "stack set",
            resource_id: "ss-1".to_string(),
        };
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert!(not_found.is_not_found());

        let exhausted = StackSetError::RetriesExhausted {
            operation: "AWS-CloudFormation-StackSet::DeleteStackSet".to_string(),
            attempts: 3,
            code: HandlerErrorCode::Throttling,
            last_error: "Rate exceeded".to_string(),
        };
        assert_eq!(exhausted.kind(), ErrorKind::Transient);
        assert_eq!(exhausted.error_code(), HandlerErrorCode::Throttling);
        assert!(!exhausted.is_retryable());

        let unstable = StackSetError::NotStabilized {
            target: "accounts=[1]".to_string(),
            polls: 4,
        };
        assert_eq!(unstable.kind(), ErrorKind::Permanent);
        assert_eq!(unstable.error_code(), HandlerErrorCode::NotStabilized);
    }

    #[test]
    fn test_error_messages() {
        let err = StackSetError::Permanent {
            code: HandlerErrorCode::AccessDenied,
            message: "not authorized".to_string(),
        };
        assert_eq!(err.to_string(), "Service error (AccessDenied): not authorized");
        assert_eq!(ErrorKind::Transient.to_string(), "transient");
    }
}
