//! # Service Error Classification
//!
//! Normalizes raw collaborator errors into the crate's three failure kinds using
//! the service error code. Phases never act on a [`ServiceError`] directly; they
//! classify first and then decide between retrying, failing, or treating the error
//! as forward progress.

use crate::error::{HandlerErrorCode, StackSetError};
use crate::orchestration::types::ServiceError;

/// Codes meaning the target resource is already gone
const NOT_FOUND_CODES: &[&str] = &[
    "StackSetNotFoundException",
    "StackSetNotFound",
    "StackInstanceNotFoundException",
    "OperationNotFoundException",
    "ResourceNotFoundException",
    "NotFound",
];

/// Codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
    "TooManyRequestsException",
];

/// Codes for service-side hiccups worth retrying
const SERVICE_TRANSIENT_CODES: &[&str] = &[
    "InternalFailure",
    "InternalServiceError",
    "ServiceUnavailable",
    "RequestTimeout",
    "RequestTimeoutException",
    // Another operation holds the stack set lock
    "OperationInProgressException",
];

const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "UnauthorizedOperation",
    "InvalidClientTokenId",
    "ExpiredToken",
];

const INVALID_REQUEST_CODES: &[&str] = &[
    "ValidationError",
    "InvalidParameterValue",
    "InvalidOperationException",
    "StackSetNotEmptyException",
    "StaleRequestException",
];

/// Stack set operation reached a terminal non-success status
const NOT_STABILIZED_CODES: &[&str] = &["OperationFailed", "OperationStopped"];

/// Classify a collaborator error raised while acting on `resource` `resource_id`
pub fn classify_service_error(
    error: &ServiceError,
    resource: &'static str,
    resource_id: &str,
) -> StackSetError {
    let message = error.message.clone();

    match error.code.as_deref() {
        Some(c) if NOT_FOUND_CODES.contains(&c) => StackSetError::NotFound {
            resource,
            resource_id: resource_id.to_string(),
        },
        Some(c) if THROTTLING_CODES.contains(&c) => StackSetError::Transient {
            code: HandlerErrorCode::Throttling,
            message,
        },
        Some(c) if SERVICE_TRANSIENT_CODES.contains(&c) => StackSetError::Transient {
            code: HandlerErrorCode::ServiceInternalError,
            message,
        },
        Some(c) if ACCESS_DENIED_CODES.contains(&c) => StackSetError::Permanent {
            code: HandlerErrorCode::AccessDenied,
            message,
        },
        Some(c) if INVALID_REQUEST_CODES.contains(&c) => StackSetError::Permanent {
            code: HandlerErrorCode::InvalidRequest,
            message,
        },
        Some(c) if NOT_STABILIZED_CODES.contains(&c) => StackSetError::Permanent {
            code: HandlerErrorCode::NotStabilized,
            message,
        },
        _ => StackSetError::Permanent {
            code: HandlerErrorCode::GeneralServiceException,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn classify(code: &str) -> StackSetError {
        classify_service_error(&ServiceError::new(code, "msg"), "stack set", "ss-1")
    }

    #[test]
    fn not_found_codes() {
        for code in NOT_FOUND_CODES {
            let err = classify(code);
            assert!(err.is_not_found(), "Expected NotFound for code: {code}");
        }
        assert_eq!(
            classify("StackSetNotFoundException").to_string(),
            "Resource not found: stack set 'ss-1'"
        );
    }

    #[test]
    fn transient_codes() {
        for code in THROTTLING_CODES {
            let err = classify(code);
            assert!(err.is_retryable(), "Expected retryable for code: {code}");
            assert_eq!(err.error_code(), HandlerErrorCode::Throttling);
        }
        for code in SERVICE_TRANSIENT_CODES {
            assert_eq!(classify(code).kind(), ErrorKind::Transient);
        }
    }

    #[test]
    fn permanent_codes() {
        assert_eq!(
            classify("AccessDeniedException").error_code(),
            HandlerErrorCode::AccessDenied
        );
        assert_eq!(
            classify("ValidationError").error_code(),
            HandlerErrorCode::InvalidRequest
        );
        assert_eq!(
            classify("OperationStopped").error_code(),
            HandlerErrorCode::NotStabilized
        );
        for code in INVALID_REQUEST_CODES {
            assert!(!classify(code).is_retryable());
        }
    }

    #[test]
    fn unknown_and_missing_codes() {
        let err = classify("SomeNewError");
        assert_eq!(err.kind(), ErrorKind::Permanent);
        assert_eq!(err.error_code(), HandlerErrorCode::GeneralServiceException);

        let err = classify_service_error(
            &ServiceError::without_code("connection reset"),
            "stack set",
            "ss-1",
        );
        assert_eq!(err.kind(), ErrorKind::Permanent);
    }
}
