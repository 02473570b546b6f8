//! # Orchestration Types
//!
//! Wire-level request/response types and the collaborator traits the delete handler
//! is built on. Transport, credentials and the stack instance stabilization
//! algorithm live behind these traits so hosts can plug in a real service client
//! and tests can plug in deterministic fakes.

use crate::models::StackInstances;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire request for deleting a stack set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteStackSetRequest {
    /// Name or unique id of the stack set
    pub stack_set_name: String,
}

/// Requests the handler sends through the [`Invoker`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceRequest {
    /// Connectivity/permission check issued before any real work
    Noop,
    DeleteStackSet(DeleteStackSetRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceResponse {
    Empty,
    StackSetDeleted,
}

/// Raw error raised by a collaborator, before classification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", code.as_deref().unwrap_or("Unknown"))]
pub struct ServiceError {
    /// Service error code (e.g. `StackSetNotFoundException`)
    pub code: Option<String>,
    pub message: String,
}

impl ServiceError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn without_code(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

/// Stabilization status of one stack instance grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceDeletionStatus {
    /// All instances of the grouping are gone
    Done,
    /// Deletion is running; poll the operation again later
    InProgress { operation_id: String },
    /// Nothing to delete for this grouping
    NotFound,
}

/// Executes a single remote operation with credentials and region already bound
///
/// One call is one attempt; retry policy is layered on top by
/// [`CallProxy`](crate::orchestration::proxy::CallProxy).
#[async_trait::async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(
        &self,
        operation: &str,
        request: &ServiceRequest,
    ) -> Result<ServiceResponse, ServiceError>;
}

/// Deletes one stack instance grouping and reports its stabilization status
///
/// Called repeatedly, possibly across invocations, until it reports `Done` or
/// `NotFound`. `in_flight_operation` carries the operation id reported by the previous
/// `InProgress` so the implementation polls it instead of issuing a new delete.
#[async_trait::async_trait]
pub trait InstanceDeleter: Send + Sync {
    async fn delete_and_stabilize(
        &self,
        stack_set_id: &str,
        group: &StackInstances,
        in_flight_operation: Option<&str>,
    ) -> Result<InstanceDeletionStatus, ServiceError>;
}

/// Builds wire requests from model identifiers
pub trait RequestTranslator: Send + Sync {
    fn build_delete_request(&self, stack_set_id: &str) -> DeleteStackSetRequest;
}

/// Translator that addresses the stack set by its id
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRequestTranslator;

impl RequestTranslator for StandardRequestTranslator {
    fn build_delete_request(&self, stack_set_id: &str) -> DeleteStackSetRequest {
        DeleteStackSetRequest {
            stack_set_name: stack_set_id.to_string(),
        }
    }
}
