//! Retrying call proxy over an [`Invoker`].

use super::error_classifier::classify_service_error;
use super::retry::retry_with_backoff;
use super::types::{Invoker, ServiceRequest, ServiceResponse};
use crate::config::RetryPolicy;
use crate::error::Result;
use std::sync::Arc;
use tracing::debug;

/// Executes service requests under a caller-specified retry policy
///
/// Every collaborator error is classified before it leaves the proxy, so callers
/// only ever see [`StackSetError`](crate::error::StackSetError).
#[derive(Clone)]
pub struct CallProxy {
    invoker: Arc<dyn Invoker>,
}

impl CallProxy {
    pub fn new(invoker: Arc<dyn Invoker>) -> Self {
        Self { invoker }
    }

    /// Send `request` for stack set `stack_set_id`, retrying transient failures
    pub async fn call(
        &self,
        request: &ServiceRequest,
        operation: &str,
        stack_set_id: &str,
        policy: &RetryPolicy,
    ) -> Result<ServiceResponse> {
        debug!(operation = %operation, stack_set_id = %stack_set_id, "Invoking service operation");

        let invoker = self.invoker.as_ref();
        retry_with_backoff(policy, operation, || async move {
            invoker
                .invoke(operation, request)
                .await
                .map_err(|e| classify_service_error(&e, "stack set", stack_set_id))
        })
        .await
    }
}

impl std::fmt::Debug for CallProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallProxy").finish_non_exhaustive()
    }
}
