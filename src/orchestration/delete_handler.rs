//! # Delete Handler
//!
//! Entry point for deleting a stack set and all of its stack instances.
//!
//! ## Overview
//!
//! Each call to [`DeleteHandler::handle_request`] is one invocation by the hosting
//! framework, possibly in a fresh process. Everything the workflow needs to resume
//! lives in the [`CallbackContext`] the host hands back; the handler holds no state
//! of its own between calls.
//!
//! ## Pipeline
//!
//! ```text
//! seed context ─▶ preflight (no-op call) ─▶ instance deletion ─▶ stack set deletion
//!                                              │   ▲
//!                                              ▼   │ host re-invokes after delay
//!                                          IN_PROGRESS
//! ```
//!
//! A phase runs only when the previous one allows continuation within the current
//! invocation, so the stack set delete is unreachable while groupings are pending.

use super::instance_deletion::InstanceDeletionPhase;
use super::phase::{run_phases, DeletePhase};
use super::progress::ProgressEvent;
use super::proxy::CallProxy;
use super::stack_set_deletion::StackSetDeletionPhase;
use super::types::{
    InstanceDeleter, Invoker, RequestTranslator, ServiceRequest, StandardRequestTranslator,
};
use crate::config::HandlerConfig;
use crate::constants::operations;
use crate::error::StackSetError;
use crate::logging::log_phase_operation;
use crate::models::{CallbackContext, ResourceModel};
use crate::state_machine::{self, DeleteState};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

pub struct DeleteHandler {
    proxy: CallProxy,
    config: HandlerConfig,
    instance_phase: InstanceDeletionPhase,
    stack_set_phase: StackSetDeletionPhase,
}

impl DeleteHandler {
    /// Create a handler using the standard request translator
    pub fn new(
        invoker: Arc<dyn Invoker>,
        deleter: Arc<dyn InstanceDeleter>,
        config: HandlerConfig,
    ) -> Self {
        Self::with_components(invoker, deleter, Arc::new(StandardRequestTranslator), config)
    }

    /// Create a handler with a custom request translator
    pub fn with_components(
        invoker: Arc<dyn Invoker>,
        deleter: Arc<dyn InstanceDeleter>,
        translator: Arc<dyn RequestTranslator>,
        config: HandlerConfig,
    ) -> Self {
        let proxy = CallProxy::new(invoker);
        Self {
            instance_phase: InstanceDeletionPhase::new(deleter, config.clone()),
            stack_set_phase: StackSetDeletionPhase::new(proxy.clone(), translator, config.clone()),
            proxy,
            config,
        }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Run one invocation of the delete workflow
    pub async fn handle_request(
        &self,
        model: &ResourceModel,
        callback_context: CallbackContext,
    ) -> ProgressEvent {
        let span = info_span!(
            "delete_stack_set",
            stack_set_id = %model.stack_set_id,
            invocation_id = %Uuid::new_v4(),
        );
        self.handle_request_inner(model, callback_context)
            .instrument(span)
            .await
    }

    async fn handle_request_inner(
        &self,
        model: &ResourceModel,
        mut context: CallbackContext,
    ) -> ProgressEvent {
        match context.state {
            DeleteState::Done => {
                info!("Stack set already deleted by a previous invocation");
                return ProgressEvent::success(format!("{} already deleted", model.stack_set_id));
            }
            DeleteState::Failed => {
                let err = StackSetError::InvalidState(
                    "callback context belongs to a failed delete workflow".to_string(),
                );
                return ProgressEvent::failed(&err, context);
            }
            _ => {}
        }

        if context.seed_from(model) {
            info!(
                groupings = context.remaining(),
                instances = model.instance_count(),
                "Seeded stack instance delete list"
            );
        }

        let preflight = self
            .proxy
            .call(
                &ServiceRequest::Noop,
                operations::DELETE,
                &model.stack_set_id,
                &self.config.retry,
            )
            .await;

        match preflight {
            Ok(_) => {}
            // Already gone; the phases below settle to SUCCESS on their own NotFound
            Err(e) if e.is_not_found() => {
                info!(error = %e, "Stack set not found during preflight, continuing");
            }
            Err(e) => {
                warn!(error = %e, "Preflight call failed, stack set left untouched");
                state_machine::mark_failed(&mut context, e.to_string());
                return ProgressEvent::failed(&e, context);
            }
        }

        log_phase_operation(
            "delete_handler",
            &model.stack_set_id,
            "started",
            Some(context.remaining()),
            None,
        );

        let phases: [&dyn DeletePhase; 2] = [&self.instance_phase, &self.stack_set_phase];
        run_phases(&phases, model, ProgressEvent::progress(context)).await
    }
}
