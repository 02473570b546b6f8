//! # Stack Set Deletion Phase
//!
//! Issues the single delete call for the stack set once every stack instance
//! grouping is confirmed gone. A stack set that no longer exists counts as deleted.

use super::phase::DeletePhase;
use super::progress::ProgressEvent;
use super::proxy::CallProxy;
use super::types::{RequestTranslator, ServiceRequest};
use crate::config::HandlerConfig;
use crate::constants::{operations, TYPE_NAME};
use crate::error::StackSetError;
use crate::logging::log_error;
use crate::models::{CallbackContext, ResourceModel};
use crate::state_machine::{self, DeleteEvent};
use std::sync::Arc;
use tracing::info;

pub struct StackSetDeletionPhase {
    proxy: CallProxy,
    translator: Arc<dyn RequestTranslator>,
    config: HandlerConfig,
}

impl StackSetDeletionPhase {
    pub fn new(
        proxy: CallProxy,
        translator: Arc<dyn RequestTranslator>,
        config: HandlerConfig,
    ) -> Self {
        Self {
            proxy,
            translator,
            config,
        }
    }

    pub async fn delete_stack_set(
        &self,
        model: &ResourceModel,
        mut context: CallbackContext,
    ) -> ProgressEvent {
        if context.has_pending_instances() {
            let err = StackSetError::InvalidState(format!(
                "refusing to delete stack set {} with {} stack instance groupings pending",
                model.stack_set_id,
                context.remaining()
            ));
            log_error(self.name(), operations::DELETE_STACK_SET, &err.to_string(), None);
            return ProgressEvent::failed(&err, context);
        }

        if let Err(e) = state_machine::transition(&mut context, DeleteEvent::InstancesDrained) {
            let err = StackSetError::InvalidState(e.to_string());
            return ProgressEvent::failed(&err, context);
        }

        let request = ServiceRequest::DeleteStackSet(
            self.translator.build_delete_request(&model.stack_set_id),
        );
        context.parent_delete_attempted = true;

        let result = self
            .proxy
            .call(
                &request,
                operations::DELETE_STACK_SET,
                &model.stack_set_id,
                &self.config.retry,
            )
            .await;

        match result {
            Ok(_) => {
                info!(stack_set_id = %model.stack_set_id, "{TYPE_NAME} successfully deleted.");
            }
            Err(e) if e.is_not_found() => {
                info!(
                    stack_set_id = %model.stack_set_id,
                    "{TYPE_NAME} already deleted, nothing to do."
                );
            }
            Err(e) => {
                log_error(
                    self.name(),
                    operations::DELETE_STACK_SET,
                    &e.to_string(),
                    Some(&model.stack_set_id),
                );
                state_machine::mark_failed(&mut context, e.to_string());
                return ProgressEvent::failed(&e, context);
            }
        }

        if let Err(e) = state_machine::transition(&mut context, DeleteEvent::ParentDeleted) {
            let err = StackSetError::InvalidState(e.to_string());
            return ProgressEvent::failed(&err, context);
        }
        ProgressEvent::success(format!("{TYPE_NAME} {} deleted", model.stack_set_id))
    }
}

#[async_trait::async_trait]
impl DeletePhase for StackSetDeletionPhase {
    fn name(&self) -> &'static str {
        "stack_set_deletion"
    }

    async fn execute(&self, model: &ResourceModel, progress: ProgressEvent) -> ProgressEvent {
        match progress {
            ProgressEvent::InProgress {
                callback_context, ..
            } => self.delete_stack_set(model, callback_context).await,
            terminal => terminal,
        }
    }
}
