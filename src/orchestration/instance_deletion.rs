//! # Stack Instance Deletion Phase
//!
//! Drains the pending stack instance groupings held in the callback context.
//!
//! Groupings are processed sequentially in list order. A grouping leaves the list
//! exactly once, when the deleter confirms it is gone (`Done`) or reports there is
//! nothing to delete (`NotFound`, or a not-found error). When a grouping is still
//! deleting, the phase yields to the host with the remaining list and the in-flight
//! operation marker, so the next invocation resumes polling that exact operation and
//! never re-issues deletes for groupings already removed.

use super::phase::DeletePhase;
use super::progress::ProgressEvent;
use super::retry::retry_with_backoff;
use super::types::{InstanceDeleter, InstanceDeletionStatus};
use crate::config::HandlerConfig;
use crate::constants::operations;
use crate::error::StackSetError;
use crate::logging::log_phase_operation;
use crate::models::{CallbackContext, ResourceModel};
use crate::orchestration::error_classifier::classify_service_error;
use crate::state_machine::{self, DeleteEvent};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct InstanceDeletionPhase {
    deleter: Arc<dyn InstanceDeleter>,
    config: HandlerConfig,
}

impl InstanceDeletionPhase {
    pub fn new(deleter: Arc<dyn InstanceDeleter>, config: HandlerConfig) -> Self {
        Self { deleter, config }
    }

    /// Delete or poll pending groupings until the list is empty or a grouping is still running
    pub async fn delete_stack_instances(
        &self,
        model: &ResourceModel,
        mut context: CallbackContext,
    ) -> ProgressEvent {
        if !context.state.allows_instance_deletion() {
            debug!(state = %context.state, "Instance deletion already complete");
            return ProgressEvent::progress(context);
        }

        let stack_set_id = model.stack_set_id.as_str();
        let started = Instant::now();
        let mut settled_this_invocation = 0usize;

        while let Some(group) = context.delete_stacks_list.first().cloned() {
            if settled_this_invocation > 0 && started.elapsed() >= self.config.invocation_budget() {
                info!(
                    stack_set_id = %stack_set_id,
                    remaining = context.remaining(),
                    "Invocation budget spent, yielding to host"
                );
                return self.yield_to_host(stack_set_id, context);
            }

            let target_key = group.target_key();
            let in_flight = context.in_flight_for(&group).map(str::to_owned);
            let deleter = self.deleter.as_ref();
            let group_ref = &group;
            let in_flight_ref = in_flight.as_deref();
            let key_ref = target_key.as_str();

            let outcome = retry_with_backoff(
                &self.config.retry,
                operations::DELETE_STACK_INSTANCES,
                || async move {
                    deleter
                        .delete_and_stabilize(stack_set_id, group_ref, in_flight_ref)
                        .await
                        .map_err(|e| classify_service_error(&e, "stack instances", key_ref))
                },
            )
            .await;

            match outcome {
                Ok(InstanceDeletionStatus::Done) => {
                    info!(stack_set_id = %stack_set_id, target = %target_key, "Stack instances deleted");
                    context.complete_grouping(&group);
                    settled_this_invocation += 1;
                }
                Ok(InstanceDeletionStatus::NotFound) => {
                    info!(stack_set_id = %stack_set_id, target = %target_key, "Stack instances already absent");
                    context.complete_grouping(&group);
                    settled_this_invocation += 1;
                }
                Err(e) if e.is_not_found() => {
                    info!(
                        stack_set_id = %stack_set_id,
                        target = %target_key,
                        error = %e,
                        "Stack instances or stack set already gone, treating as deleted"
                    );
                    context.complete_grouping(&group);
                    settled_this_invocation += 1;
                }
                Ok(InstanceDeletionStatus::InProgress { operation_id }) => {
                    context.record_in_flight(&group, operation_id);

                    if context.stabilization_retries > self.config.max_stabilization_retries {
                        let err = StackSetError::NotStabilized {
                            target: target_key,
                            polls: context.stabilization_retries,
                        };
                        return self.fail(context, err);
                    }

                    debug!(
                        stack_set_id = %stack_set_id,
                        target = %target_key,
                        polls = context.stabilization_retries,
                        "Stack instance deletion still running"
                    );
                    return self.yield_to_host(stack_set_id, context);
                }
                Err(e) => return self.fail(context, e),
            }
        }

        if let Err(e) = state_machine::transition(&mut context, DeleteEvent::InstancesDrained) {
            return self.fail(context, StackSetError::InvalidState(e.to_string()));
        }
        log_phase_operation(self.name(), stack_set_id, "complete", Some(0), None);
        ProgressEvent::progress(context)
    }

    fn yield_to_host(&self, stack_set_id: &str, mut context: CallbackContext) -> ProgressEvent {
        let remaining = context.remaining();
        if let Err(e) =
            state_machine::transition(&mut context, DeleteEvent::InstancesRemaining(remaining))
        {
            return self.fail(context, StackSetError::InvalidState(e.to_string()));
        }
        log_phase_operation(self.name(), stack_set_id, "in_progress", Some(remaining), None);
        ProgressEvent::defer(context, self.config.callback_delay())
    }

    /// Fail without touching the pending list
    fn fail(&self, mut context: CallbackContext, error: StackSetError) -> ProgressEvent {
        warn!(
            remaining = context.remaining(),
            error = %error,
            "Stack instance deletion failed"
        );
        state_machine::mark_failed(&mut context, error.to_string());
        ProgressEvent::failed(&error, context)
    }
}

#[async_trait::async_trait]
impl DeletePhase for InstanceDeletionPhase {
    fn name(&self) -> &'static str {
        "instance_deletion"
    }

    async fn execute(&self, model: &ResourceModel, progress: ProgressEvent) -> ProgressEvent {
        match progress {
            ProgressEvent::InProgress {
                callback_context, ..
            } => self.delete_stack_instances(model, callback_context).await,
            terminal => terminal,
        }
    }
}
