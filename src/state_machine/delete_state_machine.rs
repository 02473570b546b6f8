use super::{events::DeleteEvent, states::DeleteState};
use crate::models::CallbackContext;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateMachineError {
    #[error("Invalid transition from {from} on {event}")]
    InvalidTransition { from: DeleteState, event: String },

    #[error("Guard failed: {reason}")]
    GuardFailed { reason: String },
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;

/// Determine the target state for `event` from `current`
pub fn determine_target_state(
    current: DeleteState,
    event: &DeleteEvent,
) -> StateMachineResult<DeleteState> {
    let target = match (current, event) {
        (DeleteState::Init, DeleteEvent::Seed) => DeleteState::DeletingInstances,

        // Self-loop across invocation boundaries
        (DeleteState::DeletingInstances, DeleteEvent::InstancesRemaining(_)) => {
            DeleteState::DeletingInstances
        }
        (DeleteState::DeletingInstances, DeleteEvent::InstancesDrained) => {
            DeleteState::DeletingParent
        }
        // A resumed context already past instance deletion stays put
        (DeleteState::DeletingParent, DeleteEvent::InstancesDrained) => DeleteState::DeletingParent,

        (DeleteState::DeletingParent, DeleteEvent::ParentDeleted) => DeleteState::Done,

        (from, DeleteEvent::Fail(_)) if !from.is_terminal() => DeleteState::Failed,

        (from, event) => {
            return Err(StateMachineError::InvalidTransition {
                from,
                event: event.event_type().to_string(),
            })
        }
    };

    Ok(target)
}

/// Apply `event` to the state held in `context`, enforcing transition guards
pub fn transition(
    context: &mut CallbackContext,
    event: DeleteEvent,
) -> StateMachineResult<DeleteState> {
    let current = context.state;
    let target = determine_target_state(current, &event)?;

    if target == DeleteState::DeletingParent && context.has_pending_instances() {
        return Err(StateMachineError::GuardFailed {
            reason: format!(
                "{} stack instance groupings still pending",
                context.remaining()
            ),
        });
    }

    if target == DeleteState::Done && !context.parent_delete_attempted {
        return Err(StateMachineError::GuardFailed {
            reason: "stack set delete was never attempted".to_string(),
        });
    }

    debug!(
        from = %current,
        to = %target,
        event = event.event_type(),
        "Delete state transition"
    );
    context.state = target;
    Ok(target)
}

/// Move `context` to `Failed`; a rejected transition is logged, not returned
pub fn mark_failed(context: &mut CallbackContext, reason: impl Into<String>) {
    if let Err(e) = transition(context, DeleteEvent::fail_with_error(reason)) {
        debug!(state = %context.state, error = %e, "Failure transition rejected");
    }
}
