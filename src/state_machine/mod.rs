// State machine module for the stack set delete workflow
//
// Init -> DeletingInstances (self-loop per invocation) -> DeletingParent -> Done | Failed

pub mod delete_state_machine;
pub mod events;
pub mod states;

// Re-export main types for convenient access
pub use delete_state_machine::{
    determine_target_state, mark_failed, transition, StateMachineError, StateMachineResult,
};
pub use events::DeleteEvent;
pub use states::DeleteState;
