//! # Delete Orchestration
//!
//! Phased, resumable deletion of a stack set and its stack instances.
//!
//! ## Core Components
//!
//! - **DeleteHandler**: entry point; seeds the callback context, runs the preflight
//!   call and the phase pipeline
//! - **InstanceDeletionPhase**: drains pending stack instance groupings across invocations
//! - **StackSetDeletionPhase**: single terminal delete of the stack set
//! - **CallProxy**: retrying wrapper over the injected `Invoker`
//! - **Driver**: host-side loop that re-invokes the handler until a terminal event

pub mod delete_handler;
pub mod driver;
pub mod error_classifier;
pub mod instance_deletion;
pub mod phase;
pub mod progress;
pub mod proxy;
pub mod retry;
pub mod stack_set_deletion;
pub mod types;

// Re-export core types and components for easy access
pub use delete_handler::DeleteHandler;
pub use driver::{run_to_completion, DriverOptions, DriverOutcome};
pub use error_classifier::classify_service_error;
pub use instance_deletion::InstanceDeletionPhase;
pub use phase::DeletePhase;
pub use progress::ProgressEvent;
pub use proxy::CallProxy;
pub use stack_set_deletion::StackSetDeletionPhase;
pub use types::*;
