#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # StackSet Core
//!
//! Resumable, idempotent delete orchestration for CloudFormation stack sets.
//!
//! ## Overview
//!
//! A stack set can only be deleted once all of its stack instances are gone, and
//! deleting instances is a long-running operation that rarely finishes inside one
//! handler invocation. This crate drives that multi-invocation workflow: it snapshots
//! the instance groupings into a serializable callback context, drains them
//! (yielding back to the host with a resume delay when a deletion is still running),
//! and finally deletes the stack set itself.
//!
//! ## Module Organization
//!
//! - [`models`] - Resource model and callback context
//! - [`orchestration`] - Delete handler, phases, retrying proxy and host driver
//! - [`state_machine`] - Delete workflow states and transitions
//! - [`config`] - Retry and stabilization configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stackset_core::{CallbackContext, DeleteHandler, HandlerConfig, ResourceModel};
//! # use stackset_core::orchestration::{InstanceDeleter, Invoker};
//! # async fn example(invoker: Arc<dyn Invoker>, deleter: Arc<dyn InstanceDeleter>) {
//! let handler = DeleteHandler::new(invoker, deleter, HandlerConfig::default());
//! let model = ResourceModel::new("my-stack-set:0d1f7c2e");
//!
//! let event = handler.handle_request(&model, CallbackContext::default()).await;
//! if let Some(delay) = event.callback_delay() {
//!     println!("re-invoke in {delay:?} with {:?}", event.callback_context());
//! }
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod state_machine;

pub use config::{HandlerConfig, RetryPolicy};
pub use error::{ErrorKind, HandlerErrorCode, Result, StackSetError};
pub use models::{CallbackContext, DeploymentTargets, ResourceModel, StackInstances};
pub use orchestration::{DeleteHandler, ProgressEvent};
pub use state_machine::DeleteState;
