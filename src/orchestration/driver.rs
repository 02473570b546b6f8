//! Host-side re-invocation loop.
//!
//! Plays the role of the hosting framework: invokes the handler, persists the
//! callback context as JSON between invocations (so each invocation starts from a
//! freshly deserialized context, as it would in a new process), waits out the
//! callback delay, and stops at the first terminal event.

use super::delete_handler::DeleteHandler;
use super::progress::ProgressEvent;
use crate::constants::defaults;
use crate::logging::init_structured_logging;
use crate::models::{CallbackContext, ResourceModel};
use anyhow::{bail, Context};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub max_invocations: u32,
    /// Sleep for the requested callback delay between invocations
    pub honor_callback_delay: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            max_invocations: defaults::MAX_INVOCATIONS,
            honor_callback_delay: true,
        }
    }
}

/// Final event plus the per-invocation trail
#[derive(Debug, Clone)]
pub struct DriverOutcome {
    pub event: ProgressEvent,
    pub invocations: u32,
    /// Pending grouping count after each non-terminal invocation
    pub pending_history: Vec<usize>,
}

/// Re-invoke `handler` until it returns SUCCESS or FAILED
pub async fn run_to_completion(
    handler: &DeleteHandler,
    model: &ResourceModel,
    initial_context: Option<CallbackContext>,
    options: &DriverOptions,
) -> anyhow::Result<DriverOutcome> {
    init_structured_logging();

    let mut persisted = serde_json::to_string(&initial_context.unwrap_or_default())
        .context("Failed to serialize initial callback context")?;
    let mut pending_history = Vec::new();

    for invocation in 1..=options.max_invocations {
        let context: CallbackContext = serde_json::from_str(&persisted)
            .context("Failed to deserialize persisted callback context")?;

        let event = handler.handle_request(model, context).await;

        match &event {
            ProgressEvent::InProgress {
                callback_context,
                callback_delay_seconds,
            } => {
                pending_history.push(callback_context.remaining());
                persisted = serde_json::to_string(callback_context)
                    .context("Failed to serialize callback context")?;
                debug!(
                    invocation,
                    remaining = callback_context.remaining(),
                    delay_seconds = callback_delay_seconds,
                    "Handler yielded, scheduling re-invocation"
                );
                if options.honor_callback_delay {
                    tokio::time::sleep(std::time::Duration::from_secs(*callback_delay_seconds))
                        .await;
                }
            }
            _ => {
                info!(invocation, success = event.is_success(), "Delete workflow finished");
                return Ok(DriverOutcome {
                    event,
                    invocations: invocation,
                    pending_history,
                });
            }
        }
    }

    bail!(
        "Delete workflow for {} did not finish within {} invocations",
        model.stack_set_id,
        options.max_invocations
    )
}
