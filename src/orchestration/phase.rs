use super::progress::ProgressEvent;
use crate::models::ResourceModel;

/// One step of the delete pipeline
///
/// A phase receives the event produced by the previous phase and is only executed
/// when that event allows continuation within the current invocation.
#[async_trait::async_trait]
pub trait DeletePhase: Send + Sync {
    /// Phase name for logging
    fn name(&self) -> &'static str;

    async fn execute(&self, model: &ResourceModel, progress: ProgressEvent) -> ProgressEvent;
}

/// Run `phases` in order, stopping at the first event that does not allow continuation
pub async fn run_phases(
    phases: &[&dyn DeletePhase],
    model: &ResourceModel,
    mut progress: ProgressEvent,
) -> ProgressEvent {
    for phase in phases {
        if !progress.can_continue() {
            tracing::debug!(phase = phase.name(), "Skipping phase, previous phase yielded");
            break;
        }
        progress = phase.execute(model, progress).await;
    }
    progress
}
