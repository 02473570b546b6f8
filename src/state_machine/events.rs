use serde::{Deserialize, Serialize};

/// Events that drive the delete workflow state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DeleteEvent {
    /// Pending list snapshotted from the model
    Seed,
    /// An invocation ended with groupings still pending
    InstancesRemaining(usize),
    /// Pending list is empty
    InstancesDrained,
    /// Stack set delete succeeded or the stack set was already gone
    ParentDeleted,
    /// Unrecoverable error with message
    Fail(String),
}

impl DeleteEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::InstancesRemaining(_) => "instances_remaining",
            Self::InstancesDrained => "instances_drained",
            Self::ParentDeleted => "parent_deleted",
            Self::Fail(_) => "fail",
        }
    }

    pub fn fail_with_error(error: impl Into<String>) -> Self {
        Self::Fail(error.into())
    }
}
