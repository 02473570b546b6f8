use serde::{Deserialize, Serialize};
use std::fmt;

/// Delete workflow state persisted in the callback context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteState {
    /// No invocation has seeded the pending list yet
    #[default]
    Init,
    /// Draining stack instance groupings, possibly across invocations
    DeletingInstances,
    /// All groupings gone; the stack set delete call is due
    DeletingParent,
    /// Stack set deleted (or already absent)
    Done,
    /// Unrecoverable error
    Failed,
}

impl DeleteState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Check if instance deletion may still (re)start from this state
    pub fn allows_instance_deletion(&self) -> bool {
        matches!(self, Self::Init | Self::DeletingInstances)
    }
}

impl fmt::Display for DeleteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::DeletingInstances => write!(f, "deleting_instances"),
            Self::DeletingParent => write!(f, "deleting_parent"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for DeleteState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "init" => Ok(Self::Init),
            "deleting_instances" => Ok(Self::DeletingInstances),
            "deleting_parent" => Ok(Self::DeletingParent),
            "done" => Ok(Self::Done),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid delete state: {s}")),
        }
    }
}
