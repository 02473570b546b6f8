pub mod callback_context;
pub mod resource_model;

// Re-export models for easy access
pub use callback_context::{CallbackContext, OperationMarker};
pub use resource_model::{DeploymentTargets, ResourceModel, StackInstances};
