//! # Handler Constants
//!
//! Resource type names, operation names used for call tracking, and the default
//! tuning values that bound retries and stabilization polling.

/// CloudFormation resource type handled by this crate
pub const TYPE_NAME: &str = "AWS::CloudFormation::StackSet";

/// Operation names passed to the invoker for call tracking and logging
pub mod operations {
    pub const DELETE: &str = "AWS-CloudFormation-StackSet::Delete";
    pub const DELETE_STACK_INSTANCES: &str = "AWS-CloudFormation-StackSet::DeleteStackInstances";
    pub const DELETE_STACK_SET: &str = "AWS-CloudFormation-StackSet::DeleteStackSet";
}

/// Default tuning values used when no configuration overrides them
pub mod defaults {
    pub const RETRY_MAX_ATTEMPTS: u32 = 5;
    pub const RETRY_INITIAL_DELAY_MS: u64 = 200;
    pub const RETRY_MAX_DELAY_MS: u64 = 5_000;
    pub const RETRY_MULTIPLIER: f32 = 2.0;

    /// Delay the host waits before re-invoking while instances are still deleting
    pub const CALLBACK_DELAY_SECONDS: u64 = 30;

    /// Consecutive in-progress polls tolerated for a single grouping
    pub const MAX_STABILIZATION_RETRIES: u32 = 120;

    /// Wall-clock budget for one invocation before yielding back to the host
    pub const INVOCATION_BUDGET_SECONDS: u64 = 600;

    /// Upper bound on host re-invocations in the driver loop
    pub const MAX_INVOCATIONS: u32 = 1_000;
}

/// Environment variable names read by configuration and logging
pub mod env {
    pub const ENVIRONMENT: &str = "STACKSET_ENV";
    pub const LOG_FORMAT: &str = "STACKSET_LOG_FORMAT";
    pub const CONFIG_PREFIX: &str = "STACKSET";
    pub const RETRY_MAX_ATTEMPTS: &str = "STACKSET_RETRY_MAX_ATTEMPTS";
    pub const CALLBACK_DELAY_SECONDS: &str = "STACKSET_CALLBACK_DELAY_SECONDS";
    pub const MAX_STABILIZATION_RETRIES: &str = "STACKSET_MAX_STABILIZATION_RETRIES";
    pub const INVOCATION_BUDGET_SECONDS: &str = "STACKSET_INVOCATION_BUDGET_SECONDS";
}
