//! # Handler Configuration
//!
//! Retry and stabilization tuning for the delete handler. Values are layered from
//! built-in defaults, an optional YAML/TOML file, and `STACKSET__*` environment
//! variables (e.g. `STACKSET__RETRY__MAX_ATTEMPTS=3`).

use crate::constants::{defaults, env};
use crate::error::{Result, StackSetError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Bounded exponential retry policy applied to individual remote calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f32,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::RETRY_MAX_ATTEMPTS,
            initial_delay_ms: defaults::RETRY_INITIAL_DELAY_MS,
            max_delay_ms: defaults::RETRY_MAX_DELAY_MS,
            multiplier: defaults::RETRY_MULTIPLIER,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    pub retry: RetryPolicy,
    pub callback_delay_seconds: u64,
    pub max_stabilization_retries: u32,
    pub invocation_budget_seconds: u64,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            callback_delay_seconds: defaults::CALLBACK_DELAY_SECONDS,
            max_stabilization_retries: defaults::MAX_STABILIZATION_RETRIES,
            invocation_budget_seconds: defaults::INVOCATION_BUDGET_SECONDS,
        }
    }
}

impl HandlerConfig {
    /// Read individual `STACKSET_*` overrides on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(attempts) = std::env::var(env::RETRY_MAX_ATTEMPTS) {
            config.retry.max_attempts = attempts.parse().map_err(|e| {
                StackSetError::Configuration(format!("Invalid retry max_attempts: {e}"))
            })?;
        }

        if let Ok(delay) = std::env::var(env::CALLBACK_DELAY_SECONDS) {
            config.callback_delay_seconds = delay.parse().map_err(|e| {
                StackSetError::Configuration(format!("Invalid callback_delay_seconds: {e}"))
            })?;
        }

        if let Ok(retries) = std::env::var(env::MAX_STABILIZATION_RETRIES) {
            config.max_stabilization_retries = retries.parse().map_err(|e| {
                StackSetError::Configuration(format!("Invalid max_stabilization_retries: {e}"))
            })?;
        }

        if let Ok(budget) = std::env::var(env::INVOCATION_BUDGET_SECONDS) {
            config.invocation_budget_seconds = budget.parse().map_err(|e| {
                StackSetError::Configuration(format!("Invalid invocation_budget_seconds: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load layered configuration: defaults, then `path` if given, then `STACKSET__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading handler configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(env::CONFIG_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(StackSetError::Configuration(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.retry.multiplier < 1.0 {
            return Err(StackSetError::Configuration(format!(
                "retry.multiplier must be >= 1.0, got {}",
                self.retry.multiplier
            )));
        }
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return Err(StackSetError::Configuration(format!(
                "retry.initial_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.retry.initial_delay_ms, self.retry.max_delay_ms
            )));
        }
        if self.max_stabilization_retries == 0 {
            return Err(StackSetError::Configuration(
                "max_stabilization_retries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn callback_delay(&self) -> Duration {
        Duration::from_secs(self.callback_delay_seconds)
    }

    pub fn invocation_budget(&self) -> Duration {
        Duration::from_secs(self.invocation_budget_seconds)
    }
}
