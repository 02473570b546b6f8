//! Deterministic collaborator fakes for handler tests
//!
//! Both fakes append to a shared journal so tests can assert on call ordering
//! across the instance and stack set phases.

#![allow(dead_code)]

use async_trait::async_trait;
use stackset_core::config::{HandlerConfig, RetryPolicy};
use stackset_core::constants::operations;
use stackset_core::models::StackInstances;
use stackset_core::orchestration::{
    InstanceDeleter, InstanceDeletionStatus, Invoker, ServiceError, ServiceRequest,
    ServiceResponse,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub type Journal = Arc<Mutex<Vec<JournalEntry>>>;

#[derive(Debug, Clone, PartialEq)]
pub enum JournalEntry {
    Invoke {
        operation: String,
        request: ServiceRequest,
    },
    DeleteInstances {
        target: String,
        in_flight: Option<String>,
    },
}

pub fn new_journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Handler config with millisecond retries and a one second callback delay
pub fn fast_config() -> HandlerConfig {
    HandlerConfig {
        retry: RetryPolicy {
            max_attempts: 3,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            multiplier: 2.0,
            jitter: false,
        },
        callback_delay_seconds: 1,
        max_stabilization_retries: 10,
        invocation_budget_seconds: 600,
    }
}

/// Invoker returning scripted results per operation, succeeding by default
pub struct MockInvoker {
    journal: Journal,
    scripted: Mutex<HashMap<String, VecDeque<Result<ServiceResponse, ServiceError>>>>,
}

impl MockInvoker {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            scripted: Mutex::new(HashMap::new()),
        }
    }

    /// Queue results for `operation`; consumed in order, one per attempt
    pub fn script(
        self,
        operation: &str,
        results: impl IntoIterator<Item = Result<ServiceResponse, ServiceError>>,
    ) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .extend(results);
        self
    }

    pub fn fail_with(self, operation: &str, code: &str, times: usize) -> Self {
        let errors: Vec<_> = (0..times)
            .map(|_| Err(ServiceError::new(code, format!("{code} raised by mock"))))
            .collect();
        self.script(operation, errors)
    }
}

#[async_trait]
impl Invoker for MockInvoker {
    async fn invoke(
        &self,
        operation: &str,
        request: &ServiceRequest,
    ) -> Result<ServiceResponse, ServiceError> {
        self.journal.lock().unwrap().push(JournalEntry::Invoke {
            operation: operation.to_string(),
            request: request.clone(),
        });

        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front);

        scripted.unwrap_or_else(|| match request {
            ServiceRequest::Noop => Ok(ServiceResponse::Empty),
            ServiceRequest::DeleteStackSet(_) => Ok(ServiceResponse::StackSetDeleted),
        })
    }
}

/// Deleter returning scripted statuses per grouping, `Done` by default
pub struct MockDeleter {
    journal: Journal,
    scripted: Mutex<HashMap<String, VecDeque<Result<InstanceDeletionStatus, ServiceError>>>>,
}

impl MockDeleter {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            scripted: Mutex::new(HashMap::new()),
        }
    }

    pub fn script(
        self,
        group: &StackInstances,
        results: impl IntoIterator<Item = Result<InstanceDeletionStatus, ServiceError>>,
    ) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .entry(group.target_key())
            .or_default()
            .extend(results);
        self
    }

    /// Report `polls` in-progress results for `group` before it completes
    pub fn in_progress_for(self, group: &StackInstances, polls: usize) -> Self {
        let op = format!("op-{}", group.target_key());
        let results: Vec<_> = (0..polls)
            .map(|_| {
                Ok(InstanceDeletionStatus::InProgress {
                    operation_id: op.clone(),
                })
            })
            .collect();
        self.script(group, results)
    }
}

#[async_trait]
impl InstanceDeleter for MockDeleter {
    async fn delete_and_stabilize(
        &self,
        _stack_set_id: &str,
        group: &StackInstances,
        in_flight_operation: Option<&str>,
    ) -> Result<InstanceDeletionStatus, ServiceError> {
        let target = group.target_key();
        self.journal.lock().unwrap().push(JournalEntry::DeleteInstances {
            target: target.clone(),
            in_flight: in_flight_operation.map(str::to_owned),
        });

        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(&target)
            .and_then(VecDeque::pop_front);

        scripted.unwrap_or(Ok(InstanceDeletionStatus::Done))
    }
}

/// Count journal entries matching `predicate`
pub fn count(journal: &Journal, predicate: impl Fn(&JournalEntry) -> bool) -> usize {
    journal.lock().unwrap().iter().filter(|e| predicate(e)).count()
}

pub fn is_parent_delete(entry: &JournalEntry) -> bool {
    matches!(
        entry,
        JournalEntry::Invoke { operation, .. } if operation == operations::DELETE_STACK_SET
    )
}

pub fn is_preflight(entry: &JournalEntry) -> bool {
    matches!(
        entry,
        JournalEntry::Invoke { operation, .. } if operation == operations::DELETE
    )
}

/// Fresh delete requests (not polls of an in-flight operation) issued for `target`
pub fn fresh_deletes_for(journal: &Journal, target: &str) -> usize {
    count(journal, |e| {
        matches!(
            e,
            JournalEntry::DeleteInstances { target: t, in_flight: None } if t == target
        )
    })
}

pub fn deletes_for(journal: &Journal, target: &str) -> usize {
    count(journal, |e| {
        matches!(e, JournalEntry::DeleteInstances { target: t, .. } if t == target)
    })
}

/// Groupings `g0..gN`, one account each in us-east-1
pub fn groupings(n: usize) -> Vec<StackInstances> {
    (0..n)
        .map(|i| StackInstances::for_accounts([format!("{:012}", i + 1)], ["us-east-1"]))
        .collect()
}
