//! # Callback Context
//!
//! The only state carried between handler invocations. The hosting framework
//! persists it verbatim between calls, so every field must survive a serde round
//! trip with exact list contents and order.

use super::resource_model::{ResourceModel, StackInstances};
use crate::state_machine::{self, DeleteEvent, DeleteState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An instance deletion operation started in a previous invocation and not yet settled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMarker {
    pub operation_id: String,
    /// Grouping the operation was issued for
    pub target_key: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallbackContext {
    pub state: DeleteState,
    /// Groupings still to delete, in model order
    pub delete_stacks_list: Vec<StackInstances>,
    pub in_flight_operation: Option<OperationMarker>,
    /// Consecutive in-progress polls of the head grouping
    pub stabilization_retries: u32,
    pub parent_delete_attempted: bool,
}

impl CallbackContext {
    /// True until the first invocation has snapshotted the model's groupings
    pub fn needs_seed(&self) -> bool {
        self.state == DeleteState::Init
    }

    /// Snapshot every grouping in the model as pending work
    ///
    /// No-op once seeded, so a resumed or completed context is never refilled.
    pub fn seed_from(&mut self, model: &ResourceModel) -> bool {
        if !self.needs_seed() {
            return false;
        }
        self.delete_stacks_list = model.stack_instances_group.clone();
        self.clear_in_flight();
        state_machine::transition(self, DeleteEvent::Seed).is_ok()
    }

    pub fn remaining(&self) -> usize {
        self.delete_stacks_list.len()
    }

    pub fn has_pending_instances(&self) -> bool {
        !self.delete_stacks_list.is_empty()
    }

    /// Remove a confirmed-deleted grouping and reset its polling bookkeeping
    ///
    /// Returns false when the grouping was not pending, so it is never removed twice.
    pub fn complete_grouping(&mut self, group: &StackInstances) -> bool {
        let Some(index) = self.delete_stacks_list.iter().position(|g| g == group) else {
            return false;
        };
        self.delete_stacks_list.remove(index);
        self.clear_in_flight();
        true
    }

    /// Operation id to resume for `group`, if one was started for it
    pub fn in_flight_for(&self, group: &StackInstances) -> Option<&str> {
        let key = group.target_key();
        self.in_flight_operation
            .as_ref()
            .filter(|marker| marker.target_key == key)
            .map(|marker| marker.operation_id.as_str())
    }

    /// Record an in-progress operation, counting consecutive polls of the same one
    pub fn record_in_flight(&mut self, group: &StackInstances, operation_id: String) {
        let key = group.target_key();
        let same_operation = self
            .in_flight_operation
            .as_ref()
            .is_some_and(|m| m.target_key == key && m.operation_id == operation_id);

        if same_operation {
            self.stabilization_retries += 1;
        } else {
            self.in_flight_operation = Some(OperationMarker {
                operation_id,
                target_key: key,
                started_at: Utc::now(),
            });
            self.stabilization_retries = 1;
        }
    }

    pub fn clear_in_flight(&mut self) {
        self.in_flight_operation = None;
        self.stabilization_retries = 0;
    }

    /// Serialize for hand-off to the hosting framework
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ResourceModel {
        ResourceModel::new("ss:1")
            .with_stack_instances(StackInstances::for_accounts(["1"], ["us-east-1"]))
            .with_stack_instances(StackInstances::for_accounts(["2"], ["us-west-2"]))
    }

    #[test]
    fn test_seed_only_once() {
        let model = model();
        let mut context = CallbackContext::default();
        assert!(context.needs_seed());
        assert!(context.seed_from(&model));
        assert_eq!(context.remaining(), 2);
        assert_eq!(context.state, DeleteState::DeletingInstances);

        let first = model.stack_instances_group[0].clone();
        assert!(context.complete_grouping(&first));

        // Reseeding a resumed context must not restore the removed grouping
        assert!(!context.seed_from(&model));
        assert_eq!(context.remaining(), 1);
    }

    #[test]
    fn test_complete_grouping_exactly_once() {
        let model = model();
        let mut context = CallbackContext::default();
        context.seed_from(&model);

        let first = model.stack_instances_group[0].clone();
        assert!(context.complete_grouping(&first));
        assert!(!context.complete_grouping(&first));
        assert_eq!(context.remaining(), 1);
    }

    #[test]
    fn test_in_flight_marker_counts_polls() {
        let model = model();
        let group = model.stack_instances_group[0].clone();
        let other = model.stack_instances_group[1].clone();
        let mut context = CallbackContext::default();

        context.record_in_flight(&group, "op-1".to_string());
        context.record_in_flight(&group, "op-1".to_string());
        assert_eq!(context.stabilization_retries, 2);
        assert_eq!(context.in_flight_for(&group), Some("op-1"));
        assert_eq!(context.in_flight_for(&other), None);

        context.record_in_flight(&group, "op-2".to_string());
        assert_eq!(context.stabilization_retries, 1);

        context.clear_in_flight();
        assert_eq!(context.in_flight_for(&group), None);
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let mut context = CallbackContext::default();
        context.seed_from(&model());
        let head = context.delete_stacks_list[0].clone();
        context.record_in_flight(&head, "op-9".to_string());

        let json = context.to_json().unwrap();
        let restored = CallbackContext::from_json(&json).unwrap();
        assert_eq!(restored, context);
        assert!(json.contains("deleteStacksList"));
    }

    #[test]
    fn test_empty_json_is_fresh_context() {
        let context = CallbackContext::from_json("{}").unwrap();
        assert!(context.needs_seed());
        assert!(!context.parent_delete_attempted);
    }
}
