//! # Resource Model
//!
//! Desired state of a stack set as handed to the handler by the hosting framework.
//!
//! ## Overview
//!
//! The `ResourceModel` identifies the stack set and carries every stack instance
//! grouping that existed when deletion was requested. It is immutable input for the
//! whole delete workflow; the handler snapshots its groupings into the callback
//! context on the first invocation and never reads them again.
//!
//! Field names serialize in camelCase to match the hosting framework's schema.

use crate::constants::TYPE_NAME;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Desired state of a stack set resource
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceModel {
    /// Physical identifier of the stack set (`name:uuid`)
    pub stack_set_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_set_name: Option<String>,
    #[serde(default)]
    pub stack_instances_group: Vec<StackInstances>,
}

impl ResourceModel {
    pub const TYPE_NAME: &'static str = TYPE_NAME;

    pub fn new(stack_set_id: impl Into<String>) -> Self {
        Self {
            stack_set_id: stack_set_id.into(),
            ..Self::default()
        }
    }

    pub fn with_stack_instances(mut self, group: StackInstances) -> Self {
        self.stack_instances_group.push(group);
        self
    }

    /// Number of account/region pairs across all groupings
    pub fn instance_count(&self) -> usize {
        self.stack_instances_group
            .iter()
            .map(StackInstances::instance_count)
            .sum()
    }
}

/// Deployment targets of a grouping: explicit accounts or organizational units
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTargets {
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default)]
    pub organizational_unit_ids: Vec<String>,
}

/// One stack instance grouping: a set of deployment targets crossed with regions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackInstances {
    pub deployment_targets: DeploymentTargets,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_overrides: Option<BTreeMap<String, String>>,
}

impl StackInstances {
    pub fn for_accounts<A, R>(accounts: A, regions: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            deployment_targets: DeploymentTargets {
                accounts: accounts.into_iter().map(Into::into).collect(),
                organizational_unit_ids: Vec::new(),
            },
            regions: regions.into_iter().map(Into::into).collect(),
            parameter_overrides: None,
        }
    }

    pub fn for_organizational_units<O, R>(ou_ids: O, regions: R) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            deployment_targets: DeploymentTargets {
                accounts: Vec::new(),
                organizational_unit_ids: ou_ids.into_iter().map(Into::into).collect(),
            },
            regions: regions.into_iter().map(Into::into).collect(),
            parameter_overrides: None,
        }
    }

    /// Account/region pairs this grouping expands to (OU targets count once per OU)
    pub fn instance_count(&self) -> usize {
        let targets = self.deployment_targets.accounts.len()
            + self.deployment_targets.organizational_unit_ids.len();
        targets * self.regions.len()
    }

    /// Stable, readable key identifying this grouping in logs and errors
    pub fn target_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StackInstances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let targets = &self.deployment_targets;
        if !targets.accounts.is_empty() {
            write!(f, "accounts=[{}]", targets.accounts.join(","))?;
        }
        if !targets.organizational_unit_ids.is_empty() {
            if !targets.accounts.is_empty() {
                write!(f, " ")?;
            }
            write!(f, "ous=[{}]", targets.organizational_unit_ids.join(","))?;
        }
        write!(f, " regions=[{}]", self.regions.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_key() {
        let group = StackInstances::for_accounts(["111111111111", "222222222222"], ["us-east-1"]);
        assert_eq!(
            group.target_key(),
            "accounts=[111111111111,222222222222] regions=[us-east-1]"
        );

        let ou = StackInstances::for_organizational_units(["ou-abcd"], ["eu-west-1", "us-west-2"]);
        assert_eq!(ou.target_key(), "ous=[ou-abcd] regions=[eu-west-1,us-west-2]");
    }

    #[test]
    fn test_instance_count() {
        let model = ResourceModel::new("my-set:1234")
            .with_stack_instances(StackInstances::for_accounts(["1", "2"], ["us-east-1", "us-west-2"]))
            .with_stack_instances(StackInstances::for_organizational_units(["ou-1"], ["eu-west-1"]));
        assert_eq!(model.instance_count(), 5);
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = serde_json::json!({
            "stackSetId": "my-set:1234",
            "stackInstancesGroup": [{
                "deploymentTargets": { "accounts": ["111111111111"] },
                "regions": ["us-east-1"]
            }]
        });

        let model: ResourceModel = serde_json::from_value(json).unwrap();
        assert_eq!(model.stack_set_id, "my-set:1234");
        assert_eq!(model.stack_instances_group.len(), 1);
        assert!(model.stack_instances_group[0]
            .deployment_targets
            .organizational_unit_ids
            .is_empty());
        assert_eq!(ResourceModel::TYPE_NAME, "AWS::CloudFormation::StackSet");
    }
}
