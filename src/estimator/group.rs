//! AutoScaling Group model
//!
//! `GroupDescription` is the already-fetched shape of an ASG as handed to the
//! engine. `Group` is the engine's own view: decoded policy, resolved platform
//! and the latest projection.

use crate::error::{DataWarning, ProjectionError};
use crate::estimator::policy::{GroupPolicy, PolicyChange, PolicyEdit};
use crate::estimator::projection::{self, GroupCosts, Projection};
use crate::estimator::tags;
use crate::pricing::{Platform, PricingCatalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// One tag as reported on an ASG
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDescription {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// One instance as reported on an ASG, in reported order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceDescription {
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub instance_type: Option<String>,
}

/// An AutoScaling Group as fetched by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupDescription {
    pub name: String,
    #[serde(default)]
    pub desired_capacity: Option<u64>,
    /// Instance type(s) from the launch configuration or template
    #[serde(default)]
    pub instance_types: Vec<String>,
    #[serde(default)]
    pub ami: Option<String>,
    /// Platform details of the launch image, e.g. "Linux/UNIX"
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub instances: Vec<InstanceDescription>,
    #[serde(default)]
    pub tags: Vec<TagDescription>,
}

/// An instance within a group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instance {
    /// 0-based position in the group's reported instance list
    pub ordinal: usize,
    pub instance_id: Option<String>,
    pub instance_type: Option<String>,
}

/// Latest projection state of a group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectionStatus {
    /// Not projected since load
    Pending,
    Available(Projection),
    Unavailable(ProjectionError),
}

#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub name: String,
    pub desired_capacity: Option<u64>,
    pub instance_types: Vec<String>,
    pub ami: Option<String>,
    pub platform: Option<Platform>,
    pub instances: Vec<Instance>,
    pub policy: GroupPolicy,
    pub status: ProjectionStatus,
}

impl Group {
    /// Build a group from its description, decoding the policy tags
    pub fn from_description(description: GroupDescription) -> (Self, Vec<DataWarning>) {
        let tag_map: BTreeMap<String, String> = description
            .tags
            .into_iter()
            .map(|t| (t.key, t.value))
            .collect();
        let (policy, warnings) = tags::decode(&tag_map);

        let platform = description.platform.as_deref().and_then(|p| match p.parse::<Platform>() {
            Ok(platform) => Some(platform),
            Err(e) => {
                warn!("AutoScaling Group {}: {}", description.name, e);
                None
            }
        });

        let instances = description
            .instances
            .into_iter()
            .enumerate()
            .map(|(ordinal, i)| Instance {
                ordinal,
                instance_id: i.instance_id,
                instance_type: i.instance_type,
            })
            .collect();

        let group = Self {
            name: description.name,
            desired_capacity: description.desired_capacity,
            instance_types: description.instance_types,
            ami: description.ami,
            platform,
            instances,
            policy,
            status: ProjectionStatus::Pending,
        };
        (group, warnings)
    }

    /// Recompute the projection against a region's catalog
    pub fn refresh(&mut self, region: &str, catalog: &PricingCatalog) -> Vec<DataWarning> {
        match projection::project(self, region, catalog) {
            Ok(projection) => {
                let warnings = projection.warnings.clone();
                self.status = ProjectionStatus::Available(projection);
                warnings
            }
            Err(e) => {
                warn!("Projection unavailable: {}", e);
                self.status = ProjectionStatus::Unavailable(e);
                Vec::new()
            }
        }
    }

    /// Apply a policy edit and re-project if anything changed
    pub fn edit_policy(
        &mut self,
        edit: PolicyEdit,
        region: &str,
        catalog: &PricingCatalog,
    ) -> Option<PolicyChange> {
        let before = self.policy.clone();
        if !self.policy.apply(edit) {
            return None;
        }
        let warnings = self.refresh(region, catalog);
        Some(PolicyChange {
            group: self.name.clone(),
            before,
            after: self.policy.clone(),
            warnings,
        })
    }

    /// Current cost figures, if the group could be projected
    pub fn costs(&self) -> Option<&GroupCosts> {
        match &self.status {
            ProjectionStatus::Available(p) => Some(&p.costs),
            _ => None,
        }
    }

    pub fn projection(&self) -> Option<&Projection> {
        match &self.status {
            ProjectionStatus::Available(p) => Some(p),
            _ => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&ProjectionError> {
        match &self.status {
            ProjectionStatus::Unavailable(e) => Some(e),
            _ => None,
        }
    }
}
