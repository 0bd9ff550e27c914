//! Spot conversion estimation engine
//!
//! This module is organized into focused submodules:
//! - `policy`: per-group conversion policy and edits
//! - `tags`: policy tag decoding and encoding
//! - `group`: AutoScaling Group model
//! - `projection`: per-group cost projection
//! - `aggregate`: region-wide totals
//!
//! A `Region` owns its groups and shares a read-only pricing catalog. Nothing
//! propagates automatically: after a policy edit, call `Region::aggregate`
//! again.

pub mod aggregate;
pub mod group;
pub mod policy;
pub mod projection;
pub mod tags;

pub use aggregate::{aggregate, AggregateTotals, FeeSchedule};
pub use group::{Group, GroupDescription, Instance, InstanceDescription, ProjectionStatus, TagDescription};
pub use policy::{GroupPolicy, PolicyChange, PolicyEdit};
pub use projection::{GroupCosts, InstanceProjection, Projection, Purchase};
pub use tags::ResourceTag;

use crate::error::{DataWarning, EstimatorError, Result};
use crate::pricing::PricingCatalog;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// The groups of one AWS region together with its pricing catalog
#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    catalog: Arc<PricingCatalog>,
    groups: Vec<Group>,
}

impl Region {
    /// Load groups for a region and project each one
    ///
    /// Returns every data-quality warning raised while decoding tags and
    /// pricing instances.
    pub fn load(
        name: &str,
        catalog: Arc<PricingCatalog>,
        descriptions: Vec<GroupDescription>,
    ) -> (Self, Vec<DataWarning>) {
        let mut warnings = Vec::new();
        let groups = descriptions
            .into_iter()
            .map(|d| {
                let (group, tag_warnings) = Group::from_description(d);
                warnings.extend(tag_warnings);
                group
            })
            .collect();

        let mut region = Self {
            name: name.to_string(),
            catalog,
            groups,
        };
        warnings.extend(region.refresh_all());
        info!(
            "Loaded {} AutoScaling Groups in {}",
            region.groups.len(),
            region.name
        );
        (region, warnings)
    }

    /// Read group descriptions from a JSON file
    pub fn read_descriptions(path: &Path) -> Result<Vec<GroupDescription>> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn catalog(&self) -> &PricingCatalog {
        &self.catalog
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Re-project every group
    pub fn refresh_all(&mut self) -> Vec<DataWarning> {
        let mut warnings = Vec::new();
        for group in &mut self.groups {
            warnings.extend(group.refresh(&self.name, &self.catalog));
        }
        warnings
    }

    /// Edit one group's policy
    ///
    /// Returns `None` when the edit did not change anything.
    pub fn edit_policy(&mut self, group: &str, edit: PolicyEdit) -> Result<Option<PolicyChange>> {
        let target = self
            .groups
            .iter_mut()
            .find(|g| g.name == group)
            .ok_or_else(|| EstimatorError::GroupNotFound(group.to_string()))?;
        Ok(target.edit_policy(edit, &self.name, &self.catalog))
    }

    /// Apply the same edit to every group, as a region-wide override
    pub fn edit_all(&mut self, edit: PolicyEdit) -> Vec<PolicyChange> {
        let mut changes = Vec::new();
        for group in &mut self.groups {
            changes.extend(group.edit_policy(edit, &self.name, &self.catalog));
        }
        info!("Override {:?} changed {} groups in {}", edit, changes.len(), self.name);
        changes
    }

    pub fn aggregate(&self, monthly_multiplier: f64, fees: &FeeSchedule) -> AggregateTotals {
        aggregate::aggregate(&self.groups, monthly_multiplier, fees)
    }

    /// Tags to write back for every group, in group order
    pub fn materialize_tags(&self) -> Vec<ResourceTag> {
        self.groups
            .iter()
            .flat_map(|g| tags::materialize(&g.name, &g.policy))
            .collect()
    }
}
