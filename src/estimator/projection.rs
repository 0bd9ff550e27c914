//! Spot conversion cost projection for a single group
//!
//! The first `keep_on_demand` instances, in reported order, are costed at the
//! on-demand price; every later instance is costed at the catalog's minimum
//! Spot price. Which physical instances the optimizer would really keep is not
//! modelled.
//!
//! The projection ignores `policy.enabled`. A disabled group still gets a full
//! "what if it were converted" projection; the flag only matters when
//! aggregating a region.

use crate::error::{DataWarning, ProjectionError};
use crate::estimator::group::Group;
use crate::pricing::PricingCatalog;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Hourly cost figures for one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GroupCosts {
    /// Today's on-demand spend
    pub hourly_cost: f64,
    pub projected_hourly_cost: f64,
    pub projected_hourly_savings: f64,
}

impl GroupCosts {
    /// Projected savings as a fraction of the current cost
    pub fn savings_ratio(&self) -> Option<f64> {
        if self.hourly_cost > 0.0 {
            Some(self.projected_hourly_savings / self.hourly_cost)
        } else {
            None
        }
    }
}

/// Purchase model an instance is costed at in the projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Purchase {
    OnDemand,
    Spot,
}

/// Per-instance breakdown of a projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceProjection {
    pub ordinal: usize,
    pub instance_type: String,
    pub on_demand_price: f64,
    pub projected_price: f64,
    pub purchase: Purchase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub costs: GroupCosts,
    pub keep_on_demand: u64,
    /// Priced instances only; instances without a catalog entry are absent
    pub instances: Vec<InstanceProjection>,
    pub warnings: Vec<DataWarning>,
}

/// Project current and Spot-converted hourly costs for a group
pub fn project(
    group: &Group,
    region: &str,
    catalog: &PricingCatalog,
) -> Result<Projection, ProjectionError> {
    let desired_capacity = group
        .desired_capacity
        .ok_or_else(|| ProjectionError::MissingDesiredCapacity {
            group: group.name.clone(),
        })?;
    let platform = group.platform.ok_or_else(|| ProjectionError::MissingPlatform {
        group: group.name.clone(),
    })?;
    if let Some(instance) = group.instances.iter().find(|i| i.instance_type.is_none()) {
        return Err(ProjectionError::MissingInstanceType {
            group: group.name.clone(),
            ordinal: instance.ordinal,
        });
    }

    let keep_on_demand = group.policy.keep_on_demand(desired_capacity);
    info!(
        "Projecting AutoScaling Group {}: desired {}, on-demand number {}, percentage {:.2}, keeping {} on-demand",
        group.name,
        desired_capacity,
        group.policy.min_on_demand_count,
        group.policy.min_on_demand_percent,
        keep_on_demand
    );

    let mut costs = GroupCosts::default();
    let mut instances = Vec::with_capacity(group.instances.len());
    let mut warnings = Vec::new();

    for instance in &group.instances {
        let instance_type = instance.instance_type.as_deref().unwrap_or_default();
        let Some(pricing) = catalog.lookup(instance_type, region, platform) else {
            warn!(
                "No {} pricing for instance type {} in region {}, skipping instance {} of {}",
                platform, instance_type, region, instance.ordinal, group.name
            );
            warnings.push(DataWarning::MissingPrice {
                group: group.name.clone(),
                ordinal: instance.ordinal,
                instance_type: instance_type.to_string(),
                region: region.to_string(),
                platform: platform.to_string(),
            });
            continue;
        };

        costs.hourly_cost += pricing.on_demand;

        let (purchase, projected_price) = if (instance.ordinal as u64) < keep_on_demand {
            (Purchase::OnDemand, pricing.on_demand)
        } else {
            let spot = pricing.effective_spot();
            costs.projected_hourly_savings += pricing.on_demand - spot;
            (Purchase::Spot, spot)
        };
        costs.projected_hourly_cost += projected_price;

        debug!(
            "{} instance {} ({}) costed as {:?} at {:.4}/h",
            group.name, instance.ordinal, instance_type, purchase, projected_price
        );

        instances.push(InstanceProjection {
            ordinal: instance.ordinal,
            instance_type: instance_type.to_string(),
            on_demand_price: pricing.on_demand,
            projected_price,
            purchase,
        });
    }

    debug!(
        "{} current {:.4}/h, projected {:.4}/h, savings {:.4}/h",
        group.name, costs.hourly_cost, costs.projected_hourly_cost, costs.projected_hourly_savings
    );

    Ok(Projection {
        costs,
        keep_on_demand,
        instances,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::group::{GroupDescription, InstanceDescription};
    use crate::pricing::{Platform, Pricing};

    const REGION: &str = "us-east-1";

    fn catalog() -> PricingCatalog {
        let mut catalog = PricingCatalog::default();
        catalog
            .insert("m5.large", REGION, Platform::Linux, Pricing { on_demand: 1.00, spot_min: 0.30 })
            .unwrap();
        catalog
            .insert("c5.large", REGION, Platform::Linux, Pricing { on_demand: 0.50, spot_min: 0.20 })
            .unwrap();
        catalog
    }

    fn group(types: &[&str], desired: Option<u64>) -> Group {
        let description = GroupDescription {
            name: "workers".to_string(),
            desired_capacity: desired,
            platform: Some("Linux/UNIX".to_string()),
            instances: types
                .iter()
                .map(|t| InstanceDescription {
                    instance_id: None,
                    instance_type: Some(t.to_string()),
                })
                .collect(),
            ..Default::default()
        };
        Group::from_description(description).0
    }

    #[test]
    fn test_one_on_demand_three_spot() {
        let mut g = group(&["m5.large"; 4], Some(4));
        g.policy.enabled = true;
        g.policy.min_on_demand_count = 1;

        let p = project(&g, REGION, &catalog()).unwrap();
        assert_eq!(p.keep_on_demand, 1);
        assert!((p.costs.hourly_cost - 4.00).abs() < 1e-9);
        assert!((p.costs.projected_hourly_cost - 1.90).abs() < 1e-9);
        assert!((p.costs.projected_hourly_savings - 2.10).abs() < 1e-9);
        assert_eq!(p.instances[0].purchase, Purchase::OnDemand);
        assert!(p.instances[1..].iter().all(|i| i.purchase == Purchase::Spot));
    }

    #[test]
    fn test_projection_ignores_enabled_flag() {
        let mut g = group(&["m5.large"; 4], Some(4));
        g.policy.min_on_demand_count = 1;
        let disabled = project(&g, REGION, &catalog()).unwrap();
        g.policy.enabled = true;
        let enabled = project(&g, REGION, &catalog()).unwrap();
        assert_eq!(disabled.costs, enabled.costs);
    }

    #[test]
    fn test_percentage_uses_desired_capacity_not_instance_count() {
        // Two running instances, desired capacity 4: 50% keeps two on-demand.
        let mut g = group(&["m5.large"; 2], Some(4));
        g.policy.min_on_demand_percent = 50.0;
        let p = project(&g, REGION, &catalog()).unwrap();
        assert_eq!(p.keep_on_demand, 2);
        assert_eq!(p.costs.projected_hourly_savings, 0.0);
    }

    #[test]
    fn test_ordinal_order_decides_on_demand_instances() {
        let mut g = group(&["c5.large", "m5.large"], Some(2));
        g.policy.min_on_demand_count = 1;
        let p = project(&g, REGION, &catalog()).unwrap();
        assert!((p.costs.projected_hourly_cost - (0.50 + 0.30)).abs() < 1e-9);
        assert!((p.costs.projected_hourly_savings - 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_missing_price_skips_instance_with_warning() {
        let g = group(&["m5.large", "x9.huge", "m5.large"], Some(3));
        let p = project(&g, REGION, &catalog()).unwrap();
        assert_eq!(p.instances.len(), 2);
        assert_eq!(p.warnings.len(), 1);
        assert!(matches!(
            &p.warnings[0],
            DataWarning::MissingPrice { ordinal: 1, instance_type, .. } if instance_type == "x9.huge"
        ));
        assert!((p.costs.hourly_cost - 2.00).abs() < 1e-9);
        // Skipped instance still occupies its ordinal slot.
        assert_eq!(p.instances[1].ordinal, 2);
    }

    #[test]
    fn test_missing_desired_capacity_is_unavailable() {
        let g = group(&["m5.large"], None);
        let err = project(&g, REGION, &catalog()).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::MissingDesiredCapacity {
                group: "workers".to_string()
            }
        );
    }

    #[test]
    fn test_missing_instance_type_is_unavailable() {
        let mut g = group(&["m5.large", "m5.large"], Some(2));
        g.instances[1].instance_type = None;
        let err = project(&g, REGION, &catalog()).unwrap_err();
        assert!(matches!(err, ProjectionError::MissingInstanceType { ordinal: 1, .. }));
    }

    #[test]
    fn test_empty_group_costs_nothing() {
        let g = group(&[], Some(0));
        let p = project(&g, REGION, &catalog()).unwrap();
        assert_eq!(p.costs, GroupCosts::default());
        assert_eq!(p.costs.savings_ratio(), None);
    }
}
