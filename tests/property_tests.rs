//! Property-based tests for savings-estimator
//!
//! These tests use proptest to generate random policies and groups and verify
//! that the projection and tag encoding invariants hold.

use proptest::prelude::*;
use savings_estimator::estimator::projection::{project, Purchase};
use savings_estimator::estimator::tags::{decode, encode};
use savings_estimator::estimator::{Group, GroupDescription, GroupPolicy, InstanceDescription, Region};
use savings_estimator::pricing::{Platform, Pricing, PricingCatalog};
use savings_estimator::FeeSchedule;
use std::collections::BTreeMap;
use std::sync::Arc;

const REGION: &str = "us-east-1";

fn two_decimal_percent() -> impl Strategy<Value = f64> {
    (0u32..=10_000u32).prop_map(|k| k as f64 / 100.0)
}

fn policy_strategy() -> impl Strategy<Value = GroupPolicy> {
    (
        any::<bool>(),
        0u64..1000,
        two_decimal_percent(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(enabled, count, percent, e, c, p)| GroupPolicy {
            enabled,
            min_on_demand_count: count,
            min_on_demand_percent: percent,
            enabled_was_explicit: e,
            count_was_explicit: c,
            percent_was_explicit: p,
        })
}

fn priced_group(instances: usize, desired: u64, policy: GroupPolicy) -> Group {
    let description = GroupDescription {
        name: "prop".to_string(),
        desired_capacity: Some(desired),
        platform: Some("Linux/UNIX".to_string()),
        instances: (0..instances)
            .map(|_| InstanceDescription {
                instance_id: None,
                instance_type: Some("m5.large".to_string()),
            })
            .collect(),
        ..Default::default()
    };
    let (mut group, _) = Group::from_description(description);
    group.policy = policy;
    group
}

fn catalog(on_demand: f64, spot: f64) -> PricingCatalog {
    let mut catalog = PricingCatalog::default();
    catalog
        .insert("m5.large", REGION, Platform::Linux, Pricing { on_demand, spot_min: spot })
        .unwrap();
    catalog
}

proptest! {
    #[test]
    fn test_percent_floor_keeps_leading_instances(
        desired in 0u64..200,
        percent in two_decimal_percent(),
    ) {
        let policy = GroupPolicy {
            min_on_demand_percent: percent,
            ..Default::default()
        };
        let expected = (desired as f64 * percent / 100.0).ceil() as u64;
        prop_assert_eq!(policy.keep_on_demand(desired), expected);

        let group = priced_group(desired as usize, desired, policy);
        let projection = project(&group, REGION, &catalog(1.0, 0.3)).unwrap();
        prop_assert_eq!(projection.keep_on_demand, expected);

        let on_demand = projection
            .instances
            .iter()
            .filter(|i| i.purchase == Purchase::OnDemand)
            .count() as u64;
        prop_assert_eq!(on_demand, expected.min(desired));
        for instance in &projection.instances {
            let leading = (instance.ordinal as u64) < expected;
            prop_assert_eq!(instance.purchase == Purchase::OnDemand, leading);
        }
    }

    #[test]
    fn test_count_wins_over_smaller_percent_floor(
        desired in 0u64..100,
        percent in two_decimal_percent(),
        extra in 1u64..50,
    ) {
        let floor = (desired as f64 * percent / 100.0).ceil() as u64;
        let policy = GroupPolicy {
            min_on_demand_count: floor + extra,
            min_on_demand_percent: percent,
            ..Default::default()
        };
        prop_assert_eq!(policy.keep_on_demand(desired), floor + extra);
    }

    #[test]
    fn test_projection_sums_balance(
        instances in 0usize..40,
        desired in 0u64..40,
        policy in policy_strategy(),
        on_demand in 0.0f64..10.0,
        spot in 0.0f64..10.0,
    ) {
        let group = priced_group(instances, desired, policy);
        let costs = project(&group, REGION, &catalog(on_demand, spot)).unwrap().costs;

        prop_assert!(costs.hourly_cost >= 0.0);
        prop_assert!(costs.projected_hourly_cost >= 0.0);
        prop_assert!(costs.projected_hourly_savings >= 0.0);
        let balance = costs.projected_hourly_cost + costs.projected_hourly_savings;
        prop_assert!((balance - costs.hourly_cost).abs() < 1e-6);
    }

    #[test]
    fn test_tag_round_trip(policy in policy_strategy()) {
        let (decoded, warnings) = decode(&encode(&policy));
        prop_assert!(warnings.is_empty());

        // Tags that were neither interesting nor explicit are not written, so
        // they come back as absent.
        let mut expected = policy.clone();
        expected.enabled_was_explicit = policy.enabled || policy.enabled_was_explicit;
        expected.count_was_explicit = policy.min_on_demand_count > 0 || policy.count_was_explicit;
        expected.percent_was_explicit = policy.min_on_demand_percent > 0.0 || policy.percent_was_explicit;
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn test_decoded_policies_round_trip_exactly(policy in policy_strategy()) {
        // A policy that came from tags records every non-default field as explicit.
        let (loaded, _) = decode(&encode(&policy));
        let (reloaded, _) = decode(&encode(&loaded));
        prop_assert_eq!(reloaded, loaded);
    }

    #[test]
    fn test_percent_always_clamped(raw in -1.0e6f64..1.0e6) {
        let tags: BTreeMap<String, String> = [(
            "autospotting_min_on_demand_percentage".to_string(),
            raw.to_string(),
        )]
        .into_iter()
        .collect();
        let (policy, _) = decode(&tags);
        prop_assert!((0.0..=100.0).contains(&policy.min_on_demand_percent));
    }

    #[test]
    fn test_aggregate_idempotent(
        sizes in prop::collection::vec((0usize..10, any::<bool>()), 0..8),
        multiplier in prop_oneof![Just(1.0f64), Just(730.0f64)],
    ) {
        let descriptions = sizes
            .iter()
            .enumerate()
            .map(|(i, (n, enabled))| GroupDescription {
                name: format!("asg-{}", i),
                desired_capacity: Some(*n as u64),
                platform: Some("Linux/UNIX".to_string()),
                instances: (0..*n)
                    .map(|_| InstanceDescription {
                        instance_id: None,
                        instance_type: Some("m5.large".to_string()),
                    })
                    .collect(),
                tags: vec![savings_estimator::estimator::TagDescription {
                    key: "spot-enabled".to_string(),
                    value: enabled.to_string(),
                }],
                ..Default::default()
            })
            .collect();
        let (region, _) = Region::load(REGION, Arc::new(catalog(0.2, 0.07)), descriptions);

        let fees = FeeSchedule::default();
        let first = region.aggregate(multiplier, &fees);
        let second = region.aggregate(multiplier, &fees);
        prop_assert_eq!(first, second);
        prop_assert!(first.service_fee <= first.projected_spot_savings);
        if first.current_monthly == 0.0 {
            prop_assert!(first.savings_ratio.is_none());
        }
    }
}
