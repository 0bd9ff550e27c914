//! Policy tag encoding
//!
//! The runtime optimizer reads its per-group settings from three ASG tags.
//! Decoding records which tags were present so that encoding can keep an
//! explicit default (`spot-enabled=false`, a `0` count) instead of dropping it.
//!
//! Wire format: booleans as `true`/`false`, counts as decimal integers,
//! percentages as integers when integral and two-decimal text otherwise.

use crate::error::DataWarning;
use crate::estimator::policy::{clamp_percent, GroupPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

pub const ENABLED_TAG: &str = "spot-enabled";
pub const MIN_ON_DEMAND_NUMBER_TAG: &str = "autospotting_min_on_demand_number";
pub const MIN_ON_DEMAND_PERCENTAGE_TAG: &str = "autospotting_min_on_demand_percentage";

/// Resource type marker on every written tag
pub const RESOURCE_TYPE: &str = "auto-scaling-group";

/// Decode a policy from a group's tags
///
/// Unrelated tags are ignored. A recognized tag whose value does not parse
/// still counts as present; its field falls back to the default and a warning
/// is returned.
pub fn decode(tags: &BTreeMap<String, String>) -> (GroupPolicy, Vec<DataWarning>) {
    let mut policy = GroupPolicy::default();
    let mut warnings = Vec::new();

    if let Some(value) = tags.get(ENABLED_TAG) {
        policy.enabled_was_explicit = true;
        policy.enabled = parse_bool(value).unwrap_or_else(|| {
            warnings.push(unparsable(ENABLED_TAG, value));
            false
        });
    }

    if let Some(value) = tags.get(MIN_ON_DEMAND_NUMBER_TAG) {
        policy.count_was_explicit = true;
        policy.min_on_demand_count = value.trim().parse::<u64>().unwrap_or_else(|_| {
            warnings.push(unparsable(MIN_ON_DEMAND_NUMBER_TAG, value));
            0
        });
    }

    if let Some(value) = tags.get(MIN_ON_DEMAND_PERCENTAGE_TAG) {
        policy.percent_was_explicit = true;
        policy.min_on_demand_percent = match value.trim().parse::<f64>() {
            Ok(n) if !n.is_nan() => clamp_percent(n),
            _ => {
                warnings.push(unparsable(MIN_ON_DEMAND_PERCENTAGE_TAG, value));
                0.0
            }
        };
    }

    (policy, warnings)
}

/// Encode a policy into the tags that should be written back
///
/// A tag is emitted when its value is non-default or when it was present at
/// load time.
pub fn encode(policy: &GroupPolicy) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();

    if policy.enabled || policy.enabled_was_explicit {
        tags.insert(ENABLED_TAG.to_string(), policy.enabled.to_string());
    }

    if policy.min_on_demand_count > 0 || policy.count_was_explicit {
        tags.insert(
            MIN_ON_DEMAND_NUMBER_TAG.to_string(),
            policy.min_on_demand_count.to_string(),
        );
    }

    if policy.min_on_demand_percent > 0.0 || policy.percent_was_explicit {
        tags.insert(
            MIN_ON_DEMAND_PERCENTAGE_TAG.to_string(),
            format_percent(policy.min_on_demand_percent),
        );
    }

    tags
}

/// A tag ready to be written to an AutoScaling Group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTag {
    pub resource_id: String,
    pub resource_type: String,
    pub key: String,
    pub value: String,
    pub propagate_at_launch: bool,
}

/// Attach resource metadata to encoded tags for one group
///
/// Policy tags never propagate to launched instances.
pub fn materialize(group_name: &str, policy: &GroupPolicy) -> Vec<ResourceTag> {
    encode(policy)
        .into_iter()
        .map(|(key, value)| ResourceTag {
            resource_id: group_name.to_string(),
            resource_type: RESOURCE_TYPE.to_string(),
            key,
            value,
            propagate_at_launch: false,
        })
        .collect()
}

fn format_percent(percent: f64) -> String {
    if percent.fract() == 0.0 {
        format!("{:.0}", percent)
    } else {
        format!("{:.2}", percent)
    }
}

// Accepts the same spellings as the optimizer's own parser.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn unparsable(key: &str, value: &str) -> DataWarning {
    warn!("Ignoring unparsable tag value {}={:?}", key, value);
    DataWarning::UnparsableTag {
        key: key.to_string(),
        value: value.to_string(),
    }
}
