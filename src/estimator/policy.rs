//! Per-group Spot conversion policy

use crate::error::DataWarning;
use serde::{Deserialize, Serialize};

/// Spot conversion settings for one AutoScaling Group
///
/// The `*_was_explicit` flags record whether the matching tag was present when
/// the group was loaded. They are only ever set by tag decoding and are what
/// keeps an explicit `false`/`0` tag alive across a save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupPolicy {
    pub enabled: bool,
    pub min_on_demand_count: u64,
    pub min_on_demand_percent: f64,
    pub enabled_was_explicit: bool,
    pub count_was_explicit: bool,
    pub percent_was_explicit: bool,
}

impl GroupPolicy {
    /// Number of leading instances that stay on-demand for a desired capacity
    pub fn keep_on_demand(&self, desired_capacity: u64) -> u64 {
        let by_percent = (desired_capacity as f64 * self.min_on_demand_percent / 100.0).ceil();
        self.min_on_demand_count.max(by_percent as u64)
    }

    /// Apply an edit, returning true when a field actually changed
    pub fn apply(&mut self, edit: PolicyEdit) -> bool {
        match edit {
            PolicyEdit::SetEnabled(enabled) => replace(&mut self.enabled, enabled),
            PolicyEdit::SetMinOnDemandCount(count) => {
                replace(&mut self.min_on_demand_count, count)
            }
            PolicyEdit::SetMinOnDemandPercent(percent) => {
                replace(&mut self.min_on_demand_percent, clamp_percent(percent))
            }
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Clamp a percentage into [0, 100] at the two-decimal precision tags carry
///
/// NaN and negative zero become 0.
pub fn clamp_percent(percent: f64) -> f64 {
    let rounded = (percent * 100.0).round() / 100.0;
    if rounded.is_nan() || rounded <= 0.0 {
        0.0
    } else {
        rounded.min(100.0)
    }
}

/// A single policy mutation requested by the display layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PolicyEdit {
    SetEnabled(bool),
    SetMinOnDemandCount(u64),
    SetMinOnDemandPercent(f64),
}

/// Notification that a group's policy changed and its projection was refreshed
///
/// Returned to the caller instead of pushing into any display state; the caller
/// is expected to re-run aggregation after receiving one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyChange {
    pub group: String,
    pub before: GroupPolicy,
    pub after: GroupPolicy,
    /// Data-quality warnings raised by the refreshed projection
    pub warnings: Vec<DataWarning>,
}
