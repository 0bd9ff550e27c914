//! Region-wide cost totals

use crate::estimator::group::Group;
use serde::{Deserialize, Serialize};

/// Optimizer service charge, billed per whole step of monthly savings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Monthly savings covered by one billing step
    pub savings_step: f64,
    /// Charge per whole step
    pub fee_per_step: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            savings_step: 14.6,
            fee_per_step: 0.73,
        }
    }
}

impl FeeSchedule {
    pub fn fee_for(&self, savings: f64) -> f64 {
        if savings <= 0.0 || self.savings_step <= 0.0 {
            return 0.0;
        }
        (savings / self.savings_step).floor() * self.fee_per_step
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AggregateTotals {
    pub current_monthly: f64,
    pub projected_monthly: f64,
    pub projected_spot_savings: f64,
    /// Savings as a fraction of current cost; `None` when nothing is spent today
    pub savings_ratio: Option<f64>,
    pub service_fee: f64,
    pub net_savings: f64,
    /// Groups left out because their projection is unavailable
    pub unavailable_groups: usize,
}

/// Roll per-group projections up into region totals
///
/// Disabled groups contribute their current cost to the projected total and
/// nothing to savings.
pub fn aggregate(groups: &[Group], monthly_multiplier: f64, fees: &FeeSchedule) -> AggregateTotals {
    let mut totals = AggregateTotals::default();

    for group in groups {
        let Some(costs) = group.costs() else {
            totals.unavailable_groups += 1;
            continue;
        };

        totals.current_monthly += costs.hourly_cost * monthly_multiplier;
        if !group.policy.enabled {
            totals.projected_monthly += costs.hourly_cost * monthly_multiplier;
            continue;
        }
        totals.projected_monthly += costs.projected_hourly_cost * monthly_multiplier;
        totals.projected_spot_savings += costs.projected_hourly_savings * monthly_multiplier;
    }

    totals.service_fee = fees.fee_for(totals.projected_spot_savings);
    totals.savings_ratio = if totals.current_monthly > 0.0 {
        Some(totals.projected_spot_savings / totals.current_monthly)
    } else {
        None
    };
    totals.net_savings = totals.projected_spot_savings - totals.service_fee;

    totals
}
