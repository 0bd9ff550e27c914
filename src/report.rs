//! Estimate reports for display
//!
//! Builds a serializable snapshot of a region's projections and totals and
//! renders it either as JSON or as a table.

use crate::config::PricingInterval;
use crate::error::DataWarning;
use crate::estimator::{AggregateTotals, Group, Region};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color, Table};
use console::style;
use serde::Serialize;

/// One row per AutoScaling Group, prices scaled to the report interval
#[derive(Debug, Clone, Serialize)]
pub struct GroupRow {
    pub name: String,
    pub instance_types: Vec<String>,
    pub desired_capacity: Option<u64>,
    pub cost: Option<f64>,
    pub projected_cost: Option<f64>,
    pub projected_savings: Option<f64>,
    pub savings_percent: Option<f64>,
    pub on_demand_percent: f64,
    pub on_demand_number: u64,
    pub enabled: bool,
    pub unavailable: Option<String>,
}

impl GroupRow {
    pub fn from_group(group: &Group, multiplier: f64) -> Self {
        let costs = group.costs();
        Self {
            name: group.name.clone(),
            instance_types: group.instance_types.clone(),
            desired_capacity: group.desired_capacity,
            cost: costs.map(|c| c.hourly_cost * multiplier),
            projected_cost: costs.map(|c| c.projected_hourly_cost * multiplier),
            projected_savings: costs.map(|c| c.projected_hourly_savings * multiplier),
            savings_percent: costs.and_then(|c| c.savings_ratio()).map(|r| r * 100.0),
            on_demand_percent: group.policy.min_on_demand_percent,
            on_demand_number: group.policy.min_on_demand_count,
            enabled: group.policy.enabled,
            unavailable: group.unavailable_reason().map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionReport {
    pub region: String,
    pub interval: PricingInterval,
    pub generated_at: DateTime<Utc>,
    pub groups: Vec<GroupRow>,
    /// Always monthly, regardless of `interval`
    pub totals: AggregateTotals,
    pub warnings: Vec<DataWarning>,
}

impl RegionReport {
    pub fn build(
        region: &Region,
        interval: PricingInterval,
        multiplier: f64,
        totals: AggregateTotals,
        warnings: Vec<DataWarning>,
    ) -> Self {
        Self {
            region: region.name.clone(),
            interval,
            generated_at: Utc::now(),
            groups: region
                .groups()
                .iter()
                .map(|g| GroupRow::from_group(g, multiplier))
                .collect(),
            totals,
            warnings,
        }
    }
}

/// Format a price with four decimals below 1 and two otherwise
pub fn format_price(value: f64) -> String {
    if value < 1.0 {
        format!("{:.4}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Format a savings fraction as a whole percentage, "n/a" when undefined
pub fn format_savings_percent(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) => format!("{}%", (f * 100.0).trunc() as i64),
        None => "n/a".to_string(),
    }
}

pub fn render_table(report: &RegionReport) -> String {
    let mut table = Table::new();
    let unit = match report.interval {
        PricingInterval::Hourly => "$/h",
        PricingInterval::Monthly => "$/mo",
    };

    table.set_header(vec![
        "AutoScaling Group".to_string(),
        "Instance Type".to_string(),
        "Instances".to_string(),
        format!("Cost {}", unit),
        format!("Projected Cost {}", unit),
        format!("Projected Savings {}", unit),
        "Savings %".to_string(),
        "OnDemand %".to_string(),
        "OnDemand #".to_string(),
        "Enabled".to_string(),
    ]);

    for row in &report.groups {
        let price = |v: Option<f64>| v.map(format_price).unwrap_or_else(|| "-".to_string());
        let savings_pct = row
            .savings_percent
            .map(|p| format!("{}%", p.trunc() as i64))
            .unwrap_or_else(|| "n/a".to_string());
        let enabled_cell = if row.enabled {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Yellow)
        };
        let name_cell = if row.unavailable.is_some() {
            Cell::new(format!("{} (unavailable)", row.name)).fg(Color::Red)
        } else {
            Cell::new(&row.name)
        };

        table.add_row(vec![
            name_cell,
            Cell::new(row.instance_types.join(",")),
            Cell::new(
                row.desired_capacity
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(price(row.cost)),
            Cell::new(price(row.projected_cost)),
            Cell::new(price(row.projected_savings)),
            Cell::new(savings_pct),
            Cell::new(format!("{:.0}", row.on_demand_percent)),
            Cell::new(row.on_demand_number),
            enabled_cell,
        ]);
    }

    table.to_string()
}

pub fn render_totals(totals: &AggregateTotals) -> String {
    let lines = [
        ("Total current monthly costs", format!("{:.2}", totals.current_monthly)),
        ("Total projected monthly costs", format!("{:.2}", totals.projected_monthly)),
        (
            "Total projected Spot monthly savings",
            format!("{:.2}", totals.projected_spot_savings),
        ),
        (
            "Total projected Spot savings percentage",
            format_savings_percent(totals.savings_ratio),
        ),
        ("Optimizer charges", format!("{:.2}", totals.service_fee)),
        ("Total monthly net savings", format!("{:.2}", totals.net_savings)),
    ];

    let mut out = String::new();
    for (label, value) in lines {
        out.push_str(&format!("{:<42} {:>12}\n", label, value));
    }
    if totals.unavailable_groups > 0 {
        out.push_str(&format!(
            "{}\n",
            style(format!(
                "{} group(s) could not be costed and are excluded",
                totals.unavailable_groups
            ))
            .yellow()
        ));
    }
    out
}

pub fn print_text(report: &RegionReport) {
    println!("{}", "=".repeat(80));
    println!("Spot Savings Estimate: {}", report.region);
    println!("{}", "=".repeat(80));
    println!(
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    if report.groups.is_empty() {
        println!("No AutoScaling Groups found");
    } else {
        println!("{}", render_table(report));
    }
    println!();
    print!("{}", render_totals(&report.totals));

    if !report.warnings.is_empty() {
        println!();
        println!("{}", style("Data warnings:").yellow().bold());
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
}
