//! Pricing catalog
//!
//! Maps (instance type, region, platform) to the on-demand hourly price and the
//! lowest observed Spot hourly price. The catalog is built once per session and
//! is read-only afterwards; regions share it through an `Arc`.
//!
//! The on-disk layout mirrors the ec2-instances-info dataset: one entry per
//! instance type, with per-region, per-platform price points.

use crate::error::{EstimatorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Operating system product an instance is billed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "Linux/UNIX")]
    Linux,
    #[serde(rename = "Windows")]
    Windows,
    #[serde(rename = "Red Hat Enterprise Linux")]
    Rhel,
    #[serde(rename = "SUSE Linux")]
    Suse,
}

impl Platform {
    /// AWS platform-details text for this platform
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "Linux/UNIX",
            Platform::Windows => "Windows",
            Platform::Rhel => "Red Hat Enterprise Linux",
            Platform::Suse => "SUSE Linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux/unix" | "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            "red hat enterprise linux" | "rhel" => Ok(Platform::Rhel),
            "suse linux" | "sles" => Ok(Platform::Suse),
            _ => Err(EstimatorError::Validation {
                field: "platform".to_string(),
                reason: format!("Unsupported platform: {}", s),
            }),
        }
    }
}

/// Hourly price points for one (instance type, region, platform)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub on_demand: f64,
    pub spot_min: f64,
}

impl Pricing {
    /// Spot price used for projections, never above the on-demand price
    pub fn effective_spot(&self) -> f64 {
        self.spot_min.min(self.on_demand)
    }

    fn validate(&self, instance_type: &str, region: &str) -> Result<()> {
        for (name, value) in [("on_demand", self.on_demand), ("spot_min", self.spot_min)] {
            if !value.is_finite() || value < 0.0 {
                return Err(EstimatorError::Catalog(format!(
                    "{} price for {} in {} must be a non-negative number, got {}",
                    name, instance_type, region, value
                )));
            }
        }
        Ok(())
    }
}

/// Price points per platform within one region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionPricing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux: Option<Pricing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows: Option<Pricing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhel: Option<Pricing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sles: Option<Pricing>,
}

impl RegionPricing {
    pub fn for_platform(&self, platform: Platform) -> Option<Pricing> {
        match platform {
            Platform::Linux => self.linux,
            Platform::Windows => self.windows,
            Platform::Rhel => self.rhel,
            Platform::Suse => self.sles,
        }
    }

    fn entries(&self) -> impl Iterator<Item = &Pricing> {
        [&self.linux, &self.windows, &self.rhel, &self.sles]
            .into_iter()
            .flatten()
    }
}

/// One instance type as stored in the catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceTypePricing {
    pub instance_type: String,
    #[serde(default)]
    pub pricing: HashMap<String, RegionPricing>,
}

/// Read-only lookup from instance type and region to price points
#[derive(Debug, Clone, Default)]
pub struct PricingCatalog {
    entries: HashMap<(String, String), RegionPricing>,
}

impl PricingCatalog {
    /// Build a catalog, rejecting negative or non-finite prices
    pub fn from_entries(entries: Vec<InstanceTypePricing>) -> Result<Self> {
        let mut map = HashMap::new();
        for entry in entries {
            for (region, pricing) in entry.pricing {
                for price in pricing.entries() {
                    price.validate(&entry.instance_type, &region)?;
                }
                map.insert((entry.instance_type.clone(), region), pricing);
            }
        }
        Ok(Self { entries: map })
    }

    /// Parse a catalog from its JSON representation
    pub fn from_json(content: &str) -> Result<Self> {
        let entries: Vec<InstanceTypePricing> = serde_json::from_str(content)?;
        Self::from_entries(entries)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::debug!(
            "Loaded pricing catalog from {} ({} entries)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Prices for an instance type in a region on a given platform
    pub fn lookup(&self, instance_type: &str, region: &str, platform: Platform) -> Option<Pricing> {
        self.entries
            .get(&(instance_type.to_string(), region.to_string()))
            .and_then(|p| p.for_platform(platform))
    }

    /// Insert or replace the prices for one instance type in one region
    ///
    /// Only meant for building a catalog; once shared with a region it is
    /// never mutated.
    pub fn insert(
        &mut self,
        instance_type: &str,
        region: &str,
        platform: Platform,
        pricing: Pricing,
    ) -> Result<()> {
        pricing.validate(instance_type, region)?;
        let slot = self
            .entries
            .entry((instance_type.to_string(), region.to_string()))
            .or_default();
        match platform {
            Platform::Linux => slot.linux = Some(pricing),
            Platform::Windows => slot.windows = Some(pricing),
            Platform::Rhel => slot.rhel = Some(pricing),
            Platform::Suse => slot.sles = Some(pricing),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
