//! Input validation utilities
//!
//! Checks user-supplied override values and region names before they reach
//! the estimation engine.

use crate::error::{EstimatorError, Result};

/// Commercial AWS regions the pricing catalog is expected to cover
pub const KNOWN_REGIONS: &[&str] = &[
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-south-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ca-central-1",
    "eu-central-1",
    "eu-north-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
];

/// Validate a region name
///
/// Names must look like `xx-direction-N`. Well-formed names outside
/// `KNOWN_REGIONS` are accepted with a warning since newer regions may be
/// present in the catalog.
pub fn validate_region(region: &str) -> Result<()> {
    let parts: Vec<&str> = region.split('-').collect();
    let well_formed = parts.len() >= 3
        && parts.iter().all(|p| !p.is_empty())
        && parts[..parts.len() - 1]
            .iter()
            .all(|p| p.chars().all(|c| c.is_ascii_lowercase()))
        && parts[parts.len() - 1].chars().all(|c| c.is_ascii_digit());

    if !well_formed {
        return Err(EstimatorError::Validation {
            field: "region".to_string(),
            reason: format!("Invalid AWS region name: {}", region),
        });
    }

    if !KNOWN_REGIONS.contains(&region) {
        tracing::warn!("Region {} is not in the known region list", region);
    }

    Ok(())
}

/// Validate an on-demand percentage override
pub fn validate_on_demand_percent(percent: f64) -> Result<f64> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(EstimatorError::Validation {
            field: "on_demand_percent".to_string(),
            reason: format!("Must be a number between 0 and 100, got: {}", percent),
        });
    }
    Ok(percent)
}

/// Parse an on-demand percentage override from CLI text
pub fn parse_on_demand_percent(value: &str) -> std::result::Result<f64, String> {
    let percent: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    validate_on_demand_percent(percent).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_region() {
        assert!(validate_region("us-east-1").is_ok());
        assert!(validate_region("ap-southeast-2").is_ok());
        // Well-formed but unknown: accepted
        assert!(validate_region("me-central-1").is_ok());
        assert!(validate_region("us-gov-west-1").is_ok());

        assert!(validate_region("").is_err());
        assert!(validate_region("useast1").is_err());
        assert!(validate_region("us-east-").is_err());
        assert!(validate_region("US-EAST-1").is_err());
    }

    #[test]
    fn test_validate_on_demand_percent() {
        assert_eq!(validate_on_demand_percent(0.0).unwrap(), 0.0);
        assert_eq!(validate_on_demand_percent(100.0).unwrap(), 100.0);
        assert!(validate_on_demand_percent(100.5).is_err());
        assert!(validate_on_demand_percent(-1.0).is_err());
        assert!(validate_on_demand_percent(f64::NAN).is_err());
    }

    #[test]
    fn test_parse_on_demand_percent() {
        assert_eq!(parse_on_demand_percent("25").unwrap(), 25.0);
        assert!(parse_on_demand_percent("abc").is_err());
        assert!(parse_on_demand_percent("101").is_err());
    }
}
