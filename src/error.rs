//! Error types for savings-estimator
//!
//! There are three error types: `EstimatorError` (main error enum),
//! `ConfigError` (configuration-specific) and `ProjectionError` (a group whose
//! projection cannot be computed).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `EstimatorError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling, converting at
//! the CLI boundary so error chains survive.
//!
//! The projection engine itself never fails hard. Data-quality problems (a price
//! missing from the catalog, a tag value that does not parse) are substituted
//! with defaults and reported as `DataWarning`s. Precondition problems (no
//! desired capacity, no platform) make a single group's projection unavailable
//! via `ProjectionError`; the rest of the region is still costed.
//!
//! ## When to Use Which Error
//!
//! - `ConfigError`: configuration parsing and validation issues
//!   - Automatically converted to `EstimatorError::Config` via `#[from]`
//!
//! - `Catalog`: pricing catalog input that cannot be used at all
//!
//! - `GroupNotFound`: a policy edit addressed a group the region does not have
//!
//! - `Validation`: user input validation failures (override values, regions)

use serde::Serialize;
use thiserror::Error;

/// Main error type for savings-estimator
#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pricing catalog error: {0}")]
    Catalog(String),

    #[error("AutoScaling Group not found: {0}")]
    GroupNotFound(String),

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown pricing interval: {0} (expected 'hourly' or 'monthly')")]
    UnknownInterval(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Reasons a group's projection is unavailable
///
/// These are reported instead of a zero cost so the display layer can tell
/// "costs nothing" apart from "could not be costed".
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ProjectionError {
    #[error("AutoScaling Group {group} has no desired capacity")]
    MissingDesiredCapacity { group: String },

    #[error("AutoScaling Group {group} has no known platform")]
    MissingPlatform { group: String },

    #[error("AutoScaling Group {group}: instance {ordinal} has no instance type")]
    MissingInstanceType { group: String, ordinal: usize },
}

/// Non-fatal data-quality problems surfaced to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// No catalog entry for an instance; it was left out of every sum
    MissingPrice {
        group: String,
        ordinal: usize,
        instance_type: String,
        region: String,
        platform: String,
    },
    /// A policy tag was present but its value did not parse
    UnparsableTag { key: String, value: String },
}

impl std::fmt::Display for DataWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataWarning::MissingPrice {
                group,
                ordinal,
                instance_type,
                region,
                platform,
            } => write!(
                f,
                "{}: no {} price for instance {} ({}) in {}",
                group, platform, ordinal, instance_type, region
            ),
            DataWarning::UnparsableTag { key, value } => {
                write!(f, "tag {}={:?} could not be parsed, using default", key, value)
            }
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EstimatorError>;
