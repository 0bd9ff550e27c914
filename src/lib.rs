//! savings-estimator library
//!
//! Projects the cost of converting AWS AutoScaling Groups from on-demand to
//! Spot instances under a per-group on-demand floor, and encodes that policy as
//! the ASG tags read by the runtime optimizer.

pub mod config;
pub mod error;
pub mod estimator;
pub mod exit_codes;
pub mod pricing;
pub mod report;
pub mod validation;

// Re-export commonly used types
pub use error::{DataWarning, EstimatorError, ProjectionError, Result};
pub use estimator::{AggregateTotals, FeeSchedule, Group, GroupPolicy, PolicyEdit, Region};
pub use pricing::{Platform, Pricing, PricingCatalog};
