//! Exit code standardization for savings-estimator
//!
//! ## Exit Code Convention
//!
//! - `0` = Success
//! - `1` = User error (invalid input, unknown group)
//! - `2` = System error (I/O, malformed input files)
//! - `3` = Configuration error

use crate::error::EstimatorError;

/// Standard exit codes
pub mod codes {
    /// User error (invalid input, validation failure)
    pub const USER_ERROR: i32 = 1;
    /// System error (file I/O, unreadable input data)
    pub const SYSTEM_ERROR: i32 = 2;
    /// Configuration error
    pub const CONFIG_ERROR: i32 = 3;
}

/// Map an EstimatorError to an appropriate exit code
pub fn exit_code_for_error(error: &EstimatorError) -> i32 {
    use EstimatorError::*;
    match error {
        Config(_) => codes::CONFIG_ERROR,

        Validation { .. } => codes::USER_ERROR,
        GroupNotFound(_) => codes::USER_ERROR,

        Catalog(_) => codes::SYSTEM_ERROR,
        Io(_) => codes::SYSTEM_ERROR,
        Json(_) => codes::SYSTEM_ERROR,
    }
}

/// Exit code for a top-level `anyhow` error
///
/// Looks through the context chain for an `EstimatorError`; anything else is a
/// system error.
pub fn exit_code_for_anyhow(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<EstimatorError>())
        .map(exit_code_for_error)
        .unwrap_or(codes::SYSTEM_ERROR)
}
