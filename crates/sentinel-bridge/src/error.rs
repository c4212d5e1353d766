// SPDX-License-Identifier: Apache-2.0
//! Error types for the bridge.

use std::os::raw::c_int;

use thiserror::Error;

use crate::ffi;

/// Errors that can occur at the bridge boundary.
///
/// The classifier and estimator themselves never fail; every variant here is
/// either a precondition violation on the C side or a diagnostics setup error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BridgeError {
    /// A required pointer argument was null.
    #[error("precondition violated: argument '{argument}' must not be null")]
    NullPointer { argument: &'static str },

    /// The log filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    /// The diagnostics configuration was not valid JSON for `DiagnosticsConfig`.
    #[error("invalid diagnostics config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// A global tracing subscriber has already been installed in this process.
    #[error("diagnostics already installed: {0}")]
    DiagnosticsAlreadyInstalled(String),
}

impl BridgeError {
    /// Convert into the status code returned across the C boundary.
    pub fn status_code(&self) -> c_int {
        match self {
            BridgeError::NullPointer { .. } => ffi::SENTINEL_ERROR_NULL_POINTER,
            BridgeError::InvalidFilter(_) => ffi::SENTINEL_ERROR_INVALID_FILTER,
            BridgeError::InvalidConfig(_) => ffi::SENTINEL_ERROR_INVALID_CONFIG,
            BridgeError::DiagnosticsAlreadyInstalled(_) => ffi::SENTINEL_ERROR_ALREADY_INSTALLED,
        }
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
