// SPDX-License-Identifier: Apache-2.0
//! C ABI exported by the bridge library.
//!
//! The host owns every pointer passed in and keeps it valid for the duration
//! of the call; nothing is retained afterwards. Null arguments are precondition
//! violations: they are reported as an ERROR diagnostic (and, where the
//! function returns a status, as a negative code) and are never dereferenced.
//!
//! Diagnostics only reach a destination once a subscriber is installed, either
//! by the host's own `tracing` setup or through `sentinel_init_diagnostics`.
//! Without one, the ERROR for a null `validate_circuit` argument is dropped.
//! Hosts that need a guaranteed signal call `sentinel_has_dynamic_control_flow`,
//! which returns `SENTINEL_ERROR_NULL_POINTER` regardless of diagnostics setup.
//!
//! ```c
//! void     validate_circuit(const char *qasm_string);
//! double   estimate_observable(double theta);
//! int      sentinel_has_dynamic_control_flow(const char *qasm_string);
//! int      sentinel_init_diagnostics(const char *config_json);
//! uint32_t sentinel_abi_version(void);
//! ```

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

use tracing::error;

use crate::classifier::{self, CircuitSource};
use crate::diagnostics::{self, DiagnosticsConfig};
use crate::error::{BridgeError, BridgeResult};
use crate::estimator;

/// C ABI version. Bumped on any signature change.
pub const SENTINEL_ABI_VERSION: u32 = 1;

// ===========================================================================
// Status codes
// ===========================================================================

pub const SENTINEL_OK: c_int = 0;
pub const SENTINEL_ERROR_NULL_POINTER: c_int = -1;
pub const SENTINEL_ERROR_INVALID_FILTER: c_int = -2;
pub const SENTINEL_ERROR_INVALID_CONFIG: c_int = -3;
pub const SENTINEL_ERROR_ALREADY_INSTALLED: c_int = -4;

/// Borrow a NUL-terminated host string as a circuit source.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated buffer that stays valid
/// and unmodified for `'a`.
unsafe fn source_from_ptr<'a>(
    ptr: *const c_char,
    argument: &'static str,
) -> BridgeResult<CircuitSource<'a>> {
    if ptr.is_null() {
        return Err(BridgeError::NullPointer { argument });
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    let text = unsafe { CStr::from_ptr(ptr) };
    Ok(CircuitSource::from_bytes(text.to_bytes()))
}

/// Report a failed call and return its status code.
fn fail(err: &BridgeError) -> c_int {
    error!("{err}");
    err.status_code()
}

/// Validate a QASM program and report the findings as diagnostics.
///
/// A null `qasm_string` is reported as an ERROR diagnostic only, which is not
/// visible unless diagnostics are installed. Use
/// [`sentinel_has_dynamic_control_flow`] for a status code.
///
/// # Safety
///
/// `qasm_string` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn validate_circuit(qasm_string: *const c_char) {
    // SAFETY: forwarded caller contract.
    match unsafe { source_from_ptr(qasm_string, "qasm_string") } {
        Ok(source) => {
            classifier::validate_circuit(source);
        }
        Err(err) => {
            fail(&err);
        }
    }
}

/// Closed-form expectation value `sin(theta / 2)`.
#[unsafe(no_mangle)]
pub extern "C" fn estimate_observable(theta: f64) -> f64 {
    estimator::estimate_observable(theta)
}

/// Returns `1` if the program contains a control flow marker, `0` if not,
/// or `SENTINEL_ERROR_NULL_POINTER`. Emits no diagnostics on success.
///
/// # Safety
///
/// `qasm_string` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sentinel_has_dynamic_control_flow(qasm_string: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    match unsafe { source_from_ptr(qasm_string, "qasm_string") } {
        Ok(source) => c_int::from(classifier::find_control_flow(source).is_some()),
        Err(err) => fail(&err),
    }
}

/// Install stderr diagnostics from a JSON `DiagnosticsConfig`.
///
/// A null `config_json` selects the defaults. Returns `SENTINEL_OK` or a
/// negative status code.
///
/// # Safety
///
/// `config_json` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sentinel_init_diagnostics(config_json: *const c_char) -> c_int {
    let config = if config_json.is_null() {
        DiagnosticsConfig::default()
    } else {
        // SAFETY: non-null and NUL-terminated per the caller contract.
        let json = unsafe { CStr::from_ptr(config_json) }.to_string_lossy();
        match DiagnosticsConfig::from_json(&json) {
            Ok(config) => config,
            Err(err) => return fail(&err),
        }
    };

    match diagnostics::init_diagnostics(&config) {
        Ok(()) => SENTINEL_OK,
        Err(err) => fail(&err),
    }
}

/// Get the C ABI version, so hosts can check compatibility at load time.
#[unsafe(no_mangle)]
pub extern "C" fn sentinel_abi_version() -> u32 {
    SENTINEL_ABI_VERSION
}
