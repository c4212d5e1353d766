// SPDX-License-Identifier: Apache-2.0
//! # sentinel-bridge
//!
//! Native boundary exposing two stateless operations to a host process:
//!
//! - **Circuit classification**: scan a QASM program for markers of
//!   measurement-conditioned (feed-forward) control flow and report the
//!   findings as diagnostics.
//! - **Observable estimation**: the closed-form expectation value
//!   `sin(theta / 2)`.
//!
//! The library is built both as a `cdylib` (see [`ffi`] for the exported C
//! symbols) and as an `rlib` exposing the same operations as a safe API.
//!
//! ## Architecture
//!
//! ```text
//!             ┌──────────────────────────┐
//!             │       Host process       │
//!             └────────────┬─────────────┘
//!                          │ C ABI (extern "C")
//!             ┌────────────┴─────────────┐
//!             │  ffi                     │ ← null checks, status codes
//!             ├────────────┬─────────────┤
//!             │ classifier │ estimator   │ ← pure, no shared state
//!             └─────┬──────┴─────────────┘
//!                   │ DiagnosticSink
//!             ┌─────┴────────────────────┐
//!             │ tracing (diagnostics)    │ ← subscriber installed by host
//!             └──────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sentinel_bridge::{Marker, estimate_observable, validate_circuit};
//!
//! let qasm = r#"
//!     OPENQASM 3.0;
//!     qubit[2] q;
//!     bit[1] c;
//!     h q[0];
//!     c[0] = measure q[0];
//!     if (c[0] == 1) x q[1];
//! "#;
//!
//! let report = validate_circuit(qasm);
//! assert!(report.has_dynamic_control_flow());
//! assert_eq!(report.finding.unwrap().marker, Marker::GenericConditional);
//!
//! assert_eq!(estimate_observable(0.0), 0.0);
//! ```

pub mod classifier;
pub mod diagnostics;
pub mod error;
pub mod estimator;
pub mod ffi;

pub use classifier::{
    CircuitSource, ControlFlowFinding, Diagnostic, DiagnosticSink, Marker, QasmVersion,
    TracingSink, ValidationReport, find_control_flow, validate_circuit, validate_circuit_with,
};
pub use diagnostics::{DiagnosticsConfig, DiagnosticsFormat, init_diagnostics};
pub use error::{BridgeError, BridgeResult};
pub use estimator::estimate_observable;
