// SPDX-License-Identifier: Apache-2.0
//! Textual classification of QASM circuit descriptions.
//!
//! The classifier does not parse the program. It runs a single linear scan
//! for the fixed set of markers that indicate measurement-conditioned
//! (feed-forward) operations and reports what it saw through a
//! [`DiagnosticSink`]. Any byte sequence is valid input.

use std::fmt;
use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, MatchKind};
use serde::Serialize;
use tracing::{info, warn};

/// Label of the advisory optimization pass acknowledged on every validation.
pub const OPTIMIZATION_PASS: &str = "O3";

/// Marker automaton, pattern ids follow [`Marker::ALL`].
static MARKER_AUTOMATON: LazyLock<Option<AhoCorasick>> = LazyLock::new(|| {
    let patterns = Marker::ALL.map(Marker::pattern);
    match AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostFirst)
        .build(patterns)
    {
        Ok(ac) => Some(ac),
        Err(e) => {
            warn!("marker automaton build failed; using sequential scan ({e})");
            None
        }
    }
});

/// Borrowed view of a circuit description supplied by the caller.
///
/// Holds bytes rather than `&str`: text arriving over the C boundary is not
/// guaranteed to be UTF-8 and the classifier does not need it to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitSource<'a> {
    bytes: &'a [u8],
}

impl<'a> CircuitSource<'a> {
    /// Wrap raw bytes.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// The underlying bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl<'a> From<&'a str> for CircuitSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for CircuitSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

/// A syntactic marker of classically-controlled execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// Operation conditioned on a classical register (`c_if`).
    ClassicalConditional,
    /// Generic conditional statement (`if (`).
    GenericConditional,
}

impl Marker {
    /// Every marker, in match-priority order.
    pub const ALL: [Marker; 2] = [Marker::ClassicalConditional, Marker::GenericConditional];

    /// The literal, case-sensitive text this marker matches.
    pub const fn pattern(self) -> &'static str {
        match self {
            Marker::ClassicalConditional => "c_if",
            Marker::GenericConditional => "if (",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

/// The fact that dynamic control flow markers are present.
///
/// Records the leftmost marker occurrence in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlFlowFinding {
    /// Which marker matched.
    pub marker: Marker,
    /// Byte offset of the match.
    pub offset: usize,
}

/// `OpenQASM` dialect announced by the program header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QasmVersion {
    /// `OPENQASM 2.x`
    V2,
    /// `OPENQASM 3.x`
    V3,
    /// No header, or a version this bridge does not recognise.
    Unknown,
}

impl fmt::Display for QasmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QasmVersion::V2 => f.write_str("OpenQASM 2"),
            QasmVersion::V3 => f.write_str("OpenQASM 3"),
            QasmVersion::Unknown => f.write_str("unknown"),
        }
    }
}

/// A single report event produced during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Validation started on a source of `bytes` length.
    ValidationStarted { bytes: usize, version: QasmVersion },
    /// Feed-forward control flow was detected.
    DynamicControlFlow(ControlFlowFinding),
    /// The advisory optimization pass was acknowledged. No transformation
    /// takes place.
    OptimizationAcknowledged { pass: &'static str },
}

/// Receiver for validation diagnostics.
///
/// Implementations must tolerate concurrent `emit` calls; ordering between
/// different validations is not significant.
pub trait DiagnosticSink: Send + Sync {
    /// Report one diagnostic.
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Sink that forwards diagnostics to `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::ValidationStarted { bytes, version } => {
                info!(bytes, version = %version, "Validating QASM circuit");
            }
            Diagnostic::DynamicControlFlow(finding) => {
                info!(
                    marker = %finding.marker,
                    offset = finding.offset,
                    "Dynamic control flow detected (feed-forward)"
                );
            }
            Diagnostic::OptimizationAcknowledged { pass } => {
                info!(pass, "Circuit optimized using {} pass", pass);
            }
        }
    }
}

/// Outcome of a validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Length of the scanned source in bytes.
    pub bytes: usize,
    /// Dialect from the header.
    pub version: QasmVersion,
    /// Leftmost control flow marker, if any.
    pub finding: Option<ControlFlowFinding>,
}

impl ValidationReport {
    /// Check whether dynamic control flow markers were found.
    pub fn has_dynamic_control_flow(&self) -> bool {
        self.finding.is_some()
    }
}

/// Find the leftmost control flow marker in `source`.
pub fn find_control_flow(source: CircuitSource<'_>) -> Option<ControlFlowFinding> {
    let haystack = source.as_bytes();
    match MARKER_AUTOMATON.as_ref() {
        Some(ac) => ac.find(haystack).map(|m| ControlFlowFinding {
            marker: Marker::ALL[m.pattern().as_usize()],
            offset: m.start(),
        }),
        None => sequential_scan(haystack),
    }
}

/// Literal fallback with the same leftmost-first semantics as the automaton.
fn sequential_scan(haystack: &[u8]) -> Option<ControlFlowFinding> {
    Marker::ALL
        .iter()
        .filter_map(|&marker| {
            let needle = marker.pattern().as_bytes();
            haystack
                .windows(needle.len())
                .position(|window| window == needle)
                .map(|offset| ControlFlowFinding { marker, offset })
        })
        // min_by_key keeps the first of equal offsets, i.e. priority order.
        .min_by_key(|finding| finding.offset)
}

/// Read the `OPENQASM <major>` header, if present.
pub fn sniff_version(source: CircuitSource<'_>) -> QasmVersion {
    const HEADER: &[u8] = b"OPENQASM";

    let text = source.as_bytes().trim_ascii_start();
    let Some(rest) = text.strip_prefix(HEADER) else {
        return QasmVersion::Unknown;
    };
    // Require a separator so `OPENQASMX` is not taken as a header.
    if !rest.first().is_some_and(u8::is_ascii_whitespace) {
        return QasmVersion::Unknown;
    }
    let rest = rest.trim_ascii_start();
    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    match &rest[..digits] {
        b"2" => QasmVersion::V2,
        b"3" => QasmVersion::V3,
        _ => QasmVersion::Unknown,
    }
}

/// Validate `source`, reporting through `sink`.
///
/// Emits `ValidationStarted`, then `DynamicControlFlow` exactly once if any
/// marker is present, then `OptimizationAcknowledged`. Never fails.
pub fn validate_circuit_with<'a>(
    source: impl Into<CircuitSource<'a>>,
    sink: &dyn DiagnosticSink,
) -> ValidationReport {
    let source = source.into();
    let version = sniff_version(source);

    sink.emit(&Diagnostic::ValidationStarted {
        bytes: source.len(),
        version,
    });

    let finding = find_control_flow(source);
    if let Some(finding) = finding {
        sink.emit(&Diagnostic::DynamicControlFlow(finding));
    }

    sink.emit(&Diagnostic::OptimizationAcknowledged {
        pass: OPTIMIZATION_PASS,
    });

    ValidationReport {
        bytes: source.len(),
        version,
        finding,
    }
}

/// Validate `source`, reporting through [`TracingSink`].
pub fn validate_circuit<'a>(source: impl Into<CircuitSource<'a>>) -> ValidationReport {
    validate_circuit_with(source, &TracingSink)
}
