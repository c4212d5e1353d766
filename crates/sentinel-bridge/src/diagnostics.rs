// SPDX-License-Identifier: Apache-2.0
//! Diagnostic output configuration.
//!
//! The bridge logs through `tracing` and never installs a subscriber on its
//! own. A host that wants the classifier's reports on stderr calls
//! [`init_diagnostics`] once (or `sentinel_init_diagnostics` over the C ABI).
//! Configuration comes from the host only; no environment variables are read.

use serde::Deserialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::error::{BridgeError, BridgeResult};

/// Diagnostic output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsFormat {
    /// Human-readable multi-line output.
    #[default]
    Console,
    /// One JSON object per event.
    Json,
}

/// Diagnostics configuration supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Filter directive (e.g. "info", "sentinel_bridge=debug").
    pub log_level: String,
    /// Output format.
    pub format: DiagnosticsFormat,
    /// Include the event target in each line.
    pub with_target: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: DiagnosticsFormat::Console,
            with_target: true,
        }
    }
}

impl DiagnosticsConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> BridgeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn filter(&self) -> BridgeResult<EnvFilter> {
        EnvFilter::try_new(&self.log_level)
            .map_err(|e| BridgeError::InvalidFilter(format!("'{}': {e}", self.log_level)))
    }
}

/// Install the process-wide tracing subscriber.
///
/// Output goes to stderr. Fails if the filter does not parse or a global
/// subscriber is already set.
pub fn init_diagnostics(config: &DiagnosticsConfig) -> BridgeResult<()> {
    let filter = config.filter()?;

    let fmt_layer = match config.format {
        DiagnosticsFormat::Console => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.with_target)
            .pretty()
            .boxed(),
        DiagnosticsFormat::Json => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.with_target)
            .json()
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| BridgeError::DiagnosticsAlreadyInstalled(e.to_string()))?;

    tracing::debug!(
        log_level = %config.log_level,
        format = ?config.format,
        "Diagnostics installed"
    );
    Ok(())
}
