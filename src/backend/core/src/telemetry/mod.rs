//! Telemetry: structured logging and metric descriptions.
//!
//! - **Logging**: `tracing` subscriber with JSON, pretty or compact output
//! - **Metrics**: descriptions for the counters the core records through the
//!   `metrics` facade. Installing a recorder is left to the host.
//!
//! # Example
//!
//! ```rust,no_run
//! use contacts_core::config::ObservabilityConfig;
//! use contacts_core::telemetry;
//!
//! telemetry::init(&ObservabilityConfig::default()).expect("Failed to initialize telemetry");
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{
    register_metrics, AUTHORIZATION_DECISIONS_TOTAL, ERRORS_TOTAL, SEED_RECORDS_TOTAL,
};

use crate::config::ObservabilityConfig;
use crate::error::Result;

/// Initialize logging and describe the core metrics.
///
/// Call once at startup. A second call fails because the global subscriber is
/// already installed.
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    register_metrics();
    init_logging(config)?;

    ::tracing::debug!(
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Telemetry initialized"
    );
    Ok(())
}
