//! # Shardnet Telemetry
//!
//! Logging and metrics for the admission and resolver pipeline.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sn_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::for_component("seednode"))?;
//!     // Logs and metrics are now being collected
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SN_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `SN_JSON_LOGS` | `false` | JSON log lines |
//! | `SN_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `SN_SERVICE_NAME` | `shardnet` | Service name in log lines |

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, ANTIFLOOD_REJECTIONS, INTERCEPTED_ELEMENTS,
    INTERCEPTED_MESSAGES, PEERS_BLACKLISTED, RESOLVER_NOT_FOUND, RESOLVER_REQUESTS_SENT,
    RESOLVER_RESPONSES_SENT, THROTTLE_REJECTIONS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    tracing_setup::init_tracing(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
