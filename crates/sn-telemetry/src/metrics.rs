//! Prometheus metrics for the Shardnet pipeline.
//!
//! All metrics follow the naming convention: `sn_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., peers_blacklisted_total)
//! - **CounterVec**: Counter partitioned by labels (topic, outcome, kind)

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // INTERCEPTOR METRICS
    // =========================================================================

    /// Messages seen by interceptors, by final outcome
    pub static ref INTERCEPTED_MESSAGES: CounterVec = CounterVec::new(
        Opts::new("sn_interceptor_messages_total", "Messages handled by interceptors"),
        &["topic", "outcome"]  // outcome: accepted/partial/aborted/rejected
    ).expect("metric creation failed");

    /// Batch elements seen by interceptors, by outcome
    pub static ref INTERCEPTED_ELEMENTS: CounterVec = CounterVec::new(
        Opts::new("sn_interceptor_elements_total", "Batch elements handled by interceptors"),
        &["topic", "outcome"]  // outcome: committed/malformed/invalid/irrelevant/failed
    ).expect("metric creation failed");

    /// Messages refused because the throttler was full
    pub static ref THROTTLE_REJECTIONS: CounterVec = CounterVec::new(
        Opts::new("sn_throttler_rejections_total", "Messages dropped for lack of processing capacity"),
        &["topic"]
    ).expect("metric creation failed");

    // =========================================================================
    // ANTIFLOOD METRICS
    // =========================================================================

    /// Antiflood rejections by reason
    pub static ref ANTIFLOOD_REJECTIONS: CounterVec = CounterVec::new(
        Opts::new("sn_antiflood_rejections_total", "Messages refused by the antiflood handler"),
        &["reason"]  // reason: blacklisted/peer_quota/topic_quota
    ).expect("metric creation failed");

    /// Blacklist insertions and refreshes
    pub static ref PEERS_BLACKLISTED: Counter = Counter::new(
        "sn_antiflood_peers_blacklisted_total",
        "Total blacklist insertions"
    ).expect("metric creation failed");

    // =========================================================================
    // RESOLVER METRICS
    // =========================================================================

    /// Requests issued to peers
    pub static ref RESOLVER_REQUESTS_SENT: CounterVec = CounterVec::new(
        Opts::new("sn_resolver_requests_sent_total", "Requests sent to peers"),
        &["topic", "kind"]  // kind: hash/nonce/hash_array
    ).expect("metric creation failed");

    /// Responses served to peers
    pub static ref RESOLVER_RESPONSES_SENT: CounterVec = CounterVec::new(
        Opts::new("sn_resolver_responses_sent_total", "Responses sent to requesting peers"),
        &["topic"]
    ).expect("metric creation failed");

    /// Requests that could not be served from pool or storage
    pub static ref RESOLVER_NOT_FOUND: CounterVec = CounterVec::new(
        Opts::new("sn_resolver_not_found_total", "Requests for data absent locally"),
        &["topic"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Interceptors
        Box::new(INTERCEPTED_MESSAGES.clone()),
        Box::new(INTERCEPTED_ELEMENTS.clone()),
        Box::new(THROTTLE_REJECTIONS.clone()),
        // Antiflood
        Box::new(ANTIFLOOD_REJECTIONS.clone()),
        Box::new(PEERS_BLACKLISTED.clone()),
        // Resolvers
        Box::new(RESOLVER_REQUESTS_SENT.clone()),
        Box::new(RESOLVER_RESPONSES_SENT.clone()),
        Box::new(RESOLVER_NOT_FOUND.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
