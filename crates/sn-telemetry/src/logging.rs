//! Structured logging macros.
//!
//! Every pipeline log line carries the same field names so that log
//! shippers can index them: `component`, `topic`, `peer_id`, `hash`.

/// Log an event with the component name attached.
#[macro_export]
macro_rules! log_event {
    ($level:ident, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a peer-related event with standard fields.
#[macro_export]
macro_rules! log_peer_event {
    ($level:ident, $component:expr, $msg:expr, $peer_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            peer_id = %$peer_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log an intercepted-data event with topic, peer and data hash.
#[macro_export]
macro_rules! log_intercept_event {
    ($level:ident, $msg:expr, $topic:expr, $peer_id:expr, $hash:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = "interceptor",
            topic = %$topic,
            peer_id = %$peer_id,
            hash = %$hash,
            $($($field)*,)?
            $msg
        )
    };
}
