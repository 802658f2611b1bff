//! Intercepted-data debug handlers.

use parking_lot::Mutex;

use crate::domain::InterceptedData;
use crate::events::InterceptorError;
use crate::ports::InterceptedDebugger;

/// Default handler: does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledDebugger;

impl InterceptedDebugger for DisabledDebugger {
    fn log_received(&self, _topic: &str, _data: &InterceptedData) {}

    fn log_processed(&self, _topic: &str, _data: &InterceptedData, _error: Option<&InterceptorError>) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// One observation made by `RecordingDebugger`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugEvent {
    Received {
        topic: String,
        hash: String,
    },
    Processed {
        topic: String,
        hash: String,
        error: Option<String>,
    },
}

/// Keeps the most recent events in memory, for operators and tests.
#[derive(Debug)]
pub struct RecordingDebugger {
    capacity: usize,
    events: Mutex<Vec<DebugEvent>>,
}

impl RecordingDebugger {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<DebugEvent> {
        self.events.lock().clone()
    }

    fn push(&self, event: DebugEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.capacity {
            events.remove(0);
        }
        events.push(event);
    }
}

impl InterceptedDebugger for RecordingDebugger {
    fn log_received(&self, topic: &str, data: &InterceptedData) {
        self.push(DebugEvent::Received {
            topic: topic.to_string(),
            hash: data.hash_hex(),
        });
    }

    fn log_processed(&self, topic: &str, data: &InterceptedData, error: Option<&InterceptorError>) {
        self.push(DebugEvent::Processed {
            topic: topic.to_string(),
            hash: data.hash_hex(),
            error: error.map(ToString::to_string),
        });
    }

    fn is_enabled(&self) -> bool {
        true
    }
}
