//! Observability event sink - an optional, nullable collaborator
//!
//! The engine reports coarse lifecycle events (configuration changes,
//! training updates, persistence) to a sink if one is attached. The engine
//! never blocks on the sink and tolerates its absence entirely; sinks must
//! return quickly.

/// Receiver for engine observability events
pub trait EventSink: Send + Sync {
    /// Record one event under a category
    fn record_event(&self, category: &str, message: &str);
}

/// Sink that forwards events to the log
pub struct LogSink;

impl EventSink for LogSink {
    fn record_event(&self, category: &str, message: &str) {
        log::info!("[{}] {}", category, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingSink {
        events: Mutex<Vec<(String, String)>>,
    }

    impl EventSink for RecordingSink {
        fn record_event(&self, category: &str, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push((category.to_string(), message.to_string()));
        }
    }

    #[test]
    fn test_sink_receives_events() {
        let sink = RecordingSink {
            events: Mutex::new(Vec::new()),
        };
        sink.record_event("config", "applied");

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "config");
    }
}
