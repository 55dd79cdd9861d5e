//! # Progress Reporting
//!
//! The step-transition event stream a run produces. Callers subscribe a
//! sink to watch a run live, or pass [`NullSink`] and inspect the report's
//! trace afterwards — the core contract is the ordered sequence of step
//! records, not any particular callback shape.
//!
//! ## Sink Contract
//!
//! A sink is invoked once per transition with `(code, message, status)`,
//! and never more than twice for one step: `starting`, then exactly one
//! terminal status. The final summary notification arrives exactly once
//! per run.

use std::sync::Mutex;

use crate::step::{Status, StepCode, StepResult};

/// A recipient of step-transition notifications.
pub trait ProgressSink: Send + Sync {
    /// Called once per step transition.
    fn on_step(&self, code: StepCode, message: &str, status: Status);
}

/// A sink that ignores all notifications.
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_step(&self, _code: StepCode, _message: &str, _status: Status) {}
}

/// A sink that records every notification for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<StepResult>>,
}

impl CollectingSink {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of all events received so far, in arrival order.
    pub fn events(&self) -> Vec<StepResult> {
        self.events.lock().expect("collector poisoned").clone()
    }
}

impl ProgressSink for CollectingSink {
    fn on_step(&self, code: StepCode, message: &str, status: Status) {
        self.events
            .lock()
            .expect("collector poisoned")
            .push(StepResult::new(code, message, status));
    }
}

/// Closures are sinks: `|code, message, status| { ... }`.
impl<F> ProgressSink for F
where
    F: Fn(StepCode, &str, Status) + Send + Sync,
{
    fn on_step(&self, code: StepCode, message: &str, status: Status) {
        self(code, message, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_preserves_order() {
        let sink = CollectingSink::new();
        sink.on_step(StepCode::CheckingFormat, "start", Status::Starting);
        sink.on_step(StepCode::CheckingFormat, "ok", Status::Success);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].status, Status::Starting);
        assert_eq!(events[1].status, Status::Success);
    }

    #[test]
    fn test_closure_is_a_sink() {
        let count = std::sync::atomic::AtomicUsize::new(0);
        let sink = |_code: StepCode, _message: &str, _status: Status| {
            count.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        };
        sink.on_step(StepCode::Final, "done", Status::Success);
        assert_eq!(count.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
