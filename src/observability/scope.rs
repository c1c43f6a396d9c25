//! ObservationScope for automatic begin/complete logging
//!
//! - Logs the begin event on creation
//! - Logs the complete event (with elapsed time) on `complete()`
//! - Logs the failed event on `fail()`
//! - Warns if dropped without either

use std::cell::Cell;
use std::time::Instant;

use super::events::Event;
use super::logger::Logger;

/// A scope that logs begin and complete events around a unit of work
///
/// ```ignore
/// let scope = ObservationScope::new(Event::RuleCompileStart, &[("record", "Person")]);
/// // ... compile ...
/// scope.complete(Event::RuleCompileComplete);
/// ```
pub struct ObservationScope {
    fields: Vec<(&'static str, String)>,
    timer: Timer,
    completed: Cell<bool>,
}

impl ObservationScope {
    /// Create a new observation scope, logging `begin` at TRACE level
    pub fn new(begin: Event, fields: &[(&'static str, &str)]) -> Self {
        Logger::trace(begin.as_str(), fields);

        Self {
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
            completed: Cell::new(false),
        }
    }

    /// Mark the scope as successfully completed
    pub fn complete(self, event: Event) {
        self.completed.set(true);
        let elapsed = self.timer.elapsed_us();
        let mut fields = self.field_refs();
        fields.push(("elapsed_us", elapsed.as_str()));
        Logger::trace(event.as_str(), &fields);
    }

    /// Mark the scope as failed with a reason
    pub fn fail(self, event: Event, reason: &str) {
        self.completed.set(true);
        let mut fields = self.field_refs();
        fields.push(("reason", reason));
        Logger::info(event.as_str(), &fields);
    }

    /// Check if the scope has been completed
    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.completed.get() {
            let mut fields = self.field_refs();
            fields.push(("reason", "scope dropped without completion"));
            Logger::warn("OBSERVATION_SCOPE_INCOMPLETE", &fields);
        }
    }
}

/// A simple duration timer
pub(crate) struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer
    pub(crate) fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed microseconds as a string
    pub(crate) fn elapsed_us(&self) -> String {
        self.start.elapsed().as_micros().to_string()
    }
}
