//! Observability for rule compilation
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on compilation or evaluation
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use dynquery::observability::{Logger, Severity};
//!
//! // Once, at startup
//! Logger::set_min_severity(Severity::Trace);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

/// Log an event with fields; failures at INFO, everything else at TRACE
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_failure() {
        Severity::Info
    } else {
        Severity::Trace
    };
    Logger::log(severity, event.as_str(), fields);
}
