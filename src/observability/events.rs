//! Observable events emitted by the rule compiler
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Compilation of a rule tree begins
    RuleCompileStart,
    /// Compilation produced a predicate
    RuleCompileComplete,
    /// Compilation aborted with an error
    RuleCompileFailed,
    /// A leaf rule was compiled
    LeafCompiled,
    /// Applying a predicate to a record failed
    RuleEvaluationFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RuleCompileStart => "RULE_COMPILE_BEGIN",
            Event::RuleCompileComplete => "RULE_COMPILE_COMPLETE",
            Event::RuleCompileFailed => "RULE_COMPILE_FAILED",
            Event::LeafCompiled => "RULE_LEAF_COMPILED",
            Event::RuleEvaluationFailed => "RULE_EVALUATION_FAILED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::RuleCompileFailed | Event::RuleEvaluationFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
