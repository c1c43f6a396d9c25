use std::fmt;
use std::sync::Arc;

use super::{Arity, Operator};
use crate::coercion::Literal;
use crate::reflect::Value;

/// A caller-supplied operator.
///
/// The operand literals are coerced to the rule's declared type (as many as
/// `arity` asks for) before `evaluate` sees them. A custom operator whose
/// name matches a built-in replaces the built-in.
pub trait CustomOperator: fmt::Debug + Send + Sync {
    /// Identifier used in rules
    fn name(&self) -> &str;

    /// Number of values consumed
    fn arity(&self) -> Arity {
        Arity::Single
    }

    /// Negated operators quantify with "all" over collections
    fn is_negated(&self) -> bool {
        false
    }

    /// Test one field value
    fn evaluate(&self, field: &Value<'_>, operands: &[Literal]) -> bool;
}

/// Result of resolving an operator identifier
#[derive(Debug, Clone)]
pub enum ResolvedOperator {
    Builtin(Operator),
    Custom(Arc<dyn CustomOperator>),
}

impl ResolvedOperator {
    /// Identifier of the resolved operator
    pub fn name(&self) -> &str {
        match self {
            ResolvedOperator::Builtin(op) => op.name(),
            ResolvedOperator::Custom(op) => op.name(),
        }
    }

    /// Number of values consumed
    pub fn arity(&self) -> Arity {
        match self {
            ResolvedOperator::Builtin(op) => op.arity(),
            ResolvedOperator::Custom(op) => op.arity(),
        }
    }

    /// Returns true for negated operators
    pub fn is_negated(&self) -> bool {
        match self {
            ResolvedOperator::Builtin(op) => op.is_negated(),
            ResolvedOperator::Custom(op) => op.is_negated(),
        }
    }
}

/// Resolves identifiers against custom operators first, then built-ins
#[derive(Debug, Clone, Copy)]
pub struct OperatorRegistry<'a> {
    custom: &'a [Arc<dyn CustomOperator>],
}

impl<'a> OperatorRegistry<'a> {
    /// Registry over the given custom operators
    pub fn new(custom: &'a [Arc<dyn CustomOperator>]) -> Self {
        Self { custom }
    }

    /// Registry with only the built-in operators
    pub fn builtin() -> OperatorRegistry<'static> {
        OperatorRegistry { custom: &[] }
    }

    /// Resolve an identifier, ignoring ASCII case
    pub fn resolve(&self, name: &str) -> Option<ResolvedOperator> {
        let name = name.trim();
        // Later registrations win, so callers can layer overrides
        self.custom
            .iter()
            .rev()
            .find(|op| op.name().eq_ignore_ascii_case(name))
            .map(|op| ResolvedOperator::Custom(Arc::clone(op)))
            .or_else(|| Operator::from_name(name).map(ResolvedOperator::Builtin))
    }
}
