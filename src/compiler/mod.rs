//! Predicate compiler
//!
//! Reduces a rule tree to a single immutable predicate over one record type.
//!
//! # Semantics
//!
//! - A missing rule, or a rule with neither children nor a field, matches
//!   every record
//! - Groups combine children left to right and short-circuit
//! - Leaves resolve their field, coerce their literal and reconcile both
//!   with the field's type before any record is seen
//! - Paths through collections match when any element passes (positive
//!   operators) or when every element passes (negated operators)
//!
//! A compiled predicate holds no mutable state and can be shared across
//! threads and applied to any number of records.

mod compare;
mod compile;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::errors::{CompileResult, EvalResult};
use crate::observability::{Event, ObservationScope};
use crate::options::CompileOptions;
use crate::query::Filtered;
use crate::reflect::{FieldType, Reflect};
use crate::resolver::{AccessorChain, Quantifier};
use crate::rule::Rule;

use compare::Check;
use compile::Compiler;

/// A compiled leaf: where to read, how to quantify, what to test
#[derive(Debug)]
pub(crate) struct Leaf {
    chain: AccessorChain,
    quantifier: Quantifier,
    check: Check,
}

/// Node of a compiled predicate
#[derive(Debug, Clone)]
pub(crate) enum Node {
    True,
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
    Leaf(Arc<Leaf>),
}

impl Node {
    fn evaluate(&self, record: &dyn Reflect) -> EvalResult<bool> {
        match self {
            Node::True => Ok(true),
            Node::And(children) => {
                for child in children {
                    if !child.evaluate(record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Node::Or(children) => {
                for child in children {
                    if child.evaluate(record)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Node::Not(inner) => Ok(!inner.evaluate(record)?),
            Node::Leaf(leaf) => leaf
                .chain
                .visit(record, leaf.quantifier, &|value| leaf.check.test(value)),
        }
    }
}

/// Compiled, reusable filter over records of type `T`
pub struct Predicate<T> {
    root: Arc<Node>,
    _record: PhantomData<fn(&T)>,
}

impl<T: Reflect> Predicate<T> {
    /// Compile a rule tree against `T`'s shape.
    ///
    /// A missing rule compiles to a predicate that matches everything.
    pub fn compile(rule: Option<&Rule>, options: &CompileOptions) -> CompileResult<Self> {
        let shape = T::shape();
        let scope = ObservationScope::new(Event::RuleCompileStart, &[("record", shape.name())]);

        let compiled = match rule {
            None => Ok(Node::True),
            Some(rule) => Compiler::new(options, FieldType::Object(T::shape)).compile(rule),
        };

        match compiled {
            Ok(root) => {
                scope.complete(Event::RuleCompileComplete);
                Ok(Self::from_node(root))
            }
            Err(err) => {
                scope.fail(Event::RuleCompileFailed, &format!("{}: {}", err.code(), err));
                Err(err)
            }
        }
    }

    /// Predicate that matches every record
    pub fn always() -> Self {
        Self::from_node(Node::True)
    }

    /// Returns true if this predicate matches every record without reading it
    pub fn is_always(&self) -> bool {
        matches!(*self.root, Node::True)
    }

    /// Apply the predicate to one record
    pub fn evaluate(&self, record: &T) -> EvalResult<bool> {
        self.root.evaluate(record)
    }

    /// Lazily filter a sequence of records (owned or borrowed)
    pub fn filter<I>(&self, records: I) -> Filtered<I::IntoIter, T>
    where
        I: IntoIterator,
    {
        Filtered::new(records.into_iter(), self.clone())
    }

    /// Both predicates must match; `self` is evaluated first
    pub fn and(&self, other: &Predicate<T>) -> Self {
        Self::from_node(Node::And(vec![
            self.root.as_ref().clone(),
            other.root.as_ref().clone(),
        ]))
    }

    /// Either predicate must match; `self` is evaluated first
    pub fn or(&self, other: &Predicate<T>) -> Self {
        Self::from_node(Node::Or(vec![
            self.root.as_ref().clone(),
            other.root.as_ref().clone(),
        ]))
    }

    /// Logical negation
    pub fn not(&self) -> Self {
        Self::from_node(Node::Not(Box::new(self.root.as_ref().clone())))
    }

    fn from_node(root: Node) -> Self {
        Self {
            root: Arc::new(root),
            _record: PhantomData,
        }
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("record", &std::any::type_name::<T>())
            .field("root", &self.root)
            .finish()
    }
}
