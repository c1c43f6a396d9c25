//! Accessor chains
//!
//! A chain is built once per leaf rule and walked once per record. Walking
//! never clones record data; every hop borrows from the record.

use std::fmt;

use crate::errors::{EvalError, EvalResult};
use crate::reflect::{FieldType, Reflect, Value};

/// One hop of an accessor chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Declared member of a record
    Member(&'static str),
    /// Entry of a string-keyed mapping
    Key(String),
    /// Indexer call on a record
    Index(String),
    /// Every element of a list
    Each,
    /// Member or key of an untyped value, looked up at evaluation time
    Dynamic(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Member(name) => f.write_str(name),
            Step::Key(key) => write!(f, "[{key:?}]"),
            Step::Index(key) => write!(f, "Item[{key:?}]"),
            Step::Each => f.write_str("[*]"),
            Step::Dynamic(name) => write!(f, "?{name}"),
        }
    }
}

/// How a test combines over the elements of a collection hop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// At least one element must pass
    Any,
    /// Every element must pass (vacuously true when empty)
    All,
}

/// Resolved path from a record to a target field
#[derive(Debug, Clone)]
pub struct AccessorChain {
    path: String,
    steps: Vec<Step>,
    target: FieldType,
    null_guard: bool,
}

impl AccessorChain {
    pub(crate) fn new(path: String, steps: Vec<Step>, target: FieldType, null_guard: bool) -> Self {
        Self {
            path,
            steps,
            target,
            null_guard,
        }
    }

    /// Dotted path this chain was resolved from
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Static type of the value the chain yields
    pub fn target(&self) -> &FieldType {
        &self.target
    }

    /// Returns true if the chain passes through a collection
    pub fn has_collection_hop(&self) -> bool {
        self.steps.iter().any(|step| *step == Step::Each)
    }

    /// Extend a chain ending at a list so it yields the list's elements
    pub fn through_elements(mut self) -> Self {
        if let FieldType::List(element) = self.target.non_null() {
            let element = element.as_ref().clone();
            self.steps.push(Step::Each);
            self.target = element;
        }
        self
    }

    /// Walk the chain on a record and apply `test` to the target value(s)
    pub fn visit(
        &self,
        record: &dyn Reflect,
        quantifier: Quantifier,
        test: &dyn Fn(&Value<'_>) -> bool,
    ) -> EvalResult<bool> {
        self.walk(Value::Object(record), &self.steps, quantifier, test)
    }

    fn walk(
        &self,
        value: Value<'_>,
        steps: &[Step],
        quantifier: Quantifier,
        test: &dyn Fn(&Value<'_>) -> bool,
    ) -> EvalResult<bool> {
        let Some((step, rest)) = steps.split_first() else {
            return Ok(test(&value));
        };

        // Untyped data: absent members and null parents read as null, and
        // lists are quantified over transparently
        if let Step::Dynamic(name) = step {
            let next = match &value {
                Value::Object(record) => record.member(name).or_else(|| record.index(name)),
                Value::Map(map) => map.get(name),
                Value::List(items) => {
                    return self.quantify(items, steps, quantifier, test);
                }
                _ => None,
            };
            return match next {
                Some(next) => self.walk(next, rest, quantifier, test),
                None => Ok(test(&Value::Null)),
            };
        }

        if value.is_null() {
            return self.null_hop(step);
        }

        match (step, &value) {
            (Step::Each, Value::List(items)) => self.quantify(items, rest, quantifier, test),
            (Step::Member(name), Value::Object(record)) => match record.member(name) {
                Some(next) => self.walk(next, rest, quantifier, test),
                None => Ok(false),
            },
            (Step::Key(key), Value::Map(map)) => match map.get(key) {
                Some(next) => self.walk(next, rest, quantifier, test),
                None => Err(self.key_not_found(key)),
            },
            (Step::Index(key), Value::Object(record)) => match record.index(key) {
                Some(next) => self.walk(next, rest, quantifier, test),
                None => Err(self.key_not_found(key)),
            },
            _ => Ok(false),
        }
    }

    fn quantify(
        &self,
        items: &[Value<'_>],
        steps: &[Step],
        quantifier: Quantifier,
        test: &dyn Fn(&Value<'_>) -> bool,
    ) -> EvalResult<bool> {
        for item in items {
            let passed = self.walk(item.clone(), steps, quantifier, test)?;
            match quantifier {
                Quantifier::Any if passed => return Ok(true),
                Quantifier::All if !passed => return Ok(false),
                _ => {}
            }
        }
        Ok(quantifier == Quantifier::All)
    }

    fn null_hop(&self, step: &Step) -> EvalResult<bool> {
        if self.null_guard {
            Ok(false)
        } else {
            Err(EvalError::NullReference {
                path: self.path.clone(),
                segment: step.to_string(),
            })
        }
    }

    fn key_not_found(&self, key: &str) -> EvalError {
        EvalError::KeyNotFound {
            path: self.path.clone(),
            key: key.to_string(),
        }
    }
}
