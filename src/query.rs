//! Query entry points
//!
//! `compile_predicate` returns a reusable predicate; `compile_query` applies
//! one to a sequence lazily. Both fail fast on any compile error.
//!
//! ```ignore
//! let rule = Rule::from_json(r#"{"field": "Age", "operator": "greater", "type": "integer", "value": 21}"#)?;
//! let adults: Vec<&Person> = compile_query::<Person, _>(&people, Some(&rule), &CompileOptions::default())?
//!     .collect::<Result<_, _>>()?;
//! ```

use std::borrow::Borrow;
use std::fmt;

use crate::compiler::Predicate;
use crate::errors::{CompileResult, EvalResult};
use crate::observability::{log_event, Event};
use crate::options::CompileOptions;
use crate::reflect::Reflect;
use crate::rule::Rule;

/// Compile a rule tree into a predicate over `T`
pub fn compile_predicate<T: Reflect>(
    rule: Option<&Rule>,
    options: &CompileOptions,
) -> CompileResult<Predicate<T>> {
    Predicate::compile(rule, options)
}

/// Compile a rule tree and lazily filter `records` with it.
///
/// Records may be owned or borrowed (anything that borrows as `T`). The
/// iterator yields `Err` for a record whose evaluation fails and keeps
/// going afterwards.
pub fn compile_query<T, I>(
    records: I,
    rule: Option<&Rule>,
    options: &CompileOptions,
) -> CompileResult<Filtered<I::IntoIter, T>>
where
    T: Reflect,
    I: IntoIterator,
    I::Item: Borrow<T>,
{
    let predicate = compile_predicate::<T>(rule, options)?;
    Ok(Filtered::new(records.into_iter(), predicate))
}

/// Lazy filtering iterator returned by [`compile_query`] and
/// [`Predicate::filter`]
pub struct Filtered<I, T> {
    records: I,
    predicate: Predicate<T>,
}

impl<I, T> Filtered<I, T> {
    pub(crate) fn new(records: I, predicate: Predicate<T>) -> Self {
        Self { records, predicate }
    }

    /// Predicate applied by this iterator
    pub fn predicate(&self) -> &Predicate<T> {
        &self.predicate
    }
}

impl<I, T> Iterator for Filtered<I, T>
where
    T: Reflect,
    I: Iterator,
    I::Item: Borrow<T>,
{
    type Item = EvalResult<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = self.records.next()?;
            match self.predicate.evaluate(Borrow::<T>::borrow(&record)) {
                Ok(true) => return Some(Ok(record)),
                Ok(false) => continue,
                Err(err) => {
                    log_event(
                        Event::RuleEvaluationFailed,
                        &[("code", err.code()), ("path", err.path())],
                    );
                    return Some(Err(err));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.records.size_hint();
        (0, upper)
    }
}

impl<I: fmt::Debug, T> fmt::Debug for Filtered<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filtered")
            .field("records", &self.records)
            .field("predicate", &self.predicate)
            .finish()
    }
}
