//! dynquery - Compiles declarative filter rules into typed record predicates
//!
//! A rule tree (field, operator, declared type, value, nested AND/OR groups)
//! is compiled once against a record type's reflected shape and applied to
//! any number of records.
//!
//! ```ignore
//! use dynquery::{compile_query, reflect_record, CompileOptions, Rule};
//!
//! struct Item { content_type_id: i32 }
//! reflect_record! { Item { "ContentTypeId" => content_type_id: i32 } }
//!
//! let rule = Rule::leaf("ContentTypeId", "in", "integer", serde_json::json!([1, 2]));
//! let matched = compile_query::<Item, _>(&items, Some(&rule), &CompileOptions::default())?
//!     .collect::<Result<Vec<_>, _>>()?;
//! ```

pub mod coercion;
pub mod compiler;
pub mod errors;
pub mod observability;
pub mod operators;
pub mod options;
pub mod query;
pub mod reflect;
pub mod resolver;
pub mod rule;

pub use compiler::Predicate;
pub use errors::{CompileError, CompileResult, EvalError, EvalResult};
pub use operators::{Arity, CustomOperator, Operator};
pub use options::CompileOptions;
pub use query::{compile_predicate, compile_query, Filtered};
pub use reflect::{FieldType, Reflect, Typed, Value};
pub use rule::{Condition, DeclaredType, Rule};
