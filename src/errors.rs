//! Error types for rule compilation and predicate evaluation
//!
//! Error codes:
//! - QUERY_FIELD_UNRESOLVABLE (compile)
//! - QUERY_KEY_TYPE_UNSUPPORTED (compile)
//! - QUERY_COERCION_FAILED (compile)
//! - QUERY_UNKNOWN_OPERATOR (compile)
//! - QUERY_UNKNOWN_TYPE (compile)
//! - QUERY_OPERATOR_TYPE_MISMATCH (compile)
//! - QUERY_TYPE_MISMATCH (compile)
//! - QUERY_WRONG_ARITY (compile)
//! - QUERY_KEY_NOT_FOUND (evaluation)
//! - QUERY_NULL_REFERENCE (evaluation)
//!
//! Compile errors abort the whole compilation; no partial predicate is ever
//! returned. Evaluation errors surface on the record that triggered them.

use thiserror::Error;

/// Result type for compilation
pub type CompileResult<T> = Result<T, CompileError>;

/// Result type for predicate evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while turning a rule tree into a predicate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A path segment matched no member, mapping key or indexer
    #[error("field '{path}' cannot be resolved: nothing named '{segment}'")]
    UnresolvableField { path: String, segment: String },

    /// A mapping keyed by something other than strings was addressed by path
    #[error("field '{path}' addresses a map keyed by {key_type}; only string keys can be used in a path")]
    UnsupportedKeyType { path: String, key_type: String },

    /// A literal could not be converted to the declared type
    #[error("value {literal} for field '{field}' (operator '{operator}') is not a valid {declared_type}: {reason}")]
    Coercion {
        field: String,
        operator: String,
        declared_type: String,
        literal: String,
        reason: String,
    },

    /// Operator identifier not present in the registry
    #[error("unknown operator '{operator}' in rule for field '{field}'")]
    UnknownOperator { field: String, operator: String },

    /// Declared type tag not recognized
    #[error("unknown type '{type_tag}' in rule for field '{field}'")]
    UnknownType { field: String, type_tag: String },

    /// Ordering operator used with a type that has no ordering
    #[error("operator '{operator}' cannot be applied to {declared_type} values (field '{field}')")]
    OperatorTypeMismatch {
        field: String,
        operator: String,
        declared_type: String,
    },

    /// Declared type and the field's actual type cannot be reconciled
    #[error("field '{field}' of type {field_type} cannot be compared as {declared_type} with '{operator}': {reason}")]
    TypeMismatch {
        field: String,
        operator: String,
        declared_type: String,
        field_type: String,
        reason: String,
    },

    /// Operator received the wrong number of values
    #[error("operator '{operator}' on field '{field}' expects {expected} value(s), got {found}")]
    WrongArity {
        field: String,
        operator: String,
        expected: usize,
        found: usize,
    },
}

impl CompileError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::UnresolvableField { .. } => "QUERY_FIELD_UNRESOLVABLE",
            CompileError::UnsupportedKeyType { .. } => "QUERY_KEY_TYPE_UNSUPPORTED",
            CompileError::Coercion { .. } => "QUERY_COERCION_FAILED",
            CompileError::UnknownOperator { .. } => "QUERY_UNKNOWN_OPERATOR",
            CompileError::UnknownType { .. } => "QUERY_UNKNOWN_TYPE",
            CompileError::OperatorTypeMismatch { .. } => "QUERY_OPERATOR_TYPE_MISMATCH",
            CompileError::TypeMismatch { .. } => "QUERY_TYPE_MISMATCH",
            CompileError::WrongArity { .. } => "QUERY_WRONG_ARITY",
        }
    }

    /// Returns the field path of the offending rule
    pub fn field(&self) -> &str {
        match self {
            CompileError::UnresolvableField { path, .. }
            | CompileError::UnsupportedKeyType { path, .. } => path,
            CompileError::Coercion { field, .. }
            | CompileError::UnknownOperator { field, .. }
            | CompileError::UnknownType { field, .. }
            | CompileError::OperatorTypeMismatch { field, .. }
            | CompileError::TypeMismatch { field, .. }
            | CompileError::WrongArity { field, .. } => field,
        }
    }
}

/// Errors raised while applying a compiled predicate to a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Mapping lookup found no entry for the key
    #[error("key '{key}' not found while reading field '{path}'")]
    KeyNotFound { path: String, key: String },

    /// An intermediate hop was null and null guarding is disabled
    #[error("null reference at '{segment}' while reading field '{path}'")]
    NullReference { path: String, segment: String },
}

impl EvalError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            EvalError::KeyNotFound { .. } => "QUERY_KEY_NOT_FOUND",
            EvalError::NullReference { .. } => "QUERY_NULL_REFERENCE",
        }
    }

    /// Returns the field path being read when the error occurred
    pub fn path(&self) -> &str {
        match self {
            EvalError::KeyNotFound { path, .. } | EvalError::NullReference { path, .. } => path,
        }
    }
}
