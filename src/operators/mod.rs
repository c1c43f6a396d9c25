//! Operator registry
//!
//! Maps operator identifiers to comparison strategies. The 20 built-in
//! operators cover equality, ordering, ranges, membership, substring tests
//! and null/empty tests. Callers extend or override the registry with
//! [`CustomOperator`]s registered on the compile options.

mod registry;

pub use registry::{CustomOperator, OperatorRegistry, ResolvedOperator};

use std::fmt;
use std::str::FromStr;

/// How many literal values an operator consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No value (null and empty tests)
    None,
    /// Exactly one value
    Single,
    /// Exactly two values (range bounds)
    Pair,
    /// One or more values (membership sets)
    List,
}

/// Built-in operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    In,
    NotIn,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Between,
    NotBetween,
    BeginsWith,
    NotBeginsWith,
    Contains,
    NotContains,
    EndsWith,
    NotEndsWith,
    IsEmpty,
    IsNotEmpty,
    IsNull,
    IsNotNull,
}

impl Operator {
    /// All built-in operators
    pub const ALL: [Operator; 20] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::In,
        Operator::NotIn,
        Operator::Less,
        Operator::LessOrEqual,
        Operator::Greater,
        Operator::GreaterOrEqual,
        Operator::Between,
        Operator::NotBetween,
        Operator::BeginsWith,
        Operator::NotBeginsWith,
        Operator::Contains,
        Operator::NotContains,
        Operator::EndsWith,
        Operator::NotEndsWith,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    /// Returns the identifier as written in rules
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Equal => "equal",
            Operator::NotEqual => "not_equal",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Less => "less",
            Operator::LessOrEqual => "less_or_equal",
            Operator::Greater => "greater",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::Between => "between",
            Operator::NotBetween => "not_between",
            Operator::BeginsWith => "begins_with",
            Operator::NotBeginsWith => "not_begins_with",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::EndsWith => "ends_with",
            Operator::NotEndsWith => "not_ends_with",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
        }
    }

    /// Look up a built-in by identifier, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }

    /// Number of values the operator consumes
    pub fn arity(&self) -> Arity {
        match self {
            Operator::IsEmpty | Operator::IsNotEmpty | Operator::IsNull | Operator::IsNotNull => {
                Arity::None
            }
            Operator::Between | Operator::NotBetween => Arity::Pair,
            Operator::In | Operator::NotIn => Arity::List,
            _ => Arity::Single,
        }
    }

    /// Returns true for the negated forms.
    ///
    /// Negated operators quantify over collections with "all", positive ones
    /// with "any".
    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            Operator::NotEqual
                | Operator::NotIn
                | Operator::NotBetween
                | Operator::NotBeginsWith
                | Operator::NotContains
                | Operator::NotEndsWith
                | Operator::IsNotEmpty
                | Operator::IsNotNull
        )
    }

    /// Positive counterpart of a negated operator
    pub fn positive(&self) -> Operator {
        match self {
            Operator::NotEqual => Operator::Equal,
            Operator::NotIn => Operator::In,
            Operator::NotBetween => Operator::Between,
            Operator::NotBeginsWith => Operator::BeginsWith,
            Operator::NotContains => Operator::Contains,
            Operator::NotEndsWith => Operator::EndsWith,
            Operator::IsNotEmpty => Operator::IsEmpty,
            Operator::IsNotNull => Operator::IsNull,
            other => *other,
        }
    }

    /// Returns true for operators that need an ordered type
    pub fn requires_ordering(&self) -> bool {
        matches!(
            self,
            Operator::Less
                | Operator::LessOrEqual
                | Operator::Greater
                | Operator::GreaterOrEqual
                | Operator::Between
                | Operator::NotBetween
        )
    }

    /// Returns true for prefix, suffix and substring tests
    pub fn is_text_match(&self) -> bool {
        matches!(
            self.positive(),
            Operator::BeginsWith | Operator::Contains | Operator::EndsWith
        )
    }

    /// Returns true for tests on the field value itself rather than its
    /// elements (null and empty checks)
    pub fn is_presence_test(&self) -> bool {
        self.arity() == Arity::None
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown operator '{s}'"))
    }
}
