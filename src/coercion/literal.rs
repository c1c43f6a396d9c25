use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use uuid::Uuid;

/// A rule literal coerced to its declared type
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Double(f64),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
    Guid(Uuid),
}

impl Literal {
    /// Returns the literal kind name
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Int(_) => "int",
            Literal::Double(_) => "double",
            Literal::Bool(_) => "bool",
            Literal::Text(_) => "string",
            Literal::DateTime(_) => "datetime",
            Literal::Guid(_) => "guid",
        }
    }

    /// Numeric view of integer and floating point literals
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Int(i) => Some(*i as f64),
            Literal::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Text rendering, as used when a literal meets a text field
    pub fn render(&self) -> String {
        match self {
            Literal::Int(i) => i.to_string(),
            Literal::Double(d) => d.to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Text(s) => s.clone(),
            Literal::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            Literal::Guid(g) => g.hyphenated().to_string(),
        }
    }

    /// Ordering between two literals of compatible kinds
    pub fn partial_order(&self, other: &Literal) -> Option<Ordering> {
        match (self, other) {
            (Literal::Int(a), Literal::Int(b)) => Some(a.cmp(b)),
            (Literal::DateTime(a), Literal::DateTime(b)) => Some(a.cmp(b)),
            (Literal::Text(a), Literal::Text(b)) => Some(a.cmp(b)),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Text(s) => write!(f, "{s:?}"),
            other => f.write_str(&other.render()),
        }
    }
}
