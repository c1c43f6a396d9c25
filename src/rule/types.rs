//! Declared semantic type tags
//!
//! The declared type drives literal coercion. It is independent of the
//! record's actual member type; the two are reconciled at compile time.

use std::fmt;
use std::str::FromStr;

/// Semantic type tag carried by a leaf rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    Long,
    /// Floating point
    Double,
    /// `true` / `false`
    Boolean,
    /// Text, passed through unchanged
    String,
    /// Calendar date (midnight timestamp)
    Date,
    /// Full timestamp
    DateTime,
    /// 128-bit unique identifier
    Guid,
}

impl DeclaredType {
    /// All declared types
    pub const ALL: [DeclaredType; 8] = [
        DeclaredType::Integer,
        DeclaredType::Long,
        DeclaredType::Double,
        DeclaredType::Boolean,
        DeclaredType::String,
        DeclaredType::Date,
        DeclaredType::DateTime,
        DeclaredType::Guid,
    ];

    /// Returns the tag as written in rules
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclaredType::Integer => "integer",
            DeclaredType::Long => "long",
            DeclaredType::Double => "double",
            DeclaredType::Boolean => "boolean",
            DeclaredType::String => "string",
            DeclaredType::Date => "date",
            DeclaredType::DateTime => "datetime",
            DeclaredType::Guid => "guid",
        }
    }

    /// Parse a tag, ignoring ASCII case
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(tag))
    }

    /// Returns true if ordering operators apply to this type
    pub fn is_orderable(&self) -> bool {
        matches!(
            self,
            DeclaredType::Integer
                | DeclaredType::Long
                | DeclaredType::Double
                | DeclaredType::Date
                | DeclaredType::DateTime
        )
    }

    /// Returns true for the numeric tags
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DeclaredType::Integer | DeclaredType::Long | DeclaredType::Double
        )
    }
}

impl Default for DeclaredType {
    fn default() -> Self {
        DeclaredType::String
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclaredType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown type '{s}'"))
    }
}
