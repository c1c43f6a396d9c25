//! Static type descriptors for reflected records
//!
//! Supported field types:
//! - int: 32-bit (or narrower) integer
//! - long: 64-bit integer
//! - double: floating point
//! - bool, string, date, datetime, guid
//! - enum: named members with numeric values
//! - object: nested record with its own shape
//! - list: homogeneous sequence
//! - map: keyed mapping
//! - nullable: optional wrapper
//! - any: untyped value decided at evaluation time

use std::fmt;

/// Lazily built shape of a nested record type
pub type ShapeFn = fn() -> Shape;

/// Key type of a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// String keys, addressable from a field path
    String,
    /// Integer keys
    Integer,
    /// Any other key type, by name
    Other(&'static str),
}

impl KeyKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            KeyKind::String => "string",
            KeyKind::Integer => "integer",
            KeyKind::Other(name) => name,
        }
    }
}

/// Type descriptor of a record member
#[derive(Clone)]
pub enum FieldType {
    /// 32-bit (or narrower) integer
    Int,
    /// 64-bit integer
    Long,
    /// Floating point
    Double,
    /// Boolean
    Bool,
    /// UTF-8 string
    String,
    /// Calendar date, compared as midnight timestamps
    Date,
    /// Timestamp without offset
    DateTime,
    /// 128-bit unique identifier
    Guid,
    /// Enumeration: member names and their numeric values
    Enum(&'static [(&'static str, i64)]),
    /// Nested record
    Object(ShapeFn),
    /// Homogeneous sequence
    List(Box<FieldType>),
    /// Keyed mapping
    Map {
        key: KeyKind,
        value: Box<FieldType>,
    },
    /// Optional value of the inner type
    Nullable(Box<FieldType>),
    /// Untyped value, inspected at evaluation time
    Any,
}

impl FieldType {
    /// Wraps a type as nullable
    pub fn nullable(inner: FieldType) -> Self {
        match inner {
            FieldType::Nullable(_) | FieldType::Any => inner,
            other => FieldType::Nullable(Box::new(other)),
        }
    }

    /// Returns the type with any nullable wrapper removed
    pub fn non_null(&self) -> &FieldType {
        match self {
            FieldType::Nullable(inner) => inner.non_null(),
            other => other,
        }
    }

    /// Returns true if values of this type can be null
    pub fn is_nullable(&self) -> bool {
        matches!(self, FieldType::Nullable(_) | FieldType::Any)
    }

    /// Returns true for numeric, temporal and enum types
    pub fn is_orderable(&self) -> bool {
        matches!(
            self.non_null(),
            FieldType::Int
                | FieldType::Long
                | FieldType::Double
                | FieldType::Date
                | FieldType::DateTime
                | FieldType::Enum(_)
                | FieldType::Any
        )
    }

    /// Returns true for collection types (lists and maps)
    pub fn is_collection(&self) -> bool {
        matches!(self.non_null(), FieldType::List(_) | FieldType::Map { .. })
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> String {
        match self {
            FieldType::Int => "int".into(),
            FieldType::Long => "long".into(),
            FieldType::Double => "double".into(),
            FieldType::Bool => "bool".into(),
            FieldType::String => "string".into(),
            FieldType::Date => "date".into(),
            FieldType::DateTime => "datetime".into(),
            FieldType::Guid => "guid".into(),
            FieldType::Enum(_) => "enum".into(),
            FieldType::Object(shape) => format!("object {}", shape().name()),
            FieldType::List(element) => format!("list<{}>", element.type_name()),
            FieldType::Map { key, value } => {
                format!("map<{}, {}>", key.type_name(), value.type_name())
            }
            FieldType::Nullable(inner) => format!("{}?", inner.type_name()),
            FieldType::Any => "any".into(),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

/// A declared member of a record
#[derive(Debug, Clone)]
pub struct Member {
    /// Name used in field paths
    pub name: &'static str,
    /// Member type
    pub field_type: FieldType,
}

/// Descriptor of a record type
#[derive(Debug, Clone)]
pub struct Shape {
    name: &'static str,
    members: Vec<Member>,
    indexer: Option<FieldType>,
}

impl Shape {
    /// Create an empty shape
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            members: Vec::new(),
            indexer: None,
        }
    }

    /// Add a member
    pub fn member(mut self, name: &'static str, field_type: FieldType) -> Self {
        self.members.push(Member { name, field_type });
        self
    }

    /// Declare a string-keyed indexer returning `value_type`
    pub fn with_indexer(mut self, value_type: FieldType) -> Self {
        self.indexer = Some(value_type);
        self
    }

    /// Record type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared members, in declaration order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Indexer value type, if the record has one
    pub fn indexer(&self) -> Option<&FieldType> {
        self.indexer.as_ref()
    }

    /// Look up a member by exact name
    pub fn find(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}
