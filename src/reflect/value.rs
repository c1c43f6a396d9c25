//! Runtime view of reflected record data
//!
//! A [`Value`] borrows from the record it was read from, so walking nested
//! objects and maps never clones record data. Lists are materialized as a
//! vector of borrowed element views.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDateTime;
use uuid::Uuid;

use super::shape::{FieldType, Shape};

/// A record type whose members can be read by name
pub trait Reflect {
    /// Static descriptor of the record type
    fn shape() -> Shape
    where
        Self: Sized;

    /// Read a declared member.
    ///
    /// Returns `None` only for names the shape does not declare.
    fn member(&self, name: &str) -> Option<Value<'_>>;

    /// Indexer access (`record[key]`), for shapes that declare an indexer
    fn index(&self, _key: &str) -> Option<Value<'_>> {
        None
    }
}

/// A member type with a static descriptor and a runtime view
pub trait Typed {
    /// Static descriptor of this type
    fn field_type() -> FieldType
    where
        Self: Sized;

    /// Borrowed runtime view of this value
    fn to_value(&self) -> Value<'_>;
}

/// Keyed lookup into a mapping, with keys addressed as strings
pub trait MapAccess {
    /// Value stored under `key`
    fn get(&self, key: &str) -> Option<Value<'_>>;

    /// Returns true if `key` is present
    fn contains_key(&self, key: &str) -> bool;

    /// Number of entries
    fn len(&self) -> usize;

    /// Returns true if the mapping has no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runtime enum member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    /// Member name
    pub name: &'static str,
    /// Underlying numeric value
    pub value: i64,
}

/// Borrowed view of one field value
#[derive(Clone)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(Cow<'a, str>),
    DateTime(NaiveDateTime),
    Guid(Uuid),
    Enum(EnumValue),
    List(Vec<Value<'a>>),
    Map(&'a dyn MapAccess),
    Object(&'a dyn Reflect),
}

impl<'a> Value<'a> {
    /// Returns true for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the runtime kind name
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Text(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::Guid(_) => "guid",
            Value::Enum(_) => "enum",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    /// Numeric view (integers, doubles and enum values)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Double(d) => Some(*d),
            Value::Enum(e) => Some(e.value as f64),
            _ => None,
        }
    }

    /// Text rendering of a scalar value; `None` for null and composites
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Text(s) => Some(Cow::Borrowed(s.as_ref())),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Int(i) => Some(Cow::Owned(i.to_string())),
            Value::Double(d) => Some(Cow::Owned(d.to_string())),
            Value::DateTime(dt) => Some(Cow::Owned(dt.format("%Y-%m-%dT%H:%M:%S").to_string())),
            Value::Guid(g) => Some(Cow::Owned(g.hyphenated().to_string())),
            Value::Enum(e) => Some(Cow::Borrowed(e.name)),
            Value::Null | Value::List(_) | Value::Map(_) | Value::Object(_) => None,
        }
    }

    /// Element or entry count for strings and collections
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Text(s) => Some(s.chars().count()),
            Value::List(items) => Some(items.len()),
            Value::Map(map) => Some(map.len()),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Double(d) => write!(f, "Double({d})"),
            Value::Text(s) => write!(f, "Text({s:?})"),
            Value::DateTime(dt) => write!(f, "DateTime({dt})"),
            Value::Guid(g) => write!(f, "Guid({g})"),
            Value::Enum(e) => write!(f, "Enum({}={})", e.name, e.value),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Map(map) => write!(f, "Map(len={})", map.len()),
            Value::Object(_) => write!(f, "Object"),
        }
    }
}
