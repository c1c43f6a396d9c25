//! `Typed` and `MapAccess` for standard, chrono, uuid and serde_json types

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use super::shape::{FieldType, KeyKind};
use super::value::{MapAccess, Typed, Value};

macro_rules! typed_integer {
    ($field_type:expr => $($t:ty),*) => {
        $(
            impl Typed for $t {
                fn field_type() -> FieldType {
                    $field_type
                }

                fn to_value(&self) -> Value<'_> {
                    Value::Int(i64::from(*self))
                }
            }
        )*
    };
}

typed_integer!(FieldType::Int => i8, i16, i32, u8, u16);
// Only types that widen losslessly into i64; u64 and usize are not reflected
typed_integer!(FieldType::Long => i64, u32);

impl Typed for f32 {
    fn field_type() -> FieldType {
        FieldType::Double
    }

    fn to_value(&self) -> Value<'_> {
        Value::Double(f64::from(*self))
    }
}

impl Typed for f64 {
    fn field_type() -> FieldType {
        FieldType::Double
    }

    fn to_value(&self) -> Value<'_> {
        Value::Double(*self)
    }
}

impl Typed for bool {
    fn field_type() -> FieldType {
        FieldType::Bool
    }

    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl Typed for String {
    fn field_type() -> FieldType {
        FieldType::String
    }

    fn to_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self.as_str()))
    }
}

impl Typed for NaiveDate {
    fn field_type() -> FieldType {
        FieldType::Date
    }

    fn to_value(&self) -> Value<'_> {
        Value::DateTime(self.and_time(NaiveTime::default()))
    }
}

impl Typed for NaiveDateTime {
    fn field_type() -> FieldType {
        FieldType::DateTime
    }

    fn to_value(&self) -> Value<'_> {
        Value::DateTime(*self)
    }
}

// Offset-bearing timestamps compare by their UTC wall clock
impl Typed for DateTime<Utc> {
    fn field_type() -> FieldType {
        FieldType::DateTime
    }

    fn to_value(&self) -> Value<'_> {
        Value::DateTime(self.naive_utc())
    }
}

impl Typed for DateTime<FixedOffset> {
    fn field_type() -> FieldType {
        FieldType::DateTime
    }

    fn to_value(&self) -> Value<'_> {
        Value::DateTime(self.naive_utc())
    }
}

impl Typed for Uuid {
    fn field_type() -> FieldType {
        FieldType::Guid
    }

    fn to_value(&self) -> Value<'_> {
        Value::Guid(*self)
    }
}

impl<T: Typed> Typed for Option<T> {
    fn field_type() -> FieldType {
        FieldType::nullable(T::field_type())
    }

    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: Typed> Typed for Box<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }

    fn to_value(&self) -> Value<'_> {
        self.as_ref().to_value()
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::List(Box::new(T::field_type()))
    }

    fn to_value(&self) -> Value<'_> {
        Value::List(self.iter().map(Typed::to_value).collect())
    }
}

impl<V: Typed, S: BuildHasher> Typed for HashMap<String, V, S> {
    fn field_type() -> FieldType {
        FieldType::Map {
            key: KeyKind::String,
            value: Box::new(V::field_type()),
        }
    }

    fn to_value(&self) -> Value<'_> {
        Value::Map(self)
    }
}

impl<V: Typed, S: BuildHasher> MapAccess for HashMap<String, V, S> {
    fn get(&self, key: &str) -> Option<Value<'_>> {
        HashMap::get(self, key).map(Typed::to_value)
    }

    fn contains_key(&self, key: &str) -> bool {
        HashMap::contains_key(self, key)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl<V: Typed> Typed for BTreeMap<String, V> {
    fn field_type() -> FieldType {
        FieldType::Map {
            key: KeyKind::String,
            value: Box::new(V::field_type()),
        }
    }

    fn to_value(&self) -> Value<'_> {
        Value::Map(self)
    }
}

impl<V: Typed> MapAccess for BTreeMap<String, V> {
    fn get(&self, key: &str) -> Option<Value<'_>> {
        BTreeMap::get(self, key).map(Typed::to_value)
    }

    fn contains_key(&self, key: &str) -> bool {
        BTreeMap::contains_key(self, key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

// Integer-keyed maps are described for error reporting; a path can never
// address them, but `contains` against the map root can.
impl<V: Typed, S: BuildHasher> Typed for HashMap<i64, V, S> {
    fn field_type() -> FieldType {
        FieldType::Map {
            key: KeyKind::Integer,
            value: Box::new(V::field_type()),
        }
    }

    fn to_value(&self) -> Value<'_> {
        Value::Map(self)
    }
}

impl<V: Typed, S: BuildHasher> MapAccess for HashMap<i64, V, S> {
    fn get(&self, key: &str) -> Option<Value<'_>> {
        let key: i64 = key.trim().parse().ok()?;
        HashMap::get(self, &key).map(Typed::to_value)
    }

    fn contains_key(&self, key: &str) -> bool {
        key.trim()
            .parse::<i64>()
            .map(|key| HashMap::contains_key(self, &key))
            .unwrap_or(false)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl Typed for serde_json::Value {
    fn field_type() -> FieldType {
        FieldType::Any
    }

    fn to_value(&self) -> Value<'_> {
        match self {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Double).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Text(Cow::Borrowed(s.as_str())),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Typed::to_value).collect())
            }
            serde_json::Value::Object(map) => Value::Map(map),
        }
    }
}

impl Typed for serde_json::Map<String, serde_json::Value> {
    fn field_type() -> FieldType {
        FieldType::Map {
            key: KeyKind::String,
            value: Box::new(FieldType::Any),
        }
    }

    fn to_value(&self) -> Value<'_> {
        Value::Map(self)
    }
}

impl MapAccess for serde_json::Map<String, serde_json::Value> {
    fn get(&self, key: &str) -> Option<Value<'_>> {
        serde_json::Map::get(self, key).map(Typed::to_value)
    }

    fn contains_key(&self, key: &str) -> bool {
        serde_json::Map::contains_key(self, key)
    }

    fn len(&self) -> usize {
        serde_json::Map::len(self)
    }
}
