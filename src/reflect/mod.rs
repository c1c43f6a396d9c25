//! Schema-free record model
//!
//! Rules address record data by dotted path without compile-time knowledge
//! of the record type. Records describe themselves through two traits:
//!
//! - [`Reflect`]: a record with a static [`Shape`] and members readable by
//!   name (plus an optional string indexer)
//! - [`Typed`]: any member type, with a static [`FieldType`] and a borrowed
//!   runtime [`Value`]
//!
//! `Typed` is provided for primitives, strings, chrono dates, `Uuid`,
//! `Option`, `Box`, `Vec`, string- and integer-keyed maps and
//! `serde_json::Value`. Records and enums get both traits from
//! [`reflect_record!`](crate::reflect_record) and
//! [`reflect_enum!`](crate::reflect_enum).

mod impls;
mod macros;
mod shape;
mod value;

pub use shape::{FieldType, KeyKind, Member, Shape, ShapeFn};
pub use value::{EnumValue, MapAccess, Reflect, Typed, Value};
