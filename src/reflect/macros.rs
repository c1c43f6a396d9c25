//! Declarative impls of `Reflect` and `Typed` for plain records and enums

/// Implements `Reflect` and `Typed` for a struct.
///
/// Each member maps the name used in field paths to a struct field and its
/// type:
///
/// ```ignore
/// reflect_record! {
///     Person {
///         "Name" => name: String,
///         "Address" => address: Option<Address>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! reflect_record {
    ($ty:ident { $($name:literal => $field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::reflect::Reflect for $ty {
            fn shape() -> $crate::reflect::Shape {
                $crate::reflect::Shape::new(stringify!($ty))
                    $(.member($name, <$fty as $crate::reflect::Typed>::field_type()))*
            }

            fn member(&self, name: &str) -> ::std::option::Option<$crate::reflect::Value<'_>> {
                match name {
                    $($name => ::std::option::Option::Some($crate::reflect::Typed::to_value(&self.$field)),)*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl $crate::reflect::Typed for $ty {
            fn field_type() -> $crate::reflect::FieldType {
                $crate::reflect::FieldType::Object(<$ty as $crate::reflect::Reflect>::shape)
            }

            fn to_value(&self) -> $crate::reflect::Value<'_> {
                $crate::reflect::Value::Object(self)
            }
        }
    };
}

/// Implements `Typed` for a fieldless enum; members compare by name or by
/// their numeric value.
///
/// ```ignore
/// reflect_enum!(Status { Draft, Published, Archived });
/// ```
#[macro_export]
macro_rules! reflect_enum {
    ($ty:ident { $($variant:ident),* $(,)? }) => {
        impl $crate::reflect::Typed for $ty {
            fn field_type() -> $crate::reflect::FieldType {
                const MEMBERS: &[(&str, i64)] = &[$((stringify!($variant), $ty::$variant as i64)),*];
                $crate::reflect::FieldType::Enum(MEMBERS)
            }

            fn to_value(&self) -> $crate::reflect::Value<'_> {
                match self {
                    $($ty::$variant => $crate::reflect::Value::Enum($crate::reflect::EnumValue {
                        name: stringify!($variant),
                        value: $ty::$variant as i64,
                    }),)*
                }
            }
        }
    };
}
