//! Leaf comparisons
//!
//! Evaluates one operator against one field value. Literals arrive already
//! adapted to the field at compile time, so evaluation only has to match
//! runtime value kinds:
//!
//! - null never satisfies a value-taking operator
//! - incompatible kinds are "no match", never an error
//! - negated operators are the complement of their positive form

use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveTime;

use crate::coercion::Literal;
use crate::operators::{CustomOperator, Operator};
use crate::reflect::Value;

/// How field values are read for comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Semantics {
    /// Compare text exactly; otherwise both sides are lowercased
    pub case_sensitive: bool,
    /// Render non-text field values as text when the literal is text
    pub render_text: bool,
    /// Truncate timestamps to midnight before comparing
    pub date_only: bool,
}

/// A compiled leaf test
#[derive(Debug, Clone)]
pub(crate) enum Check {
    /// Built-in operator. `op` is the positive form; text literals are
    /// already folded when comparison is case-insensitive.
    Builtin {
        op: Operator,
        negated: bool,
        operands: Vec<Literal>,
        semantics: Semantics,
    },
    /// Key presence on a mapping
    MapKey { keys: Vec<String>, negated: bool },
    /// Caller-supplied operator
    Custom {
        op: Arc<dyn CustomOperator>,
        operands: Vec<Literal>,
    },
}

impl Check {
    /// Test one field value
    pub fn test(&self, value: &Value<'_>) -> bool {
        match self {
            Check::Builtin {
                op,
                negated,
                operands,
                semantics,
            } => negated ^ Self::positive(*op, value, operands, semantics),
            Check::MapKey { keys, negated } => {
                let present = match value {
                    Value::Map(map) => keys.iter().any(|key| map.contains_key(key)),
                    _ => false,
                };
                negated ^ present
            }
            Check::Custom { op, operands } => op.evaluate(value, operands),
        }
    }

    fn positive(op: Operator, value: &Value<'_>, operands: &[Literal], semantics: &Semantics) -> bool {
        match value {
            Value::Null => return matches!(op, Operator::IsNull | Operator::IsEmpty),
            // Untyped lists reaching a value test match on any element
            Value::List(items) if !op.is_presence_test() => {
                return items
                    .iter()
                    .any(|item| Self::positive(op, item, operands, semantics));
            }
            _ => {}
        }

        match op {
            Operator::IsNull => false,
            Operator::IsEmpty => value.len() == Some(0),
            Operator::Equal => operands
                .first()
                .is_some_and(|lit| Self::equals(value, lit, semantics)),
            Operator::In => operands
                .iter()
                .any(|lit| Self::equals(value, lit, semantics)),
            Operator::Less => Self::order_is(value, operands, semantics, |o| o.is_lt()),
            Operator::LessOrEqual => Self::order_is(value, operands, semantics, |o| o.is_le()),
            Operator::Greater => Self::order_is(value, operands, semantics, |o| o.is_gt()),
            Operator::GreaterOrEqual => Self::order_is(value, operands, semantics, |o| o.is_ge()),
            Operator::Between => match operands {
                [low, high] => {
                    Self::order(value, low, semantics).is_some_and(|o| o.is_ge())
                        && Self::order(value, high, semantics).is_some_and(|o| o.is_le())
                }
                _ => false,
            },
            Operator::Contains => match value {
                Value::Map(map) => operands.iter().any(|lit| map.contains_key(&lit.render())),
                _ => Self::text_match(value, operands, semantics, |s, l| s.contains(l)),
            },
            Operator::BeginsWith => {
                Self::text_match(value, operands, semantics, |s, l| s.starts_with(l))
            }
            Operator::EndsWith => {
                Self::text_match(value, operands, semantics, |s, l| s.ends_with(l))
            }
            // Negated forms never reach here
            _ => false,
        }
    }

    fn equals(value: &Value<'_>, literal: &Literal, semantics: &Semantics) -> bool {
        match (value, literal) {
            (_, Literal::Text(expected)) => {
                Self::text_of(value, semantics).is_some_and(|actual| actual == expected.as_str())
            }
            (Value::Bool(a), Literal::Bool(b)) => a == b,
            (Value::Guid(a), Literal::Guid(b)) => a == b,
            (Value::DateTime(_), Literal::DateTime(_)) => {
                Self::order(value, literal, semantics) == Some(Ordering::Equal)
            }
            (Value::Int(a), Literal::Int(b)) => a == b,
            _ => match (value.as_f64(), literal.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    fn order(value: &Value<'_>, literal: &Literal, semantics: &Semantics) -> Option<Ordering> {
        match (value, literal) {
            (Value::Int(a), Literal::Int(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Literal::DateTime(b)) => {
                let a = if semantics.date_only {
                    a.date().and_time(NaiveTime::default())
                } else {
                    *a
                };
                Some(a.cmp(b))
            }
            _ => value.as_f64()?.partial_cmp(&literal.as_f64()?),
        }
    }

    fn order_is(
        value: &Value<'_>,
        operands: &[Literal],
        semantics: &Semantics,
        accept: fn(Ordering) -> bool,
    ) -> bool {
        operands
            .first()
            .and_then(|lit| Self::order(value, lit, semantics))
            .is_some_and(accept)
    }

    fn text_match(
        value: &Value<'_>,
        operands: &[Literal],
        semantics: &Semantics,
        accept: fn(&str, &str) -> bool,
    ) -> bool {
        let Some(actual) = Self::text_of(value, semantics) else {
            return false;
        };
        operands.iter().any(|lit| match lit {
            Literal::Text(expected) => accept(&actual, expected),
            _ => false,
        })
    }

    /// Text view of a field value under the comparison semantics
    fn text_of<'v>(value: &'v Value<'_>, semantics: &Semantics) -> Option<Cow<'v, str>> {
        let text: Cow<'v, str> = match value {
            Value::Text(s) => Cow::Borrowed(s.as_ref()),
            other if semantics.render_text => other.as_text()?,
            _ => return None,
        };
        Some(if semantics.case_sensitive {
            text
        } else {
            Cow::Owned(text.to_lowercase())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::EnumValue;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn builtin(op: Operator, operands: Vec<Literal>) -> Check {
        Check::Builtin {
            op: op.positive(),
            negated: op.is_negated(),
            operands,
            semantics: Semantics::default(),
        }
    }

    fn text(s: &str) -> Value<'_> {
        Value::Text(Cow::Borrowed(s))
    }

    #[test]
    fn test_equal_folds_case() {
        let check = builtin(Operator::Equal, vec![Literal::Text("alice".into())]);
        assert!(check.test(&text("Alice")));
        assert!(!check.test(&text("Bob")));
        assert!(!check.test(&Value::Null));
    }

    #[test]
    fn test_negation_is_complement_including_null() {
        let check = builtin(Operator::NotEqual, vec![Literal::Int(3)]);
        assert!(!check.test(&Value::Int(3)));
        assert!(check.test(&Value::Int(4)));
        assert!(check.test(&Value::Null));
    }

    #[test]
    fn test_numeric_widening() {
        let check = builtin(Operator::Equal, vec![Literal::Double(2.0)]);
        assert!(check.test(&Value::Int(2)));
        let check = builtin(Operator::Greater, vec![Literal::Int(1)]);
        assert!(check.test(&Value::Double(1.5)));
        let enum_value = Value::Enum(EnumValue { name: "High", value: 3 });
        assert!(check.test(&enum_value));
    }

    #[test]
    fn test_between_is_inclusive() {
        let check = builtin(Operator::Between, vec![Literal::Int(1), Literal::Int(3)]);
        assert!(check.test(&Value::Int(1)));
        assert!(check.test(&Value::Int(3)));
        assert!(!check.test(&Value::Int(4)));

        let outside = builtin(Operator::NotBetween, vec![Literal::Int(1), Literal::Int(3)]);
        assert!(outside.test(&Value::Int(4)));
        assert!(outside.test(&Value::Null));
    }

    #[test]
    fn test_kind_mismatch_is_no_match() {
        let check = builtin(Operator::Equal, vec![Literal::Int(1)]);
        assert!(!check.test(&text("1")));
        assert!(!check.test(&Value::Bool(true)));
    }

    #[test]
    fn test_text_operators() {
        let starts = builtin(Operator::BeginsWith, vec![Literal::Text("ab".into())]);
        assert!(starts.test(&text("ABC")));
        let ends = builtin(Operator::NotEndsWith, vec![Literal::Text("bc".into())]);
        assert!(!ends.test(&text("abc")));
        let contains = builtin(Operator::Contains, vec![Literal::Text("b".into())]);
        assert!(contains.test(&text("abc")));
        assert!(!contains.test(&Value::Int(1)));
    }

    #[test]
    fn test_rendered_text() {
        let check = Check::Builtin {
            op: Operator::Equal,
            negated: false,
            operands: vec![Literal::Text("42".into())],
            semantics: Semantics {
                render_text: true,
                ..Semantics::default()
            },
        };
        assert!(check.test(&Value::Int(42)));
    }

    #[test]
    fn test_date_only_truncates_field() {
        let day = NaiveDate::from_ymd_opt(2021, 6, 15).unwrap();
        let check = Check::Builtin {
            op: Operator::Equal,
            negated: false,
            operands: vec![Literal::DateTime(day.and_hms_opt(0, 0, 0).unwrap())],
            semantics: Semantics {
                date_only: true,
                ..Semantics::default()
            },
        };
        assert!(check.test(&Value::DateTime(day.and_hms_opt(13, 5, 0).unwrap())));
    }

    #[test]
    fn test_empty_and_null() {
        let is_empty = builtin(Operator::IsEmpty, vec![]);
        assert!(is_empty.test(&text("")));
        assert!(is_empty.test(&Value::List(vec![])));
        assert!(is_empty.test(&Value::Null));
        assert!(!is_empty.test(&Value::Int(0)));

        let is_not_null = builtin(Operator::IsNotNull, vec![]);
        assert!(is_not_null.test(&Value::Int(0)));
        assert!(!is_not_null.test(&Value::Null));
    }

    #[test]
    fn test_map_key_presence() {
        let map: HashMap<String, i32> = HashMap::from([("a".to_string(), 1)]);
        let check = Check::MapKey {
            keys: vec!["a".into()],
            negated: true,
        };
        assert!(!check.test(&Value::Map(&map)));
        assert!(check.test(&Value::Null));
    }

    #[test]
    fn test_untyped_list_matches_any_element() {
        let check = builtin(Operator::In, vec![Literal::Int(2)]);
        assert!(check.test(&Value::List(vec![Value::Int(1), Value::Int(2)])));
        let check = builtin(Operator::NotIn, vec![Literal::Int(2)]);
        assert!(!check.test(&Value::List(vec![Value::Int(1), Value::Int(2)])));
    }
}
