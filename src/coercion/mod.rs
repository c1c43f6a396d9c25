//! Literal coercion
//!
//! Turns the raw JSON payload of a leaf rule into typed [`Literal`]s for the
//! rule's declared type, honoring the operator's arity.
//!
//! Accepted payloads:
//! - JSON scalars (numbers, strings, booleans)
//! - arrays of scalars
//! - bracketed JSON arrays inside a string (`"[1, 2]"`)
//! - comma-separated strings (`"1,2"`), for pair and list operators only
//! - JSON objects, through their compact text form
//!
//! Every failure is a single error kind, [`CompileError::Coercion`], carrying
//! field, operator, declared type and the raw literal.

mod culture;
mod literal;

pub use culture::Culture;
pub use literal::Literal;

use chrono::NaiveTime;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::errors::{CompileError, CompileResult};
use crate::operators::Arity;
use crate::rule::DeclaredType;

/// Rule context attached to coercion errors
#[derive(Debug, Clone, Copy)]
pub struct LiteralContext<'a> {
    pub field: &'a str,
    pub operator: &'a str,
    pub declared: DeclaredType,
}

impl LiteralContext<'_> {
    pub(crate) fn error(&self, literal: &JsonValue, reason: impl Into<String>) -> CompileError {
        CompileError::Coercion {
            field: self.field.to_string(),
            operator: self.operator.to_string(),
            declared_type: self.declared.as_str().to_string(),
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }

    fn wrong_arity(&self, expected: usize, found: usize) -> CompileError {
        CompileError::WrongArity {
            field: self.field.to_string(),
            operator: self.operator.to_string(),
            expected,
            found,
        }
    }
}

/// Coerces raw rule values under one culture and date policy
#[derive(Debug, Clone, Copy)]
pub struct Coercer<'a> {
    culture: &'a Culture,
    dates_as_utc: bool,
}

impl<'a> Coercer<'a> {
    pub fn new(culture: &'a Culture, dates_as_utc: bool) -> Self {
        Self {
            culture,
            dates_as_utc,
        }
    }

    /// Coerce a rule value for an operator of the given arity.
    ///
    /// Returns no literals for [`Arity::None`], exactly one for
    /// [`Arity::Single`], exactly two for [`Arity::Pair`] and at least one
    /// for [`Arity::List`].
    pub fn coerce(
        &self,
        raw: Option<&JsonValue>,
        arity: Arity,
        ctx: &LiteralContext<'_>,
    ) -> CompileResult<Vec<Literal>> {
        if arity == Arity::None {
            return Ok(Vec::new());
        }

        let raw = match raw {
            None | Some(JsonValue::Null) => {
                return Err(ctx.error(&JsonValue::Null, "a value is required"));
            }
            Some(raw) => raw,
        };

        let items = explode(raw, arity);
        match arity {
            Arity::Single if items.len() != 1 => return Err(ctx.wrong_arity(1, items.len())),
            Arity::Pair if items.len() != 2 => return Err(ctx.wrong_arity(2, items.len())),
            Arity::List if items.is_empty() => return Err(ctx.wrong_arity(1, 0)),
            _ => {}
        }

        items
            .iter()
            .map(|item| self.coerce_scalar(item, ctx))
            .collect()
    }

    /// Coerce one scalar literal to the declared type
    pub fn coerce_scalar(
        &self,
        raw: &JsonValue,
        ctx: &LiteralContext<'_>,
    ) -> CompileResult<Literal> {
        match raw {
            JsonValue::Array(_) => Err(ctx.error(raw, "nested arrays are not supported")),
            JsonValue::Null => Err(ctx.error(raw, "null is not a value")),
            JsonValue::Object(_) => {
                let projected = JsonValue::String(raw.to_string());
                self.coerce_scalar(&projected, ctx)
                    .map_err(|_| ctx.error(raw, "object has no usable text form"))
            }
            _ => match ctx.declared {
                DeclaredType::Integer => self
                    .integer(raw, ctx)
                    .and_then(|i| {
                        i32::try_from(i)
                            .map(|_| Literal::Int(i))
                            .map_err(|_| ctx.error(raw, "out of range for a 32-bit integer"))
                    }),
                DeclaredType::Long => self.integer(raw, ctx).map(Literal::Int),
                DeclaredType::Double => self.double(raw, ctx).map(Literal::Double),
                DeclaredType::Boolean => boolean(raw, ctx).map(Literal::Bool),
                DeclaredType::String => Ok(Literal::Text(text_of(raw))),
                DeclaredType::Date => self
                    .datetime(raw, ctx)
                    .map(|dt| Literal::DateTime(dt.date().and_time(NaiveTime::default()))),
                DeclaredType::DateTime => self.datetime(raw, ctx).map(Literal::DateTime),
                DeclaredType::Guid => guid(raw, ctx).map(Literal::Guid),
            },
        }
    }

    fn integer(&self, raw: &JsonValue, ctx: &LiteralContext<'_>) -> CompileResult<i64> {
        match raw {
            JsonValue::Number(n) => n
                .as_i64()
                .or_else(|| {
                    // i64::MAX as f64 is 2^63, one past the range
                    n.as_f64()
                        .filter(|f| {
                            f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64
                        })
                        .map(|f| f as i64)
                })
                .ok_or_else(|| ctx.error(raw, "not a whole number in range")),
            JsonValue::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| ctx.error(raw, e.to_string())),
            _ => Err(ctx.error(raw, format!("cannot read a {} as an integer", json_kind(raw)))),
        }
    }

    fn double(&self, raw: &JsonValue, ctx: &LiteralContext<'_>) -> CompileResult<f64> {
        match raw {
            JsonValue::Number(n) => n
                .as_f64()
                .ok_or_else(|| ctx.error(raw, "not representable as a double")),
            JsonValue::String(s) => self.culture.parse_double(s).ok_or_else(|| {
                ctx.error(
                    raw,
                    format!("not a number in culture '{}'", self.culture.name),
                )
            }),
            _ => Err(ctx.error(raw, format!("cannot read a {} as a double", json_kind(raw)))),
        }
    }

    fn datetime(
        &self,
        raw: &JsonValue,
        ctx: &LiteralContext<'_>,
    ) -> CompileResult<chrono::NaiveDateTime> {
        match raw {
            JsonValue::String(s) => self
                .culture
                .parse_datetime(s, self.dates_as_utc)
                .ok_or_else(|| {
                    ctx.error(
                        raw,
                        format!("no date format of culture '{}' matches", self.culture.name),
                    )
                }),
            _ => Err(ctx.error(raw, format!("cannot read a {} as a date", json_kind(raw)))),
        }
    }
}

fn boolean(raw: &JsonValue, ctx: &LiteralContext<'_>) -> CompileResult<bool> {
    match raw {
        JsonValue::Bool(b) => Ok(*b),
        JsonValue::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
        JsonValue::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(ctx.error(raw, "expected true or false")),
    }
}

fn guid(raw: &JsonValue, ctx: &LiteralContext<'_>) -> CompileResult<Uuid> {
    match raw {
        JsonValue::String(s) => Uuid::parse_str(s.trim()).map_err(|e| ctx.error(raw, e.to_string())),
        _ => Err(ctx.error(raw, format!("cannot read a {} as a guid", json_kind(raw)))),
    }
}

fn text_of(raw: &JsonValue) -> String {
    match raw {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(raw: &JsonValue) -> &'static str {
    match raw {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Break a raw payload into individual items for the operator's arity
fn explode(raw: &JsonValue, arity: Arity) -> Vec<JsonValue> {
    match raw {
        JsonValue::Array(items) => items.clone(),
        JsonValue::String(s) if matches!(arity, Arity::Pair | Arity::List) => split_delimited(s),
        other => vec![other.clone()],
    }
}

/// Split a delimited string literal.
///
/// A bracketed string that parses as a JSON array yields its elements;
/// otherwise the (unbracketed) text is split on commas and each piece is
/// trimmed and unquoted. An empty string yields no items.
pub fn split_delimited(raw: &str) -> Vec<JsonValue> {
    let trimmed = raw.trim();
    let inner = match trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => {
            if let Ok(JsonValue::Array(items)) = serde_json::from_str::<JsonValue>(trimmed) {
                return items;
            }
            inner
        }
        None => trimmed,
    };

    if inner.trim().is_empty() {
        return Vec::new();
    }

    inner
        .split(',')
        .map(|piece| JsonValue::String(unquote(piece.trim()).to_string()))
        .collect()
}

fn unquote(piece: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = piece
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    piece
}
