//! Locale conventions for parsing numeric and date literals

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Number and date conventions used when parsing string literals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Culture {
    /// Culture name ("" for invariant)
    pub name: String,
    /// Decimal separator in floating point literals
    pub decimal_separator: char,
    /// Digit group separator, stripped before parsing
    pub group_separator: Option<char>,
    /// chrono formats for date-only literals, tried in order
    pub date_formats: Vec<String>,
    /// chrono formats for date-time literals, tried in order
    pub datetime_formats: Vec<String>,
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

impl Culture {
    /// Culture-independent conventions (ISO dates, `.` decimals)
    pub fn invariant() -> Self {
        Self {
            name: String::new(),
            decimal_separator: '.',
            group_separator: Some(','),
            date_formats: vec!["%Y-%m-%d".into(), "%m/%d/%Y".into(), "%Y/%m/%d".into()],
            datetime_formats: vec![
                "%Y-%m-%dT%H:%M:%S%.f".into(),
                "%Y-%m-%d %H:%M:%S%.f".into(),
                "%Y-%m-%dT%H:%M".into(),
                "%Y-%m-%d %H:%M".into(),
                "%m/%d/%Y %H:%M:%S".into(),
                "%m/%d/%Y %H:%M".into(),
            ],
        }
    }

    /// German conventions (`,` decimals, `dd.mm.yyyy` dates)
    pub fn de_de() -> Self {
        Self {
            name: "de-DE".into(),
            decimal_separator: ',',
            group_separator: Some('.'),
            date_formats: vec!["%d.%m.%Y".into(), "%Y-%m-%d".into()],
            datetime_formats: vec![
                "%d.%m.%Y %H:%M:%S".into(),
                "%d.%m.%Y %H:%M".into(),
                "%Y-%m-%dT%H:%M:%S%.f".into(),
                "%Y-%m-%d %H:%M:%S%.f".into(),
            ],
        }
    }

    /// Parse a floating point literal
    pub fn parse_double(&self, raw: &str) -> Option<f64> {
        let mut normalized = String::with_capacity(raw.len());
        for c in raw.trim().chars() {
            if Some(c) == self.group_separator {
                continue;
            }
            normalized.push(if c == self.decimal_separator { '.' } else { c });
        }
        normalized.parse::<f64>().ok().filter(|d| d.is_finite())
    }

    /// Parse a date or date-time literal.
    ///
    /// Literals with an explicit offset are converted to UTC when
    /// `as_utc` is set and to local time otherwise; offset-free literals are
    /// taken as written.
    pub fn parse_datetime(&self, raw: &str, as_utc: bool) -> Option<NaiveDateTime> {
        let raw = raw.trim();

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Some(if as_utc {
                with_offset.naive_utc()
            } else {
                with_offset.with_timezone(&Local).naive_local()
            });
        }

        self.datetime_formats
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                self.date_formats
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                    .map(|date| date.and_time(NaiveTime::default()))
            })
    }
}
