//! Field decoders for post payloads.
//!
//! Scalars are cast the way the document schema casts them: numbers and
//! booleans become text, and dates may be given as RFC 3339, a bare date, a
//! naive UTC date-time or epoch milliseconds. Objects and arrays are refused.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::{Deserializer, Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
                format!("{:.0}", f)
            }
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }

    /// `Ok(None)` for a blank string, which the schema reads as null.
    fn into_timestamp<E: Error>(self) -> Result<Option<DateTime<Utc>>, E> {
        match self {
            Scalar::Str(s) if s.trim().is_empty() => Ok(None),
            Scalar::Str(s) => parse_timestamp(&s)
                .map(Some)
                .ok_or_else(|| E::custom(format!("invalid date: {}", s))),
            Scalar::Int(ms) => from_millis(ms).map(Some),
            Scalar::Float(ms) if ms.is_finite() => from_millis(ms.trunc() as i64).map(Some),
            Scalar::Float(ms) => Err(E::custom(format!("invalid date: {}", ms))),
            Scalar::Bool(b) => Err(E::custom(format!("invalid date: {}", b))),
        }
    }
}

fn from_millis<E: Error>(ms: i64) -> Result<DateTime<Utc>, E> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| E::custom(format!("date out of range: {}", ms)))
}

/// Parses the textual date forms accepted in payloads.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(s) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|ts| ts.and_utc());
    }

    // Digit strings outside the range of years count as epoch milliseconds.
    match s.parse::<i64>() {
        Ok(ms) if !(-271_820..275_761).contains(&ms) => DateTime::from_timestamp_millis(ms),
        _ => None,
    }
}

/// Present text field: `Some(None)` for `null`, `Some(Some(_))` otherwise.
pub fn nullable_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(
        Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_text),
    ))
}

/// Date field where `null` and a blank string mean "not given".
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        Some(value) => value.into_timestamp(),
        None => Ok(None),
    }
}

/// Present date field: `Some(None)` for `null` or a blank string.
pub fn nullable_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    timestamp(deserializer).map(Some)
}
