//! Leaf validators that read a raw store value and convert it.
//!
//! Every validator here expects [`Raw::String`]; anything else (including
//! [`Raw::Missing`]) fails with `Expected <kind>, got <raw>`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::Raw;
use crate::validator::Validator;

/// Base used to check relative URLs when the caller supplies none.
pub const DEFAULT_BASE_URL: &str = "http://localhost";

fn from_string<O, F>(expected: &'static str, convert: F) -> Validator<Raw, O>
where
    O: 'static,
    F: Fn(&str) -> Result<O, String> + Send + Sync + 'static,
{
    Validator::new(move |raw: &Raw| match raw {
        Raw::String(s) => convert(s),
        other => Err(format!("Expected {expected}, got {}", other.describe())),
    })
}

pub fn string() -> Validator<Raw, String> {
    from_string("string", |s| Ok(s.to_string()))
}

pub fn integer() -> Validator<Raw, i64> {
    from_string("integer", |s| {
        s.parse::<i64>()
            .map_err(|_| format!("Expected integer, got {s:?}"))
    })
}

/// Any finite number.
pub fn float() -> Validator<Raw, f64> {
    from_string("number", |s| match s.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(format!("Expected number, got {s:?}")),
    })
}

/// `true` or `false`, case-insensitive.
pub fn boolean() -> Validator<Raw, bool> {
    from_string("boolean", |s| {
        if s.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if s.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(format!("Expected boolean, got {s:?}"))
        }
    })
}

/// Any type implementing `FromStr`, reporting the parser's own error.
pub fn parse<T>() -> Validator<Raw, T>
where
    T: FromStr + 'static,
    T::Err: fmt::Display,
{
    from_string(std::any::type_name::<T>(), |s| {
        s.parse::<T>().map_err(|e| format!("Could not parse {s:?}: {e}"))
    })
}

/// One of a fixed set of strings.
pub fn one_of<S: AsRef<str>>(accepted: &[S]) -> Validator<Raw, String> {
    let accepted: Vec<String> = accepted.iter().map(|s| s.as_ref().to_string()).collect();
    from_string("string", move |s| {
        if accepted.iter().any(|a| a == s) {
            Ok(s.to_string())
        } else {
            let choices: Vec<String> = accepted.iter().map(|a| format!("{a:?}")).collect();
            Err(format!("Expected one of {}, got {s:?}", choices.join(", ")))
        }
    })
}

/// A serde enum (or any type deserializable from a JSON string).
pub fn enumerated<T: DeserializeOwned + 'static>() -> Validator<Raw, T> {
    from_string("string", |s| {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|e| format!("Invalid value {s:?}: {e}"))
    })
}

/// An ISO 8601 date or date-time. Values without an offset are read as UTC.
pub fn iso_date() -> Validator<Raw, DateTime<Utc>> {
    from_string("ISO 8601 date", |s| {
        parse_iso_date(s).ok_or_else(|| format!("Expected ISO 8601 date, got {s:?}"))
    })
}

fn parse_iso_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A URL with a scheme, e.g. `https://host/path`. The original string is kept.
pub fn absolute_url() -> Validator<Raw, String> {
    from_string("absolute URL", |s| {
        Url::parse(s)
            .map(|_| s.to_string())
            .map_err(|e| format!("Expected absolute URL, got {s:?}: {e}"))
    })
}

/// A URL without a scheme, e.g. `/not-found`, checked by joining it onto
/// `base` (default [`DEFAULT_BASE_URL`]). The base never appears in the result.
pub fn relative_url(base: Option<&str>) -> Validator<Raw, String> {
    let base = base.unwrap_or(DEFAULT_BASE_URL).to_string();
    from_string("relative URL", move |s| check_relative(s, &base))
}

fn check_relative(s: &str, base: &str) -> Result<String, String> {
    if Url::parse(s).is_ok() {
        return Err(format!("Expected relative URL, got absolute URL {s:?}"));
    }
    let base = Url::parse(base).map_err(|e| format!("Invalid base URL {base:?}: {e}"))?;
    base.join(s)
        .map(|_| s.to_string())
        .map_err(|e| format!("Expected relative URL, got {s:?}: {e}"))
}

/// Either an absolute or a relative URL.
pub fn url() -> Validator<Raw, String> {
    from_string("URL", |s| {
        if Url::parse(s).is_ok() {
            return Ok(s.to_string());
        }
        check_relative(s, DEFAULT_BASE_URL).map_err(|_| format!("Expected URL, got {s:?}"))
    })
}

/// A JSON document deserialized straight into `T`.
pub fn json<T: DeserializeOwned + 'static>() -> Validator<Raw, T> {
    from_string("JSON string", |s| {
        serde_json::from_str(s).map_err(|e| format!("Invalid JSON: {e}"))
    })
}

/// A JSON document handed to a validator over `serde_json::Value`.
pub fn json_with<T: 'static>(validator: Validator<serde_json::Value, T>) -> Validator<Raw, T> {
    json::<serde_json::Value>().then(validator)
}
