//! Conversion between [`Value`]s and their canonical text.
//!
//! Each value kind has its own encode/decode function; [`serialize`] and
//! [`deserialize`] only dispatch on the variant.  All numeric and temporal
//! forms are culture-invariant: `.` as the decimal point, no digit grouping,
//! ISO-8601 style dates.

use chrono::{NaiveDate, NaiveDateTime};

use super::duration::{format_duration, parse_duration};
use super::value::{DecodeValue, EncodeValue, IntWidth, Value, ValueKind};
use crate::error::{ConfigError, Result};

/// Canonical date form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical date-time form.  The fraction is omitted when zero.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a typed value to its canonical text.
///
/// # Examples
///
/// ```rust
/// use modcfg_core::codec::encode;
///
/// assert_eq!(encode(&42), "42");
/// assert_eq!(encode(&3.5f64), "3.5");
/// assert_eq!(encode(&true), "true");
/// assert_eq!(encode(&None::<i32>), "");
/// ```
pub fn encode<T: EncodeValue + ?Sized>(value: &T) -> String {
    serialize(&value.to_value())
}

/// Decodes canonical text into `T`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValueFormat`] if the text does not parse as
/// `T`'s kind or the parsed value does not fit in `T`.
///
/// # Examples
///
/// ```rust
/// use modcfg_core::codec::decode;
///
/// assert_eq!(decode::<i32>("42").unwrap(), 42);
/// assert_eq!(decode::<bool>("True").unwrap(), true);
/// assert!(decode::<u8>("256").is_err());
/// ```
pub fn decode<T: DecodeValue>(text: &str) -> Result<T> {
    let kind = T::kind();
    let value = deserialize(text, kind)?;
    T::from_value(value).ok_or_else(|| ConfigError::invalid_value(text, kind))
}

/// Renders a [`Value`] as text.
pub fn serialize(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Enum(label) => label.clone(),
        Value::Text(text) => text.clone(),
        Value::Bool(b) => encode_bool(*b),
        Value::Signed(n) => n.to_string(),
        Value::Unsigned(n) => n.to_string(),
        Value::Float32(f) => f.to_string(),
        Value::Float64(f) => f.to_string(),
        Value::Date(d) => d.format(DATE_FORMAT).to_string(),
        Value::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
        Value::Duration(delta) => format_duration(*delta),
        Value::Json(json) => json.to_string(),
    }
}

/// Parses `text` as a value of `kind`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValueFormat`] carrying the original text and
/// the kind's name when parsing fails.
pub fn deserialize(text: &str, kind: ValueKind) -> Result<Value> {
    let parsed = match kind {
        ValueKind::Enum(_) => decode_enum(text),
        ValueKind::Text => Some(Value::Text(text.to_string())),
        ValueKind::Bool => decode_bool(text),
        ValueKind::Signed(width) => decode_signed(text, width),
        ValueKind::Unsigned(width) => decode_unsigned(text, width),
        ValueKind::Float32 => text.trim().parse().ok().map(Value::Float32),
        ValueKind::Float64 => text.trim().parse().ok().map(Value::Float64),
        ValueKind::Date => decode_date(text),
        ValueKind::DateTime => decode_date_time(text),
        ValueKind::Duration => parse_duration(text).map(Value::Duration),
        ValueKind::Json(_) => decode_json(text),
    };
    parsed.ok_or_else(|| ConfigError::invalid_value(text, kind))
}

// ── Per-kind codecs ───────────────────────────────────────────────────────────

fn encode_bool(b: bool) -> String {
    b.to_string()
}

fn decode_bool(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(Value::Bool(true))
    } else if text.eq_ignore_ascii_case("false") {
        Some(Value::Bool(false))
    } else {
        None
    }
}

fn decode_enum(text: &str) -> Option<Value> {
    // Label validity is checked by the target enum itself.
    let label = text.trim();
    (!label.is_empty()).then(|| Value::Enum(label.to_string()))
}

fn decode_signed(text: &str, width: IntWidth) -> Option<Value> {
    let n: i64 = text.trim().parse().ok()?;
    let fits = match width {
        IntWidth::W64 => true,
        w => {
            let max = (1i64 << (w.bits() - 1)) - 1;
            (-max - 1..=max).contains(&n)
        }
    };
    fits.then_some(Value::Signed(n))
}

fn decode_unsigned(text: &str, width: IntWidth) -> Option<Value> {
    let n: u64 = text.trim().parse().ok()?;
    let fits = match width {
        IntWidth::W64 => true,
        w => n < (1u64 << w.bits()),
    };
    fits.then_some(Value::Unsigned(n))
}

fn decode_date(text: &str) -> Option<Value> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .ok()
        .map(Value::Date)
}

fn decode_date_time(text: &str) -> Option<Value> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(Value::DateTime)
}

fn decode_json(text: &str) -> Option<Value> {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .map(Value::Json)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Json;
    use chrono::TimeDelta;
    use serde::{Deserialize, Serialize};

    crate::config_enum! {
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        enum Weather {
            #[default]
            Clear,
            Rain,
            Snow,
        }
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Route {
        name: String,
        stops: Vec<u32>,
    }

    fn expect_invalid<T: DecodeValue + std::fmt::Debug>(text: &str) -> (String, String) {
        match decode::<T>(text) {
            Err(ConfigError::InvalidValueFormat { text, kind }) => (text, kind),
            other => panic!("expected InvalidValueFormat, got {other:?}"),
        }
    }

    // ── Integers ──────────────────────────────────────────────────────────────

    #[test]
    fn test_integer_round_trip() {
        // Arrange
        let text = encode(&42i32);

        // Act
        let back: i32 = decode(&text).unwrap();

        // Assert
        assert_eq!(text, "42");
        assert_eq!(back, 42);
    }

    #[test]
    fn test_negative_integer_encodes_without_grouping() {
        assert_eq!(encode(&-1_234_567i64), "-1234567");
    }

    #[test]
    fn test_width_overflow_is_invalid_value_format() {
        let (text, kind) = expect_invalid::<i8>("128");
        assert_eq!(text, "128");
        assert_eq!(kind, "i8");
        assert_eq!(decode::<i8>("-128").unwrap(), -128);
        assert_eq!(decode::<u16>("65535").unwrap(), u16::MAX);
        assert!(decode::<u16>("65536").is_err());
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        assert!(decode::<u32>("-1").is_err());
    }

    #[test]
    fn test_integer_rejects_decimal_text() {
        assert!(decode::<i32>("4.0").is_err());
        assert!(decode::<i32>("1,000").is_err());
    }

    // ── Booleans ──────────────────────────────────────────────────────────────

    #[test]
    fn test_bool_decode_is_case_insensitive() {
        assert!(decode::<bool>("true").unwrap());
        assert!(decode::<bool>("True").unwrap());
        assert!(!decode::<bool>("FALSE").unwrap());
    }

    #[test]
    fn test_bool_rejects_numeric_forms() {
        assert!(decode::<bool>("1").is_err());
        assert!(decode::<bool>("yes").is_err());
    }

    // ── Floats ────────────────────────────────────────────────────────────────

    #[test]
    fn test_float_round_trip_uses_dot_separator() {
        assert_eq!(encode(&3.5f64), "3.5");
        assert_eq!(decode::<f64>("3.5").unwrap(), 3.5);
        assert_eq!(encode(&0.1f32), "0.1");
        assert_eq!(decode::<f32>("0.1").unwrap(), 0.1f32);
    }

    #[test]
    fn test_float_rejects_comma_decimal() {
        assert!(decode::<f64>("3,5").is_err());
    }

    // ── Text ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_text_passes_through_unchanged() {
        assert_eq!(encode("a = b"), "a = b");
        assert_eq!(decode::<String>("a = b").unwrap(), "a = b");
    }

    // ── Enumerations ──────────────────────────────────────────────────────────

    #[test]
    fn test_enum_round_trip_is_case_insensitive() {
        assert_eq!(encode(&Weather::Rain), "Rain");
        assert_eq!(decode::<Weather>("rain").unwrap(), Weather::Rain);
        assert_eq!(decode::<Weather>("SNOW").unwrap(), Weather::Snow);
    }

    #[test]
    fn test_unknown_enum_label_is_invalid_value_format() {
        let (text, kind) = expect_invalid::<Weather>("Hail");
        assert_eq!(text, "Hail");
        assert_eq!(kind, "enum Weather");
    }

    // ── Dates and durations ───────────────────────────────────────────────────

    #[test]
    fn test_date_time_uses_iso_form() {
        // Arrange
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(14, 5, 0, 250)
            .unwrap();

        // Act
        let text = encode(&dt);

        // Assert
        assert_eq!(text, "2024-03-09T14:05:00.250");
        assert_eq!(decode::<NaiveDateTime>(&text).unwrap(), dt);
    }

    #[test]
    fn test_date_time_without_fraction() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(encode(&dt), "2024-01-01T00:00:00");
        assert_eq!(decode::<NaiveDateTime>("2024-01-01 00:00:00").unwrap(), dt);
    }

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(encode(&date), "1999-12-31");
        assert_eq!(decode::<NaiveDate>("1999-12-31").unwrap(), date);
        assert!(decode::<NaiveDate>("31/12/1999").is_err());
    }

    #[test]
    fn test_duration_round_trip() {
        let span = TimeDelta::hours(26) + TimeDelta::seconds(7);
        assert_eq!(encode(&span), "1.02:00:07");
        assert_eq!(decode::<TimeDelta>("1.02:00:07").unwrap(), span);
    }

    #[test]
    fn test_std_duration_round_trip() {
        let span = std::time::Duration::from_millis(1500);
        assert_eq!(encode(&span), "00:00:01.5");
        assert_eq!(decode::<std::time::Duration>("00:00:01.5").unwrap(), span);
    }

    // ── Structured fallback ───────────────────────────────────────────────────

    #[test]
    fn test_json_fallback_round_trip() {
        // Arrange
        let route = Json(Route {
            name: "Ring".to_string(),
            stops: vec![1, 2, 3],
        });

        // Act
        let text = encode(&route);
        let back: Json<Route> = decode(&text).unwrap();

        // Assert
        assert_eq!(text, r#"{"name":"Ring","stops":[1,2,3]}"#);
        assert_eq!(back, route);
    }

    #[test]
    fn test_malformed_json_is_invalid_value_format() {
        assert!(decode::<Json<Route>>("{not json").is_err());
    }

    #[test]
    fn test_json_with_wrong_shape_is_invalid_value_format() {
        let (_, kind) = expect_invalid::<Json<Route>>(r#"{"name": 5}"#);
        assert!(kind.starts_with("json "));
    }

    // ── Null ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_null_serializes_to_empty_string() {
        assert_eq!(serialize(&Value::Null), "");
    }
}
