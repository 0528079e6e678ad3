//! Value conversion between storage and property forms.
//!
//! A converter is attached to every simple binding (column ⇄ property) and
//! to every collection binding (hydrated element ⇄ collection member). One
//! converter instance is shared by all hydration calls, so implementations
//! must be stateless and `Send + Sync`. Null is passed through untouched by
//! every stock converter.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use rowmap_core::{ConversionError, Value};

/// Converter shared between bindings and threads.
pub type SharedConverter = Arc<dyn ValueConverter>;

/// Where a value is being written to, passed to [`ValueConverter::to_storage`].
#[derive(Debug, Clone, Copy)]
pub struct WriterContext<'a> {
    /// Entity the value belongs to.
    pub entity: &'a str,
    /// Property the value was read from.
    pub property: &'a str,
    /// Column or parameter name the value is written to.
    pub target: &'a str,
}

/// Bidirectional conversion between a stored (raw column) value and a
/// property value. Both directions default to pass-through.
pub trait ValueConverter: Send + Sync + fmt::Debug {
    /// Convert a raw column value into a property value.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the raw value has the wrong shape.
    fn from_storage(&self, raw: Value) -> Result<Value, ConversionError> {
        Ok(raw)
    }

    /// Convert a property value into the value written to storage.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the property value has the wrong shape.
    fn to_storage(&self, value: Value, _ctx: &WriterContext<'_>) -> Result<Value, ConversionError> {
        Ok(value)
    }
}

/// Pass-through in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl ValueConverter for IdentityConverter {}

/// The default converter for bindings that do not configure one.
#[must_use]
pub fn identity() -> SharedConverter {
    Arc::new(IdentityConverter)
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// TEXT ⇄ `Value::Timestamp`.
///
/// Reads RFC 3339 (`2026-02-09T14:30:00+00:00`) as well as `SQLite`'s
/// `datetime('now')` format (`2026-02-09 14:30:00`). Writes RFC 3339.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampConverter;

impl TimestampConverter {
    fn parse(s: &str) -> Result<DateTime<Utc>, ConversionError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .map(|naive| naive.and_utc())
            .map_err(|e| ConversionError::Invalid {
                value: s.to_string(),
                reason: format!("not a timestamp: {e}"),
            })
    }
}

impl ValueConverter for TimestampConverter {
    fn from_storage(&self, raw: Value) -> Result<Value, ConversionError> {
        match raw {
            Value::Null | Value::Timestamp(_) => Ok(raw),
            Value::Text(s) => Self::parse(&s).map(Value::Timestamp),
            other => Err(ConversionError::unexpected("text timestamp", &other)),
        }
    }

    fn to_storage(&self, value: Value, _ctx: &WriterContext<'_>) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Timestamp(ts) => Ok(Value::Text(ts.to_rfc3339())),
            other => Err(ConversionError::unexpected("timestamp", &other)),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// TEXT ⇄ `Value::Json`. Empty text reads as null.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTextConverter;

impl ValueConverter for JsonTextConverter {
    fn from_storage(&self, raw: Value) -> Result<Value, ConversionError> {
        match raw {
            Value::Null | Value::Json(_) => Ok(raw),
            Value::Text(s) if s.is_empty() => Ok(Value::Null),
            Value::Text(s) => serde_json::from_str(&s)
                .map(Value::Json)
                .map_err(|e| ConversionError::Invalid {
                    value: s,
                    reason: format!("invalid JSON: {e}"),
                }),
            other => Err(ConversionError::unexpected("JSON text", &other)),
        }
    }

    fn to_storage(&self, value: Value, _ctx: &WriterContext<'_>) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Json(j) => Ok(Value::Text(j.to_string())),
            other => Ok(Value::Text(other.to_json().to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Enums stored as text
// ---------------------------------------------------------------------------

/// TEXT enum values restricted to a fixed set of variant names.
#[derive(Debug, Clone)]
pub struct EnumTextConverter {
    variants: Vec<String>,
}

impl EnumTextConverter {
    #[must_use]
    pub fn new<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    fn check(&self, value: Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Text(s) if self.variants.iter().any(|v| *v == s) => Ok(Value::Text(s)),
            Value::Text(s) => Err(ConversionError::Invalid {
                reason: format!("expected one of [{}]", self.variants.join(", ")),
                value: s,
            }),
            other => Err(ConversionError::unexpected("enum text", &other)),
        }
    }
}

impl ValueConverter for EnumTextConverter {
    fn from_storage(&self, raw: Value) -> Result<Value, ConversionError> {
        self.check(raw)
    }

    fn to_storage(&self, value: Value, _ctx: &WriterContext<'_>) -> Result<Value, ConversionError> {
        self.check(value)
    }
}

// ---------------------------------------------------------------------------
// Booleans stored as integers
// ---------------------------------------------------------------------------

/// INTEGER 0/1 ⇄ `Value::Bool`. Any non-zero integer reads as `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolIntConverter;

impl ValueConverter for BoolIntConverter {
    fn from_storage(&self, raw: Value) -> Result<Value, ConversionError> {
        match raw {
            Value::Null | Value::Bool(_) => Ok(raw),
            Value::Int(i) => Ok(Value::Bool(i != 0)),
            other => Err(ConversionError::unexpected("integer boolean", &other)),
        }
    }

    fn to_storage(&self, value: Value, _ctx: &WriterContext<'_>) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Bool(b) => Ok(Value::Int(i64::from(b))),
            other => Err(ConversionError::unexpected("bool", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CTX: WriterContext<'static> = WriterContext {
        entity: "Test",
        property: "prop",
        target: "PROP",
    };

    #[test]
    fn identity_passes_through() {
        let conv = identity();
        assert_eq!(conv.from_storage(Value::Int(1)).unwrap(), Value::Int(1));
        assert_eq!(
            conv.to_storage(Value::from("x"), &CTX).unwrap(),
            Value::from("x")
        );
    }

    #[test]
    fn timestamp_reads_both_formats() {
        let conv = TimestampConverter;
        let a = conv
            .from_storage(Value::from("2026-02-09T14:30:00+00:00"))
            .unwrap();
        let b = conv.from_storage(Value::from("2026-02-09 14:30:00")).unwrap();
        assert_eq!(a, b);
        assert!(matches!(a, Value::Timestamp(_)));
        assert_eq!(conv.from_storage(Value::Null).unwrap(), Value::Null);
        assert!(conv.from_storage(Value::from("yesterday")).is_err());
        assert!(conv.from_storage(Value::Int(3)).is_err());
    }

    #[test]
    fn timestamp_writes_rfc3339() {
        let conv = TimestampConverter;
        let ts = conv.from_storage(Value::from("2026-02-09 14:30:00")).unwrap();
        assert_eq!(
            conv.to_storage(ts, &CTX).unwrap(),
            Value::from("2026-02-09T14:30:00+00:00")
        );
    }

    #[test]
    fn json_text_round_trip_shapes() {
        let conv = JsonTextConverter;
        let parsed = conv.from_storage(Value::from(r#"{"a":[1,2]}"#)).unwrap();
        assert_eq!(parsed, Value::Json(serde_json::json!({"a": [1, 2]})));
        assert_eq!(conv.from_storage(Value::from("")).unwrap(), Value::Null);
        assert!(conv.from_storage(Value::from("{oops")).is_err());
        assert_eq!(
            conv.to_storage(parsed, &CTX).unwrap(),
            Value::from(r#"{"a":[1,2]}"#)
        );
    }

    #[test]
    fn enum_text_validates_variants() {
        let conv = EnumTextConverter::new(["open", "closed"]);
        assert_eq!(
            conv.from_storage(Value::from("open")).unwrap(),
            Value::from("open")
        );
        let err = conv.from_storage(Value::from("pending")).unwrap_err();
        assert!(matches!(err, ConversionError::Invalid { .. }));
        assert!(conv.to_storage(Value::from("ajar"), &CTX).is_err());
    }

    #[test]
    fn bool_int_conversion() {
        let conv = BoolIntConverter;
        assert_eq!(conv.from_storage(Value::Int(0)).unwrap(), Value::Bool(false));
        assert_eq!(conv.from_storage(Value::Int(2)).unwrap(), Value::Bool(true));
        assert_eq!(conv.to_storage(Value::Bool(true), &CTX).unwrap(), Value::Int(1));
    }
}
