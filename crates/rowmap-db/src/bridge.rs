//! Conversion between rowmap values and libSQL values, and row buffering.
//!
//! libSQL knows five storage classes (NULL, INTEGER, REAL, TEXT, BLOB).
//! Richer values are written in the forms the stock converters read back:
//! booleans as 0/1, timestamps as RFC 3339 text, JSON as text.

use rowmap_core::{ConversionError, Value};
use rowmap_hydrate::MemoryCursor;

use crate::error::DatabaseError;

/// Convert a bound parameter value for libSQL.
///
/// # Errors
///
/// Returns `ConversionError::UnexpectedType` for records and collections.
pub fn to_libsql(value: Value) -> Result<libsql::Value, ConversionError> {
    Ok(match value {
        Value::Null => libsql::Value::Null,
        Value::Bool(b) => libsql::Value::Integer(i64::from(b)),
        Value::Int(i) => libsql::Value::Integer(i),
        Value::Float(f) => libsql::Value::Real(f),
        Value::Text(s) => libsql::Value::Text(s),
        Value::Bytes(b) => libsql::Value::Blob(b),
        Value::Timestamp(ts) => libsql::Value::Text(ts.to_rfc3339()),
        Value::Json(j) => libsql::Value::Text(j.to_string()),
        other @ (Value::Object(_) | Value::List(_) | Value::Set(_)) => {
            return Err(ConversionError::unexpected("scalar parameter", &other));
        }
    })
}

/// Convert a column value read from libSQL.
#[must_use]
pub fn from_libsql(value: libsql::Value) -> Value {
    match value {
        libsql::Value::Null => Value::Null,
        libsql::Value::Integer(i) => Value::Int(i),
        libsql::Value::Real(f) => Value::Float(f),
        libsql::Value::Text(s) => Value::Text(s),
        libsql::Value::Blob(b) => Value::Bytes(b),
    }
}

/// Drain `rows` into a [`MemoryCursor`] labeled with the result's column names.
///
/// # Errors
///
/// Returns `DatabaseError::LibSql` if fetching a row fails.
pub async fn buffer_rows(mut rows: libsql::Rows) -> Result<MemoryCursor, DatabaseError> {
    let width = rows.column_count();
    let labels = (0..width)
        .map(|i| {
            rows.column_name(i)
                .map(ToString::to_string)
                .ok_or_else(|| anyhow::anyhow!("result column {i} has no name"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut buffered = Vec::new();
    while let Some(row) = rows.next().await? {
        let values = (0..width)
            .map(|i| row.get_value(i).map(from_libsql))
            .collect::<Result<Vec<_>, _>>()?;
        buffered.push(values);
    }
    tracing::trace!(columns = labels.len(), rows = buffered.len(), "buffered result rows");
    Ok(MemoryCursor::new(labels, buffered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rowmap_core::Record;
    use rowmap_mapping::{JsonTextConverter, ValueConverter};

    #[test]
    fn scalars_map_onto_storage_classes() {
        assert!(matches!(
            to_libsql(Value::Bool(true)).unwrap(),
            libsql::Value::Integer(1)
        ));
        let json = JsonTextConverter
            .from_storage(Value::from(r#"{"k":1}"#))
            .unwrap();
        assert!(matches!(
            to_libsql(json).unwrap(),
            libsql::Value::Text(text) if text == r#"{"k":1}"#
        ));
        assert_eq!(from_libsql(libsql::Value::Real(0.5)), Value::Float(0.5));
        assert_eq!(from_libsql(libsql::Value::Blob(vec![1])), Value::Bytes(vec![1]));
    }

    #[test]
    fn structured_values_are_rejected() {
        let record = Value::Object(Record::new("X"));
        assert_eq!(
            to_libsql(record.clone()).unwrap_err(),
            ConversionError::unexpected("scalar parameter", &record)
        );
        assert!(to_libsql(Value::List(vec![])).is_err());
    }
}
