//! Identity keys.

use std::sync::Arc;

use rowmap_core::{IdentityPolicy, Value};

use crate::cursor::RowCursor;
use crate::error::HydrateError;

/// Raw values of an entity's identity columns, in declaration order.
///
/// Compared and hashed structurally. A key may contain nulls as long as
/// at least one member is non-null.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(Vec<Value>);

impl IdentityKey {
    /// Build a key from raw values. All-null (or empty) input has no key.
    #[must_use]
    pub fn from_values(values: Vec<Value>) -> Option<Self> {
        if values.iter().all(Value::is_null) {
            None
        } else {
            Some(Self(values))
        }
    }

    /// Read the key of `entity` from the current row.
    ///
    /// Returns `Ok(None)` when every identity column is null: the object is
    /// absent from this row.
    ///
    /// # Errors
    ///
    /// Cursor errors propagate (including a missing identity column), and
    /// `PartialIdentity` is raised for a partly-null key under
    /// [`IdentityPolicy::RejectPartial`].
    pub fn extract<C: RowCursor + ?Sized>(
        cursor: &C,
        entity: &str,
        columns: &[Arc<str>],
        policy: IdentityPolicy,
    ) -> Result<Option<Self>, HydrateError> {
        let values = columns
            .iter()
            .map(|column| cursor.value(column))
            .collect::<Result<Vec<_>, _>>()?;
        let Some(key) = Self::from_values(values) else {
            return Ok(None);
        };

        if key.is_partial() {
            let nulls: Vec<String> = columns
                .iter()
                .zip(&key.0)
                .filter(|(_, v)| v.is_null())
                .map(|(c, _)| c.to_string())
                .collect();
            match policy {
                IdentityPolicy::Lenient => {
                    tracing::trace!(entity, ?nulls, "partially null identity key");
                }
                IdentityPolicy::RejectPartial => {
                    return Err(HydrateError::PartialIdentity {
                        entity: entity.to_string(),
                        columns: nulls,
                    });
                }
            }
        }
        Ok(Some(key))
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Some but not all members are null.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.0.iter().any(Value::is_null)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::cursor::MemoryCursor;
    use pretty_assertions::assert_eq;

    fn row(values: Vec<Value>) -> MemoryCursor {
        let mut c = MemoryCursor::new(["A", "B"], vec![values]);
        c.next_row().unwrap();
        c
    }

    fn columns() -> Vec<Arc<str>> {
        vec![Arc::from("A"), Arc::from("B")]
    }

    #[test]
    fn all_null_is_absent() {
        let c = row(vec![Value::Null, Value::Null]);
        let key = IdentityKey::extract(&c, "E", &columns(), IdentityPolicy::Lenient).unwrap();
        assert_eq!(key, None);
        assert_eq!(IdentityKey::from_values(vec![]), None);
    }

    #[test]
    fn composite_keys_compare_structurally() {
        let a = IdentityKey::from_values(vec![Value::Int(1), Value::from("x")]);
        let b = IdentityKey::from_values(vec![Value::Int(1), Value::from("x")]);
        let c = IdentityKey::from_values(vec![Value::Int(1), Value::from("y")]);
        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn partial_keys_are_distinct_when_lenient() {
        let c = row(vec![Value::Int(1), Value::Null]);
        let key = IdentityKey::extract(&c, "E", &columns(), IdentityPolicy::Lenient)
            .unwrap()
            .unwrap();
        assert!(key.is_partial());
        assert_eq!(key.values(), [Value::Int(1), Value::Null]);
        assert_ne!(Some(key), IdentityKey::from_values(vec![Value::Int(1), Value::Int(0)]));
    }

    #[test]
    fn partial_keys_rejected_on_request() {
        let c = row(vec![Value::Null, Value::Int(2)]);
        let err = IdentityKey::extract(&c, "E", &columns(), IdentityPolicy::RejectPartial).unwrap_err();
        assert_eq!(
            err,
            HydrateError::PartialIdentity {
                entity: "E".into(),
                columns: vec!["A".into()],
            }
        );
    }

    #[test]
    fn missing_identity_column_is_an_error() {
        let c = row(vec![Value::Int(1), Value::Int(2)]);
        let cols: Vec<Arc<str>> = vec![Arc::from("C")];
        assert!(matches!(
            IdentityKey::extract(&c, "E", &cols, IdentityPolicy::Lenient),
            Err(HydrateError::Cursor(_))
        ));
    }
}
