//! The dynamic value universe.
//!
//! A single [`Value`] type carries raw column values read from a row as well
//! as hydrated property values (nested records and collections). Equality
//! and hashing are structural so values can take part in identity keys:
//! floats compare by bit pattern and sets compare without regard to order.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

use crate::record::Record;

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
    Object(Record),
    /// An ordered collection.
    List(Vec<Value>),
    /// A collection without duplicates. Members keep insertion order but
    /// equality ignores it.
    Set(Vec<Value>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Timestamp(_) => "timestamp",
            Self::Json(_) => "json",
            Self::Object(_) => "object",
            Self::List(_) => "list",
            Self::Set(_) => "set",
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Object(r) => Some(r),
            _ => None,
        }
    }

    /// Members of a list or set.
    #[must_use]
    pub fn as_slice(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Insert into a list, or into a set unless an equal member is present.
    ///
    /// Returns `false` when the value was not inserted (set duplicate, or
    /// `self` is not a collection).
    pub fn push_member(&mut self, member: Self) -> bool {
        match self {
            Self::List(items) => {
                items.push(member);
                true
            }
            Self::Set(items) => {
                if items.contains(&member) {
                    false
                } else {
                    items.push(member);
                    true
                }
            }
            _ => false,
        }
    }

    /// Convert to JSON for serde-driven deserialization of hydrated records.
    ///
    /// Non-finite floats become `null`; bytes become an array of numbers;
    /// timestamps become RFC 3339 strings.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Self::Null => J::Null,
            Self::Bool(b) => J::Bool(*b),
            Self::Int(i) => J::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(J::Null, J::Number),
            Self::Text(s) => J::String(s.clone()),
            Self::Bytes(b) => J::Array(b.iter().map(|byte| J::from(*byte)).collect()),
            Self::Timestamp(ts) => J::String(ts.to_rfc3339()),
            Self::Json(j) => j.clone(),
            Self::Object(r) => r.to_json(),
            Self::List(items) | Self::Set(items) => {
                J::Array(items.iter().map(Self::to_json).collect())
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => same_members(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

/// Multiset equality, so a set holding duplicates compares consistently
/// with its hash.
fn same_members(a: &[Value], b: &[Value]) -> bool {
    let count = |items: &[Value], member: &Value| items.iter().filter(|m| *m == member).count();
    a.len() == b.len() && a.iter().all(|member| count(a, member) == count(b, member))
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            Self::Text(s) => s.hash(state),
            Self::Bytes(b) => b.hash(state),
            Self::Timestamp(ts) => ts.hash(state),
            Self::Json(j) => j.to_string().hash(state),
            Self::Object(r) => r.hash(state),
            Self::List(items) => items.hash(state),
            Self::Set(items) => {
                // Order-independent: combine member hashes commutatively.
                let combined = items.iter().fold(0u64, |acc, member| {
                    let mut hasher = DefaultHasher::new();
                    member.hash(&mut hasher);
                    acc.wrapping_add(hasher.finish())
                });
                items.len().hash(state);
                combined.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn hash_of(v: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        v.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn floats_compare_by_bits() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    }

    #[test]
    fn sets_ignore_member_order() {
        let a = Value::Set(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::Set(vec![Value::Int(2), Value::Int(1)]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let la = Value::List(vec![Value::Int(1), Value::Int(2)]);
        let lb = Value::List(vec![Value::Int(2), Value::Int(1)]);
        assert_ne!(la, lb);
    }

    #[test]
    fn sets_with_duplicates_compare_as_multisets() {
        let doubled = Value::Set(vec![Value::Int(1), Value::Int(1)]);
        let mixed = Value::Set(vec![Value::Int(1), Value::Int(2)]);
        assert_ne!(doubled, mixed);
        assert_ne!(mixed, doubled);

        let reordered = Value::Set(vec![Value::Int(2), Value::Int(1), Value::Int(1)]);
        let same = Value::Set(vec![Value::Int(1), Value::Int(2), Value::Int(1)]);
        assert_eq!(reordered, same);
        assert_eq!(hash_of(&reordered), hash_of(&same));
    }

    #[test]
    fn push_member_dedups_sets_only() {
        let mut set = Value::Set(Vec::new());
        assert!(set.push_member(Value::from("a")));
        assert!(!set.push_member(Value::from("a")));
        assert_eq!(set.as_slice().unwrap().len(), 1);

        let mut list = Value::List(Vec::new());
        list.push_member(Value::from("a"));
        list.push_member(Value::from("a"));
        assert_eq!(list.as_slice().unwrap().len(), 2);

        assert!(!Value::Int(1).push_member(Value::Null));
    }

    #[test]
    fn values_usable_as_hash_keys() {
        let mut keys = HashSet::new();
        keys.insert(vec![Value::Int(1), Value::Null]);
        keys.insert(vec![Value::Int(1), Value::Null]);
        keys.insert(vec![Value::Null, Value::Int(1)]);
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn json_projection() {
        let v = Value::List(vec![
            Value::Null,
            Value::Int(3),
            Value::Bytes(vec![1, 2]),
            Value::Float(f64::INFINITY),
        ]);
        assert_eq!(v.to_json(), serde_json::json!([null, 3, [1, 2], null]));
    }

    #[test]
    fn option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }
}
