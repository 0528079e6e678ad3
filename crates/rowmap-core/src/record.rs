//! Hydrated objects.
//!
//! A [`Record`] is what the hydration engine builds for one entity: the
//! entity name plus its properties in mapping order. Typed values are
//! obtained with [`Record::deserialize`], which goes through `serde_json`
//! so any `Deserialize` struct whose field names match the property names
//! can be produced.

use std::any::type_name;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::errors::ConversionError;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    entity: Arc<str>,
    fields: Vec<(Arc<str>, Value)>,
}

impl Record {
    #[must_use]
    pub fn new(entity: impl Into<Arc<str>>) -> Self {
        Self {
            entity: entity.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(entity: impl Into<Arc<str>>, capacity: usize) -> Self {
        Self {
            entity: entity.into(),
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Builder-style property insertion, mostly useful in tests.
    #[must_use]
    pub fn with(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }

    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_ref(), value))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field.as_ref() == name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(field, _)| field.as_ref() == name)
            .map(|(_, value)| value)
    }

    /// Property at a position in mapping order.
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).map(|(_, value)| value)
    }

    pub fn value_at_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.fields.get_mut(index).map(|(_, value)| value)
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }

    /// Deserialize into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::Deserialize` if the record's shape does not
    /// match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConversionError> {
        serde_json::from_value(self.to_json()).map_err(|e| ConversionError::Deserialize {
            target: type_name::<T>().to_string(),
            reason: e.to_string(),
        })
    }
}
