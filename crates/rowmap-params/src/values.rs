//! Binding values to a translated query by name.

use rowmap_core::Value;

use crate::error::ParamError;
use crate::query::NamedParameterQuery;

/// A translated query together with its positional value slots.
///
/// Setting a name writes the value into every position recorded for it.
#[derive(Debug, Clone)]
pub struct ParameterValues {
    query: NamedParameterQuery,
    slots: Vec<Option<Value>>,
}

impl ParameterValues {
    #[must_use]
    pub fn new(query: NamedParameterQuery) -> Self {
        let slots = vec![None; query.placeholder_count()];
        Self { query, slots }
    }

    #[must_use]
    pub const fn query(&self) -> &NamedParameterQuery {
        &self.query
    }

    /// Bind `value` to every position of `name`.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::UnknownParameter` if the query has no such name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, ParamError> {
        let positions = self
            .query
            .indexes_of(name)
            .ok_or_else(|| ParamError::UnknownParameter(name.to_string()))?;
        let value = value.into();
        for &position in positions {
            self.slots[position - 1] = Some(value.clone());
        }
        Ok(self)
    }

    /// Bind every `(name, value)` pair in order. Later pairs win.
    ///
    /// # Errors
    ///
    /// Stops at the first unknown name with `ParamError::UnknownParameter`.
    pub fn set_all<I, K, V>(&mut self, pairs: I) -> Result<&mut Self, ParamError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in pairs {
            self.set(name.as_ref(), value)?;
        }
        Ok(self)
    }

    #[must_use]
    pub fn is_bound(&self, name: &str) -> bool {
        self.query
            .indexes_of(name)
            .is_some_and(|positions| positions.iter().all(|&p| self.slots[p - 1].is_some()))
    }

    /// Names that still have at least one unset position, sorted.
    #[must_use]
    pub fn unbound_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .query
            .parameter_indexes()
            .iter()
            .filter(|(_, positions)| positions.iter().any(|&p| self.slots[p - 1].is_none()))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Produce the translated SQL and its positional values.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::Unbound` listing every name left unset.
    pub fn into_positional(self) -> Result<(String, Vec<Value>), ParamError> {
        let unbound = self.unbound_names();
        if !unbound.is_empty() {
            return Err(ParamError::Unbound { names: unbound });
        }
        Ok(self.into_positional_lenient())
    }

    /// Produce the translated SQL and its positional values, treating unset
    /// positions as null.
    #[must_use]
    pub fn into_positional_lenient(self) -> (String, Vec<Value>) {
        let values = self
            .slots
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        (self.query.translated_query().to_string(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rowmap_core::ParameterCase;

    fn values_for(sql: &str) -> ParameterValues {
        ParameterValues::new(NamedParameterQuery::parse(sql).unwrap())
    }

    #[test]
    fn set_applies_to_every_position() {
        let mut values = values_for("a = :p1 AND b = :p2 AND c = :p1");
        values.set("p1", 10).unwrap().set("p2", "x").unwrap();
        let (sql, positional) = values.into_positional().unwrap();
        assert_eq!(sql, "a = ? AND b = ? AND c = ?");
        assert_eq!(
            positional,
            vec![Value::Int(10), Value::from("x"), Value::Int(10)]
        );
    }

    #[test]
    fn unknown_name_is_a_lookup_error() {
        let mut values = values_for("a = :p1");
        let err = values.set("missing", 1).unwrap_err();
        assert_eq!(err, ParamError::UnknownParameter("missing".into()));
    }

    #[test]
    fn unbound_names_are_reported() {
        let mut values = values_for("a = :z AND b = :y AND c = :x");
        values.set("y", Value::Null).unwrap();
        assert!(values.is_bound("y"));
        assert!(!values.is_bound("x"));
        let err = values.into_positional().unwrap_err();
        assert_eq!(
            err,
            ParamError::Unbound {
                names: vec!["x".into(), "z".into()]
            }
        );
    }

    #[test]
    fn lenient_positional_fills_nulls() {
        let mut values = values_for("a = :a AND b = :b");
        values.set("b", true).unwrap();
        let (_, positional) = values.into_positional_lenient();
        assert_eq!(positional, vec![Value::Null, Value::Bool(true)]);
    }

    #[test]
    fn set_all_last_pair_wins() {
        let mut values = values_for("a = :a");
        values.set_all([("a", 1), ("a", 2)]).unwrap();
        let (_, positional) = values.into_positional().unwrap();
        assert_eq!(positional, vec![Value::Int(2)]);
    }

    #[test]
    fn upper_case_queries_accept_any_case() {
        let query = NamedParameterQuery::parse_with("a = :userId", ParameterCase::Upper).unwrap();
        let mut values = ParameterValues::new(query);
        values.set("USERID", 5).unwrap();
        assert!(values.is_bound("userid"));
    }
}
