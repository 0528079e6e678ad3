//! Record → named parameter values.
//!
//! The reverse direction of hydration: walk a mapping's simple and nested
//! bindings over a record and produce one `(column, storage value)` pair per
//! simple column. The pairs are meant to be bound by name to a query whose
//! parameters are named after the columns.

use rowmap_core::{ConversionError, Record, Value};

use crate::binding::Binding;
use crate::convert::WriterContext;
use crate::mapping::EntityMapping;

impl EntityMapping {
    /// Storage values of every simple column reachable without crossing a
    /// collection, in binding order.
    ///
    /// Properties missing from `record` and absent (null) nested groups
    /// produce null for each of their columns. Collections are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first `ConversionError` raised by a converter, or
    /// `UnexpectedType` when a nested property holds something other than a
    /// record.
    pub fn parameters(&self, record: &Record) -> Result<Vec<(String, Value)>, ConversionError> {
        let mut out = Vec::with_capacity(self.bindings().len());
        self.collect_parameters(Some(record), &mut out)?;
        Ok(out)
    }

    fn collect_parameters(
        &self,
        record: Option<&Record>,
        out: &mut Vec<(String, Value)>,
    ) -> Result<(), ConversionError> {
        for binding in self.bindings() {
            let value = record
                .and_then(|r| r.get(binding.property()))
                .cloned()
                .unwrap_or_default();
            match binding {
                Binding::Simple(simple) => {
                    let ctx = WriterContext {
                        entity: self.name(),
                        property: &simple.property,
                        target: &simple.column,
                    };
                    let stored = simple.converter.to_storage(value, &ctx)?;
                    out.push((simple.column.to_string(), stored));
                }
                Binding::Nested(nested) => match value {
                    Value::Null => nested.mapping.collect_parameters(None, out)?,
                    Value::Object(inner) => nested.mapping.collect_parameters(Some(&inner), out)?,
                    other => return Err(ConversionError::unexpected("object", &other)),
                },
                Binding::Collection(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::builder::{Column, MappingBuilder};
    use crate::convert::{BoolIntConverter, EnumTextConverter};
    use pretty_assertions::assert_eq;

    fn order_mapping() -> EntityMapping {
        let address = Arc::new(
            MappingBuilder::new("Address")
                .column("street")
                .column("zipCode")
                .build()
                .unwrap(),
        );
        let line = Arc::new(MappingBuilder::new("Line").id("lineId").build().unwrap());
        MappingBuilder::new("Order")
            .id("orderId")
            .simple(Column::new("paid").converter(BoolIntConverter))
            .nested("shipTo", address)
            .list("lines", line)
            .build()
            .unwrap()
    }

    #[test]
    fn simple_and_nested_columns_in_binding_order() {
        let record = Record::new("Order")
            .with("orderId", 7)
            .with("paid", true)
            .with(
                "shipTo",
                Record::new("Address")
                    .with("street", "Main St")
                    .with("zipCode", "12345"),
            )
            .with("lines", Value::List(vec![]));
        let params = order_mapping().parameters(&record).unwrap();
        assert_eq!(
            params,
            vec![
                ("ORDER_ID".to_string(), Value::Int(7)),
                ("PAID".to_string(), Value::Int(1)),
                ("STREET".to_string(), Value::from("Main St")),
                ("ZIP_CODE".to_string(), Value::from("12345")),
            ]
        );
    }

    #[test]
    fn absent_values_become_null() {
        let record = Record::new("Order").with("orderId", 1).with("shipTo", Value::Null);
        let params = order_mapping().parameters(&record).unwrap();
        let values: Vec<Value> = params.into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![Value::Int(1), Value::Null, Value::Null, Value::Null]);
    }

    #[test]
    fn converter_errors_propagate() {
        let mapping = MappingBuilder::new("Ticket")
            .simple(Column::new("state").converter(EnumTextConverter::new(["open"])))
            .build()
            .unwrap();
        let record = Record::new("Ticket").with("state", "lost");
        assert!(matches!(
            mapping.parameters(&record).unwrap_err(),
            ConversionError::Invalid { .. }
        ));
    }

    #[test]
    fn nested_property_must_be_a_record() {
        let record = Record::new("Order").with("shipTo", 3);
        assert_eq!(
            order_mapping().parameters(&record).unwrap_err(),
            ConversionError::unexpected("object", &Value::Int(3))
        );
    }
}
