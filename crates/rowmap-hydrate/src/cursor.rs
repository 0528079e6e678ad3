//! Row sources.
//!
//! The engine reads rows through [`RowCursor`]. [`MemoryCursor`] is the
//! in-memory implementation used by tests and by adapters that buffer a
//! driver's rows before hydrating them.

use std::collections::HashMap;

use rowmap_core::{CursorError, Value};

/// A forward-only cursor over labeled rows.
///
/// Values are read from the current row, i.e. after `next_row` returned
/// `true`.
pub trait RowCursor {
    /// Advance to the next row. Returns `false` once the rows are exhausted.
    ///
    /// # Errors
    ///
    /// Returns `CursorError::Source` when the underlying source fails.
    fn next_row(&mut self) -> Result<bool, CursorError>;

    /// Column labels, in result order.
    fn column_labels(&self) -> &[String];

    /// Value of the column labeled `label` in the current row.
    ///
    /// # Errors
    ///
    /// Returns `UnknownColumn` for a label not in the result and
    /// `NoCurrentRow` when the cursor is not on a row.
    fn value(&self, label: &str) -> Result<Value, CursorError>;

    /// Value at zero-based `index` in the current row.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` or `NoCurrentRow`.
    fn value_at(&self, index: usize) -> Result<Value, CursorError>;
}

/// Buffered rows with case-insensitive label lookup.
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
    rows: std::vec::IntoIter<Vec<Value>>,
    current: Option<Vec<Value>>,
}

impl MemoryCursor {
    /// Build a cursor over `rows`. When two labels differ only in case the
    /// first one wins for lookup by name.
    #[must_use]
    pub fn new<I, S>(labels: I, rows: Vec<Vec<Value>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let mut positions = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            positions.entry(label.to_ascii_uppercase()).or_insert(i);
        }
        Self {
            labels,
            positions,
            rows: rows.into_iter(),
            current: None,
        }
    }

    /// Rows not yet visited.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    fn row(&self) -> Result<&[Value], CursorError> {
        self.current.as_deref().ok_or(CursorError::NoCurrentRow)
    }
}

impl RowCursor for MemoryCursor {
    fn next_row(&mut self) -> Result<bool, CursorError> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }

    fn column_labels(&self) -> &[String] {
        &self.labels
    }

    fn value(&self, label: &str) -> Result<Value, CursorError> {
        let index = *self
            .positions
            .get(&label.to_ascii_uppercase())
            .ok_or_else(|| CursorError::UnknownColumn(label.to_string()))?;
        self.value_at(index)
    }

    fn value_at(&self, index: usize) -> Result<Value, CursorError> {
        let row = self.row()?;
        row.get(index)
            .cloned()
            .ok_or(CursorError::IndexOutOfRange {
                index,
                width: row.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cursor() -> MemoryCursor {
        MemoryCursor::new(
            ["ID", "Name"],
            vec![
                vec![Value::Int(1), Value::from("a")],
                vec![Value::Int(2), Value::Null],
            ],
        )
    }

    #[test]
    fn walks_rows_in_order() {
        let mut c = cursor();
        assert_eq!(c.value("id").unwrap_err(), CursorError::NoCurrentRow);
        assert!(c.next_row().unwrap());
        assert_eq!(c.value("id").unwrap(), Value::Int(1));
        assert_eq!(c.value("NAME").unwrap(), Value::from("a"));
        assert_eq!(c.remaining(), 1);
        assert!(c.next_row().unwrap());
        assert_eq!(c.value_at(1).unwrap(), Value::Null);
        assert!(!c.next_row().unwrap());
        assert_eq!(c.value_at(0).unwrap_err(), CursorError::NoCurrentRow);
    }

    #[test]
    fn lookup_errors() {
        let mut c = cursor();
        c.next_row().unwrap();
        assert_eq!(
            c.value("missing").unwrap_err(),
            CursorError::UnknownColumn("missing".into())
        );
        assert_eq!(
            c.value_at(5).unwrap_err(),
            CursorError::IndexOutOfRange { index: 5, width: 2 }
        );
        assert_eq!(c.column_labels(), ["ID".to_string(), "Name".to_string()]);
    }
}
