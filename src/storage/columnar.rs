use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::SchemaRef;

use crate::error::EngineError;

/// Columnar relation - equal-length arrow arrays plus the schema naming them.
/// Immutable once built; shared read-only across questions.
#[derive(Clone, Debug)]
pub struct Table {
    /// Column arrays (one per schema field)
    pub columns: Vec<ArrayRef>,

    /// Schema describing the columns
    pub schema: SchemaRef,

    /// Number of rows
    pub row_count: usize,
}

impl Table {
    pub fn new(columns: Vec<ArrayRef>, schema: SchemaRef) -> Self {
        let row_count = columns.first().map(|c| c.len()).unwrap_or(0);
        Self {
            columns,
            schema,
            row_count,
        }
    }

    /// Get a column by index
    pub fn column(&self, idx: usize) -> Option<&ArrayRef> {
        self.columns.get(idx)
    }

    /// Get a column by name
    pub fn column_by_name(&self, name: &str) -> Option<&ArrayRef> {
        let idx = self.schema.index_of(name).ok()?;
        self.column(idx)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.schema.index_of(name).is_ok()
    }

    /// Get a text column, or an execution error naming the column
    pub fn str_column(&self, name: &str) -> Result<&StringArray, EngineError> {
        self.column_by_name(name)
            .and_then(|c| c.as_any().downcast_ref::<StringArray>())
            .ok_or_else(|| EngineError::execution(format!("missing or non-text column '{name}'")))
    }

    /// Get an integer column, or an execution error naming the column
    pub fn i64_column(&self, name: &str) -> Result<&Int64Array, EngineError> {
        self.column_by_name(name)
            .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
            .ok_or_else(|| EngineError::execution(format!("missing or non-integer column '{name}'")))
    }

    /// Get a float column, or an execution error naming the column
    pub fn f64_column(&self, name: &str) -> Result<&Float64Array, EngineError> {
        self.column_by_name(name)
            .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
            .ok_or_else(|| EngineError::execution(format!("missing or non-numeric column '{name}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn sample() -> Table {
        let schema = Arc::new(Schema::new(vec![
            Field::new("state", DataType::Utf8, true),
            Field::new("annual", DataType::Float64, true),
        ]));
        let state: StringArray = vec![Some("Kerala"), Some("Karnataka")].into_iter().collect();
        let annual: Float64Array = vec![Some(300.4), None].into_iter().collect();
        let columns: Vec<ArrayRef> = vec![Arc::new(state), Arc::new(annual)];
        Table::new(columns, schema)
    }

    #[test]
    fn row_count_from_first_column() {
        assert_eq!(sample().row_count, 2);
    }

    #[test]
    fn typed_access_by_name() {
        let table = sample();
        assert_eq!(table.str_column("state").unwrap().value(0), "Kerala");
        assert!(table.f64_column("annual").unwrap().is_null(1));
        assert!(table.i64_column("annual").is_err());
        assert!(table.str_column("district").is_err());
    }
}
