use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::data::datavalue_compare::{matches_token, ValueKey};

/// Errors raised by table lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Column index {index} out of range (table has {column_count} columns)")]
    IndexOutOfRange { index: usize, column_count: usize },

    #[error("Row has {actual} values but table has {expected} columns")]
    RowWidthMismatch { expected: usize, actual: usize },
}

/// Represents the data type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    String,
    Integer,
    Float,
    Null,
}

impl DataType {
    /// Infer type from a string value
    pub fn infer_from_string(value: &str) -> Self {
        if is_null_token(value) {
            return DataType::Null;
        }

        if value.parse::<i64>().is_ok() {
            return DataType::Integer;
        }

        if value.parse::<f64>().is_ok() {
            return DataType::Float;
        }

        DataType::String
    }

    /// Merge two types (for columns with mixed types)
    pub fn merge(&self, other: &DataType) -> DataType {
        if self == other {
            return *self;
        }

        match (self, other) {
            (DataType::Null, t) | (t, DataType::Null) => *t,
            (DataType::Integer, DataType::Float) | (DataType::Float, DataType::Integer) => {
                DataType::Float
            }
            _ => DataType::String,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::String => "texto",
            DataType::Integer => "inteiro",
            DataType::Float => "decimal",
            DataType::Null => "vazio",
        };
        write!(f, "{}", name)
    }
}

/// Empty cells, `null` and `NaN` (any case) load as Null
pub(crate) fn is_null_token(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("null") || value.eq_ignore_ascii_case("nan")
}

/// Column metadata and definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataColumn {
    pub name: String,
    pub data_type: DataType,
    pub null_count: usize,
    pub unique_values: usize,
}

impl DataColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::Null,
            null_count: 0,
            unique_values: 0,
        }
    }

    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }
}

/// A single cell value in the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl DataValue {
    /// Convert raw cell text into a value of the column's inferred type.
    /// String columns keep the raw text so mixed columns stay lossless.
    pub fn from_string(s: &str, data_type: &DataType) -> Self {
        if is_null_token(s) {
            return DataValue::Null;
        }

        match data_type {
            DataType::String | DataType::Null => DataValue::String(s.to_string()),
            DataType::Integer => s
                .parse::<i64>()
                .map(DataValue::Integer)
                .unwrap_or_else(|_| DataValue::String(s.to_string())),
            DataType::Float => s
                .parse::<f64>()
                .map(DataValue::Float)
                .unwrap_or_else(|_| DataValue::String(s.to_string())),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    pub fn data_type(&self) -> DataType {
        match self {
            DataValue::String(_) => DataType::String,
            DataValue::Integer(_) => DataType::Integer,
            DataValue::Float(_) => DataType::Float,
            DataValue::Null => DataType::Null,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Integer(i) => Some(*i as f64),
            DataValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::Null => write!(f, ""),
        }
    }
}

/// A row of data in the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub values: Vec<DataValue>,
}

impl DataRow {
    pub fn new(values: Vec<DataValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&DataValue> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-column quality summary
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub index: usize,
    pub name: String,
    pub data_type: DataType,
    pub null_count: usize,
    pub unique_values: usize,
}

/// The loaded dataset. Built once by a loader, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTable {
    pub name: String,
    columns: Vec<DataColumn>,
    rows: Vec<DataRow>,
}

impl DataTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn add_column(&mut self, column: DataColumn) -> &mut Self {
        self.columns.push(column);
        self
    }

    pub fn add_row(&mut self, row: DataRow) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidthMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[DataColumn] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Result<&DataColumn, TableError> {
        self.columns.get(index).ok_or(TableError::IndexOutOfRange {
            index,
            column_count: self.columns.len(),
        })
    }

    pub fn column_type(&self, index: usize) -> Result<DataType, TableError> {
        self.column(index).map(|c| c.data_type)
    }

    /// Resolve a column name to its position. Duplicate names resolve to
    /// the first match.
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get column names as a vector
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Get a value at specific row and column
    pub fn value(&self, row: usize, col: usize) -> Option<&DataValue> {
        self.rows.get(row)?.get(col)
    }

    /// Rows in `[start, end)`, clamped to the table. Never fails.
    pub fn row_slice(&self, start: usize, end: usize) -> &[DataRow] {
        let end = end.min(self.rows.len());
        if start >= end {
            return &[];
        }
        &self.rows[start..end]
    }

    /// Every row whose cell at `column` equals `value` under the column's
    /// inferred type, in table order.
    pub fn filter_equals(&self, column: usize, value: &str) -> Result<Vec<&DataRow>, TableError> {
        let data_type = self.column_type(column)?;
        let matches: Vec<&DataRow> = self
            .rows
            .iter()
            .filter(|row| {
                row.get(column)
                    .is_some_and(|cell| matches_token(cell, value, data_type))
            })
            .collect();

        debug!(
            "filter_equals column={} value={:?} type={:?} matched={}",
            column,
            value,
            data_type,
            matches.len()
        );
        Ok(matches)
    }

    /// Occurrences of each distinct value in a column, in first-seen order.
    pub fn distinct_value_counts(&self, column: usize) -> Result<Vec<(DataValue, usize)>, TableError> {
        self.column(column)?;

        let mut positions: HashMap<ValueKey, usize> = HashMap::new();
        let mut counts: Vec<(DataValue, usize)> = Vec::new();

        for row in &self.rows {
            let Some(value) = row.get(column) else {
                continue;
            };
            match positions.get(&ValueKey::from(value)) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    positions.insert(ValueKey::from(value), counts.len());
                    counts.push((value.clone(), 1));
                }
            }
        }

        Ok(counts)
    }

    /// Paired numeric values of two columns, skipping rows where either
    /// cell is not a number.
    pub fn numeric_pairs(&self, x: usize, y: usize) -> Result<Vec<(f64, f64)>, TableError> {
        self.column(x)?;
        self.column(y)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|row| {
                let xv = row.get(x)?.as_f64()?;
                let yv = row.get(y)?.as_f64()?;
                Some((xv, yv))
            })
            .collect())
    }

    /// Infer and update column types and statistics based on data
    pub fn infer_column_types(&mut self) {
        for (col_idx, column) in self.columns.iter_mut().enumerate() {
            let mut inferred_type = DataType::Null;
            let mut null_count = 0;
            let mut unique_values = HashSet::new();

            for row in &self.rows {
                if let Some(value) = row.get(col_idx) {
                    if value.is_null() {
                        null_count += 1;
                    } else {
                        inferred_type = inferred_type.merge(&value.data_type());
                        unique_values.insert(ValueKey::from(value));
                    }
                }
            }

            column.data_type = inferred_type;
            column.null_count = null_count;
            column.unique_values = unique_values.len();
        }
    }

    pub fn column_summaries(&self) -> Vec<ColumnSummary> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, c)| ColumnSummary {
                index,
                name: c.name.clone(),
                data_type: c.data_type,
                null_count: c.null_count,
                unique_values: c.unique_values,
            })
            .collect()
    }

    /// Names that appear more than once in the header
    pub fn duplicate_column_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) && !duplicates.contains(&column.name) {
                duplicates.push(column.name.clone());
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city_prices() -> DataTable {
        let mut table = DataTable::new("prices");
        table.add_column(DataColumn::new("city"));
        table.add_column(DataColumn::new("price"));
        for (city, price) in [("A", 100), ("B", 200), ("A", 150)] {
            table
                .add_row(DataRow::new(vec![
                    DataValue::String(city.to_string()),
                    DataValue::Integer(price),
                ]))
                .unwrap();
        }
        table.infer_column_types();
        table
    }

    #[test]
    fn test_data_type_inference() {
        assert_eq!(DataType::infer_from_string("123"), DataType::Integer);
        assert_eq!(DataType::infer_from_string("-7"), DataType::Integer);
        assert_eq!(DataType::infer_from_string("123.45"), DataType::Float);
        assert_eq!(DataType::infer_from_string("hello"), DataType::String);
        assert_eq!(DataType::infer_from_string(""), DataType::Null);
        assert_eq!(DataType::infer_from_string("NULL"), DataType::Null);
    }

    #[test]
    fn test_type_merge() {
        assert_eq!(DataType::Null.merge(&DataType::Integer), DataType::Integer);
        assert_eq!(DataType::Integer.merge(&DataType::Float), DataType::Float);
        assert_eq!(DataType::Integer.merge(&DataType::String), DataType::String);
        assert_eq!(DataType::Float.merge(&DataType::Float), DataType::Float);
    }

    #[test]
    fn test_add_row_rejects_wrong_width() {
        let mut table = DataTable::new("test");
        table.add_column(DataColumn::new("a"));
        table.add_column(DataColumn::new("b"));

        let err = table
            .add_row(DataRow::new(vec![DataValue::Integer(1)]))
            .unwrap_err();
        assert_eq!(
            err,
            TableError::RowWidthMismatch {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_column_index_lookup() {
        let table = city_prices();
        assert_eq!(table.column_index("city"), Ok(0));
        assert_eq!(table.column_index("price"), Ok(1));
        assert_eq!(
            table.column_index("missing"),
            Err(TableError::ColumnNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_duplicate_column_names_resolve_to_first() {
        let mut table = DataTable::new("dups");
        table.add_column(DataColumn::new("id"));
        table.add_column(DataColumn::new("name"));
        table.add_column(DataColumn::new("id"));

        assert_eq!(table.column_index("id"), Ok(0));
        assert_eq!(table.duplicate_column_names(), vec!["id".to_string()]);
    }

    #[test]
    fn test_row_slice_clamps() {
        let table = city_prices();
        assert_eq!(table.row_slice(0, 10).len(), 3);
        assert_eq!(table.row_slice(1, 2).len(), 1);
        assert!(table.row_slice(3, 10).is_empty());
        assert!(table.row_slice(2, 1).is_empty());
        assert!(table.row_slice(50, 60).is_empty());
    }

    #[test]
    fn test_filter_equals_string_column() {
        let table = city_prices();
        let rows = table.filter_equals(0, "A").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(1), Some(&DataValue::Integer(100)));
        assert_eq!(rows[1].get(1), Some(&DataValue::Integer(150)));
    }

    #[test]
    fn test_filter_equals_numeric_column() {
        let table = city_prices();
        let rows = table.filter_equals(1, "200").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(0), Some(&DataValue::String("B".to_string())));

        assert!(table.filter_equals(1, "abc").unwrap().is_empty());
    }

    #[test]
    fn test_filter_equals_out_of_range() {
        let table = city_prices();
        assert_eq!(
            table.filter_equals(2, "A").unwrap_err(),
            TableError::IndexOutOfRange {
                index: 2,
                column_count: 2
            }
        );
    }

    #[test]
    fn test_distinct_value_counts_first_seen_order() {
        let table = city_prices();
        let counts = table.distinct_value_counts(0).unwrap();
        assert_eq!(
            counts,
            vec![
                (DataValue::String("A".to_string()), 2),
                (DataValue::String("B".to_string()), 1),
            ]
        );
    }

    #[test]
    fn test_type_inference_and_stats() {
        let mut table = DataTable::new("test");
        table.add_column(DataColumn::new("mixed"));
        table
            .add_row(DataRow::new(vec![DataValue::Integer(1)]))
            .unwrap();
        table
            .add_row(DataRow::new(vec![DataValue::Float(2.5)]))
            .unwrap();
        table.add_row(DataRow::new(vec![DataValue::Null])).unwrap();

        table.infer_column_types();

        let column = table.column(0).unwrap();
        assert_eq!(column.data_type, DataType::Float);
        assert_eq!(column.null_count, 1);
        assert_eq!(column.unique_values, 2);
    }

    #[test]
    fn test_numeric_pairs_skip_nulls() {
        let mut table = DataTable::new("xy");
        table.add_column(DataColumn::new("x"));
        table.add_column(DataColumn::new("y"));
        table
            .add_row(DataRow::new(vec![DataValue::Integer(1), DataValue::Float(2.0)]))
            .unwrap();
        table
            .add_row(DataRow::new(vec![DataValue::Null, DataValue::Float(3.0)]))
            .unwrap();
        table
            .add_row(DataRow::new(vec![DataValue::Integer(4), DataValue::Float(5.5)]))
            .unwrap();

        assert_eq!(table.numeric_pairs(0, 1).unwrap(), vec![(1.0, 2.0), (4.0, 5.5)]);
        assert!(table.numeric_pairs(0, 2).is_err());
    }

    #[test]
    fn test_null_display_is_empty() {
        assert_eq!(DataValue::Null.to_string(), "");
        assert_eq!(DataValue::from_string("null", &DataType::Integer), DataValue::Null);
        assert_eq!(
            DataValue::from_string("12", &DataType::String),
            DataValue::String("12".to_string())
        );
    }
}
