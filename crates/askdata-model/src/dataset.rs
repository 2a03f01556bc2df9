use crate::error::{DatasetError, DatasetResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Number,
    Boolean,
    Text,
}

impl ColumnType {
    /// Booleans are numeric: they aggregate, compare and sort as `1` and `0`.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Number | ColumnType::Boolean)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Number)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Boolean)
    }
}

/// An ordered set of typed columns plus row-major data.
///
/// Datasets are treated as immutable once loaded: row selection and projection build new
/// datasets rather than editing the receiver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "DatasetRepr", try_from = "DatasetRepr")]
pub struct Dataset {
    columns: Vec<ColumnSchema>,
    column_index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn new(columns: Vec<ColumnSchema>) -> Self {
        let mut column_index = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            // Exact duplicates resolve to the first declaration.
            column_index.entry(column.name.clone()).or_insert(idx);
        }

        Self {
            columns,
            column_index,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<ColumnSchema>, rows: Vec<Vec<Value>>) -> DatasetResult<Self> {
        let mut dataset = Self::new(columns);
        for row in rows {
            dataset.push_row(row)?;
        }
        Ok(dataset)
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
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

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.column_index.get(column).copied()
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.value_by_idx(row, idx)
    }

    pub fn value_by_idx(&self, row: usize, idx: usize) -> Option<&Value> {
        self.rows.get(row)?.get(idx)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> DatasetResult<()> {
        if row.len() != self.columns.len() {
            return Err(DatasetError::SchemaMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }

        self.rows.push(row);
        Ok(())
    }

    /// Distinct non-blank values of column `idx` over `rows`, in first-seen order.
    pub fn distinct_values(
        &self,
        idx: usize,
        rows: impl IntoIterator<Item = usize>,
    ) -> Vec<&Value> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in rows {
            let Some(value) = self.value_by_idx(row, idx) else {
                continue;
            };
            if value.is_blank() {
                continue;
            }
            if seen.insert(value) {
                out.push(value);
            }
        }
        out
    }

    /// Build a new dataset containing the given rows, in the given order.
    ///
    /// Out-of-range indices are skipped.
    pub fn select_rows(&self, rows: &[usize]) -> Dataset {
        let mut out = Dataset::new(self.columns.clone());
        out.rows = rows
            .iter()
            .filter_map(|&row| self.rows.get(row).cloned())
            .collect();
        out
    }

    pub fn head(&self, n: usize) -> Dataset {
        let mut out = Dataset::new(self.columns.clone());
        out.rows = self.rows.iter().take(n).cloned().collect();
        out
    }

    /// Build a new dataset restricted to `columns`, in the order given.
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> DatasetResult<Dataset> {
        let mut indices = Vec::with_capacity(columns.len());
        for column in columns {
            let column = column.as_ref();
            let idx = self
                .column_index(column)
                .ok_or_else(|| DatasetError::UnknownColumn(column.to_string()))?;
            indices.push(idx);
        }

        let schema = indices.iter().map(|&idx| self.columns[idx].clone()).collect();
        let mut out = Dataset::new(schema);
        out.rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Ok(out)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DatasetRepr {
    columns: Vec<String>,
    types: Vec<ColumnType>,
    rows: Vec<Vec<Value>>,
}

impl From<Dataset> for DatasetRepr {
    fn from(dataset: Dataset) -> Self {
        let (columns, types) = dataset
            .columns
            .into_iter()
            .map(|c| (c.name, c.column_type))
            .unzip();
        Self {
            columns,
            types,
            rows: dataset.rows,
        }
    }
}

impl TryFrom<DatasetRepr> for Dataset {
    type Error = DatasetError;

    fn try_from(repr: DatasetRepr) -> Result<Self, Self::Error> {
        if repr.columns.len() != repr.types.len() {
            return Err(DatasetError::ColumnTypeMismatch {
                names: repr.columns.len(),
                types: repr.types.len(),
            });
        }
        let schema = repr
            .columns
            .into_iter()
            .zip(repr.types)
            .map(|(name, column_type)| ColumnSchema { name, column_type })
            .collect();
        Dataset::with_rows(schema, repr.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sales() -> Dataset {
        Dataset::with_rows(
            vec![ColumnSchema::text("region"), ColumnSchema::number("sales")],
            vec![
                vec!["east".into(), 10.into()],
                vec!["west".into(), 20.into()],
                vec!["east".into(), 30.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn push_row_rejects_wrong_arity() {
        let mut ds = sales();
        let err = ds.push_row(vec!["north".into()]).unwrap_err();
        assert_eq!(
            err,
            DatasetError::SchemaMismatch {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn distinct_values_keep_first_seen_order_and_skip_blanks() {
        let mut ds = sales();
        ds.push_row(vec![Value::Blank, 5.into()]).unwrap();
        let values: Vec<String> = ds
            .distinct_values(0, 0..ds.row_count())
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(values, vec!["east", "west"]);

        let values = ds.distinct_values(0, [3, 2, 1]);
        assert_eq!(values, vec![&Value::from("east"), &Value::from("west")]);
    }

    #[test]
    fn select_and_project_build_new_datasets() {
        let ds = sales();
        let picked = ds.select_rows(&[2, 0]);
        assert_eq!(picked.value(0, "sales"), Some(&Value::from(30)));
        assert_eq!(picked.value(1, "sales"), Some(&Value::from(10)));

        let projected = ds.project(&["sales"]).unwrap();
        assert_eq!(projected.column_names(), vec!["sales".to_string()]);
        assert_eq!(projected.row_count(), 3);
        assert_eq!(ds.column_count(), 2);

        assert_eq!(
            ds.project(&["profit"]).unwrap_err(),
            DatasetError::UnknownColumn("profit".into())
        );
    }

    #[test]
    fn numbers_and_booleans_are_numeric_types() {
        assert!(ColumnType::Number.is_numeric());
        assert!(ColumnType::Boolean.is_numeric());
        assert!(!ColumnType::Text.is_numeric());
    }

    #[test]
    fn serde_layout_is_columns_types_rows() {
        let ds = sales().head(1);
        let json = serde_json::to_value(&ds).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "columns": ["region", "sales"],
                "types": ["text", "number"],
                "rows": [["east", 10.0]],
            })
        );

        let back: Dataset = serde_json::from_value(json).unwrap();
        assert_eq!(back, ds);
    }
}
