//! Row filters that narrow a [`WorkingSet`].
//!
//! Every filter takes the current working set by value and returns the narrowed one; the dataset
//! itself is only ever read.

use askdata_model::{Dataset, Value};
use std::collections::{BTreeMap, HashSet};

use crate::schema::SchemaIndex;

/// Categorical filters matched while answering one question, keyed by column.
///
/// Advisory only: nothing later in the pipeline reads it back.
pub type QueryContext = BTreeMap<String, Vec<Value>>;

#[derive(Debug, Clone, PartialEq)]
pub enum NumberComparison {
    GreaterThan(f64),
    LessThan(f64),
    /// Inclusive on both ends.
    Between { min: f64, max: f64 },
}

impl NumberComparison {
    pub fn matches(&self, n: f64) -> bool {
        match self {
            NumberComparison::GreaterThan(v) => n > *v,
            NumberComparison::LessThan(v) => n < *v,
            NumberComparison::Between { min, max } => n >= *min && n <= *max,
        }
    }
}

/// Ordered row indices into a borrowed [`Dataset`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    rows: Vec<usize>,
}

impl WorkingSet {
    /// Every row of `dataset`, in input order.
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            rows: (0..dataset.row_count()).collect(),
        }
    }

    pub fn from_rows(rows: Vec<usize>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<usize> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn retain(mut self, mut keep: impl FnMut(usize) -> bool) -> Self {
        self.rows.retain(|&row| keep(row));
        self
    }

    pub fn truncate(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Values of column `idx` for the working rows, in working order.
    pub fn column_values<'s, 'd: 's>(
        &'s self,
        dataset: &'d Dataset,
        idx: usize,
    ) -> impl Iterator<Item = &'d Value> + 's {
        self.rows
            .iter()
            .filter_map(move |&row| dataset.value_by_idx(row, idx))
    }

    /// Copy the working rows out into a new dataset.
    pub fn materialize(&self, dataset: &Dataset) -> Dataset {
        dataset.select_rows(&self.rows)
    }
}

/// Categorical equality filter.
///
/// For every text column, the distinct values still present in the working set whose text occurs
/// in `query` are collected. Number and boolean columns are never matched. Rows are kept when the
/// column holds any of the collected values; separate columns narrow one after another. A matched
/// value whose text is contained in another matched value of the same column is dropped, so
/// `northeast` does not also pick up `east`.
pub fn categorical(dataset: &Dataset, query: &str, rows: WorkingSet) -> (WorkingSet, QueryContext) {
    let mut context = QueryContext::new();
    let mut rows = rows;

    for (idx, column) in dataset.columns().iter().enumerate() {
        if column.column_type.is_numeric() {
            continue;
        }

        let matched: Vec<(&Value, String)> = dataset
            .distinct_values(idx, rows.rows().iter().copied())
            .into_iter()
            .filter_map(|value| value.match_text().map(|text| (value, text)))
            .filter(|(_, text)| query.contains(text.as_str()))
            .collect();
        if matched.is_empty() {
            continue;
        }

        let keep: Vec<&Value> = matched
            .iter()
            .filter(|(_, text)| {
                !matched
                    .iter()
                    .any(|(_, other)| other.len() > text.len() && other.contains(text.as_str()))
            })
            .map(|(value, _)| *value)
            .collect();

        log::trace!(
            "categorical match on `{}`: {}",
            column.name,
            keep.iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let wanted: HashSet<&Value> = keep.iter().copied().collect();
        let owned: Vec<Value> = keep.into_iter().cloned().collect();
        rows = rows.retain(|row| {
            dataset
                .value_by_idx(row, idx)
                .is_some_and(|v| wanted.contains(v))
        });
        context.insert(column.name.clone(), owned);
    }

    (rows, context)
}

/// Inclusive numeric range on the column mentioned in `query`.
///
/// No-op unless the first mentioned column is numeric.
pub fn range(
    dataset: &Dataset,
    schema: &SchemaIndex,
    query: &str,
    rows: WorkingSet,
    low: f64,
    high: f64,
) -> WorkingSet {
    compare(
        dataset,
        schema,
        query,
        rows,
        &NumberComparison::Between { min: low, max: high },
    )
}

/// Strict comparison on the column mentioned in `query`.
///
/// No-op unless the first mentioned column is numeric. Blank cells never pass.
pub fn compare(
    dataset: &Dataset,
    schema: &SchemaIndex,
    query: &str,
    rows: WorkingSet,
    cmp: &NumberComparison,
) -> WorkingSet {
    let Some(column) = schema.resolve_numeric(query) else {
        log::trace!("{cmp:?} skipped: no numeric column mentioned");
        return rows;
    };
    let Some(idx) = dataset.column_index(column) else {
        return rows;
    };

    rows.retain(|row| {
        dataset
            .value_by_idx(row, idx)
            .and_then(Value::as_number)
            .is_some_and(|n| cmp.matches(n))
    })
}
