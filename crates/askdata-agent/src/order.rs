//! Sorting and top-N selection.

use askdata_model::{Dataset, Value};

use crate::directive::SortDirection;
use crate::filter::WorkingSet;
use crate::schema::SchemaIndex;

/// Stable sort of the working rows by a numeric column.
///
/// Blank (and any non-numeric) cells sort after every number in both directions.
pub fn sort(
    dataset: &Dataset,
    rows: WorkingSet,
    column: &str,
    direction: SortDirection,
) -> WorkingSet {
    static BLANK: Value = Value::Blank;
    let Some(idx) = dataset.column_index(column) else {
        return rows;
    };
    let cell = |row: usize| dataset.value_by_idx(row, idx).unwrap_or(&BLANK);

    let mut rows = rows.into_rows();
    rows.sort_by(|&a, &b| {
        let (a, b) = (cell(a), cell(b));
        let both_numbers = a.as_number().is_some() && b.as_number().is_some();
        match direction {
            SortDirection::Descending if both_numbers => b.cmp_for_sort(a),
            _ => a.cmp_for_sort(b),
        }
    });
    WorkingSet::from_rows(rows)
}

/// Column a sort directive applies to.
///
/// A `based on`/`by` phrase is authoritative: when its text names no numeric column the sort is
/// dropped rather than falling back. Without the phrase, the column mentioned in the question is
/// used, then the first numeric column of the dataset.
pub fn sort_column<'s>(schema: &'s SchemaIndex, query: &str, by: Option<&str>) -> Option<&'s str> {
    match by {
        Some(phrase) => schema.resolve_numeric(phrase),
        None => schema
            .resolve_numeric(query)
            .or_else(|| schema.first_numeric()),
    }
}

pub fn apply_sort(
    dataset: &Dataset,
    schema: &SchemaIndex,
    query: &str,
    rows: WorkingSet,
    direction: SortDirection,
    by: Option<&str>,
) -> WorkingSet {
    match sort_column(schema, query, by) {
        Some(column) => {
            log::debug!("sorting {} rows by `{column}` ({direction:?})", rows.len());
            sort(dataset, rows, column, direction)
        }
        None => {
            log::debug!("sort requested but no numeric column applies");
            rows
        }
    }
}

/// Sort by the mentioned numeric column and keep the first `n` rows.
///
/// No-op unless the question mentions a numeric column first.
pub fn apply_top(
    dataset: &Dataset,
    schema: &SchemaIndex,
    query: &str,
    rows: WorkingSet,
    n: usize,
    direction: SortDirection,
) -> WorkingSet {
    let Some(column) = schema.resolve_numeric(query) else {
        log::debug!("top {n} requested but no numeric column mentioned");
        return rows;
    };
    sort(dataset, rows, column, direction).truncate(n)
}
