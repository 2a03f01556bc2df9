//! Numeric reductions over one column of a working set.
//!
//! Blank and non-numeric cells are skipped. A reduction over no numbers yields `None`.

use askdata_model::{Dataset, Value};

use crate::filter::WorkingSet;

fn numbers<'a>(
    dataset: &'a Dataset,
    rows: &'a WorkingSet,
    column: &str,
) -> impl Iterator<Item = f64> + 'a {
    let idx = dataset.column_index(column);
    idx.into_iter()
        .flat_map(move |idx| rows.column_values(dataset, idx))
        .filter_map(Value::as_number)
}

pub fn max(dataset: &Dataset, rows: &WorkingSet, column: &str) -> Option<f64> {
    let mut best: Option<f64> = None;
    for n in numbers(dataset, rows, column) {
        best = Some(best.map_or(n, |current| current.max(n)));
    }
    best
}

pub fn min(dataset: &Dataset, rows: &WorkingSet, column: &str) -> Option<f64> {
    let mut best: Option<f64> = None;
    for n in numbers(dataset, rows, column) {
        best = Some(best.map_or(n, |current| current.min(n)));
    }
    best
}

pub fn mean(dataset: &Dataset, rows: &WorkingSet, column: &str) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for n in numbers(dataset, rows, column) {
        sum += n;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Middle value; the mean of the two middle values for an even count.
pub fn median(dataset: &Dataset, rows: &WorkingSet, column: &str) -> Option<f64> {
    let mut values: Vec<f64> = numbers(dataset, rows, column).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

pub fn count(rows: &WorkingSet) -> usize {
    rows.len()
}

/// Round to `digits` decimal places, exact halves going to the even neighbour.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(15) as i32);
    let rounded = (value * factor).round_ties_even() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}
