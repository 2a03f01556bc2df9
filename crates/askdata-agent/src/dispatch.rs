//! Keyword-triggered aggregations, checked in a fixed order.

use askdata_model::{Dataset, Value};

use crate::aggregate;
use crate::envelope::{Intent, QueryOutput};
use crate::filter::WorkingSet;
use crate::schema::SchemaIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateKind {
    Max,
    Min,
    Average,
    Median,
    Count,
}

impl AggregateKind {
    /// Evaluation order; the first kind that triggers and applies wins.
    pub const PRIORITY: [AggregateKind; 5] = [
        AggregateKind::Max,
        AggregateKind::Min,
        AggregateKind::Average,
        AggregateKind::Median,
        AggregateKind::Count,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            AggregateKind::Max => &["highest", "maximum"],
            AggregateKind::Min => &["lowest", "minimum"],
            AggregateKind::Average => &["average", "mean"],
            AggregateKind::Median => &["median"],
            AggregateKind::Count => &["count"],
        }
    }

    pub fn intent(self) -> Intent {
        match self {
            AggregateKind::Max => Intent::Max,
            AggregateKind::Min => Intent::Min,
            AggregateKind::Average => Intent::Average,
            AggregateKind::Median => Intent::Median,
            AggregateKind::Count => Intent::Count,
        }
    }

    pub fn is_triggered_by(self, query: &str) -> bool {
        self.keywords().iter().any(|k| query.contains(k))
    }

    /// Every kind except COUNT reduces a numeric column.
    pub fn needs_column(self) -> bool {
        !matches!(self, AggregateKind::Count)
    }
}

/// Run the first aggregation whose keyword appears in `query` and whose column requirement holds.
///
/// A triggered kind with no numeric column mentioned is skipped, and the next kind is tried.
/// Returns `None` when nothing applies.
pub fn dispatch(
    dataset: &Dataset,
    schema: &SchemaIndex,
    query: &str,
    rows: &WorkingSet,
    round_digits: u32,
) -> Option<(Intent, QueryOutput)> {
    for kind in AggregateKind::PRIORITY {
        if !kind.is_triggered_by(query) {
            continue;
        }
        if !kind.needs_column() {
            return Some((kind.intent(), QueryOutput::Count(aggregate::count(rows))));
        }

        let Some(column) = schema.resolve_numeric(query) else {
            log::debug!("{kind:?} triggered but no numeric column mentioned; trying the next kind");
            continue;
        };

        let value = reduce(kind, dataset, rows, column, round_digits);
        log::debug!("{kind:?} of `{column}` over {} rows: {value:?}", rows.len());
        return Some((kind.intent(), QueryOutput::Scalar(Value::from(value))));
    }
    None
}

fn reduce(
    kind: AggregateKind,
    dataset: &Dataset,
    rows: &WorkingSet,
    column: &str,
    round_digits: u32,
) -> Option<f64> {
    match kind {
        AggregateKind::Max => aggregate::max(dataset, rows, column),
        AggregateKind::Min => aggregate::min(dataset, rows, column),
        AggregateKind::Average => {
            aggregate::mean(dataset, rows, column).map(|v| aggregate::round_to(v, round_digits))
        }
        AggregateKind::Median => {
            aggregate::median(dataset, rows, column).map(|v| aggregate::round_to(v, round_digits))
        }
        AggregateKind::Count => Some(aggregate::count(rows) as f64),
    }
}
