//! Answers for questions that trigger no aggregation.

use askdata_model::Dataset;

use crate::envelope::{DatasetSummary, Intent, QueryOutput};
use crate::filter::WorkingSet;
use crate::schema::SchemaIndex;

pub const SUMMARY_PHRASES: [&str; 3] = ["summary", "what's going on", "what is going on"];
pub const SAMPLE_KEYWORD: &str = "sample";

/// Shape of `dataset` as loaded, ignoring any filters.
pub fn summarize(dataset: &Dataset, schema: &SchemaIndex) -> DatasetSummary {
    DatasetSummary {
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        numeric_columns: schema.numeric_columns().to_vec(),
        column_names: dataset.column_names(),
    }
}

pub fn project(
    dataset: &Dataset,
    schema: &SchemaIndex,
    query: &str,
    rows: &WorkingSet,
    sample_size: usize,
) -> (Intent, QueryOutput) {
    if SUMMARY_PHRASES.iter().any(|p| query.contains(p)) {
        return (
            Intent::DatasetSummary,
            QueryOutput::Summary(summarize(dataset, schema)),
        );
    }

    let table = rows.materialize(dataset);
    if query.contains(SAMPLE_KEYWORD) {
        return (Intent::SampleData, QueryOutput::Table(table.head(sample_size)));
    }

    let selected = schema.mentioned_columns(query);
    if selected.is_empty() {
        return (Intent::FilteredData, QueryOutput::Table(table));
    }
    match table.project(&selected) {
        Ok(projected) => (Intent::FilteredData, QueryOutput::Table(projected)),
        Err(err) => {
            log::warn!("column projection failed, returning every column: {err}");
            (Intent::FilteredData, QueryOutput::Table(table))
        }
    }
}
