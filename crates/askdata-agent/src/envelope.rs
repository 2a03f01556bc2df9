use askdata_model::{Dataset, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::filter::QueryContext;

/// The computation a question resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    #[serde(rename = "MAX")]
    Max,
    #[serde(rename = "MIN")]
    Min,
    #[serde(rename = "GET_AVG")]
    Average,
    #[serde(rename = "GET_MEDIAN")]
    Median,
    #[serde(rename = "COUNT")]
    Count,
    #[serde(rename = "DATASET_SUMMARY")]
    DatasetSummary,
    #[serde(rename = "SAMPLE_DATA")]
    SampleData,
    #[serde(rename = "FILTERED_DATA")]
    FilteredData,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Max => "MAX",
            Intent::Min => "MIN",
            Intent::Average => "GET_AVG",
            Intent::Median => "GET_MEDIAN",
            Intent::Count => "COUNT",
            Intent::DatasetSummary => "DATASET_SUMMARY",
            Intent::SampleData => "SAMPLE_DATA",
            Intent::FilteredData => "FILTERED_DATA",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the loaded dataset, before any filtering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub numeric_columns: Vec<String>,
    pub column_names: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    /// MAX, MIN, GET_AVG and GET_MEDIAN. [`Value::Blank`] when there was nothing to reduce.
    Scalar(Value),
    Count(usize),
    Summary(DatasetSummary),
    /// SAMPLE_DATA and FILTERED_DATA.
    Table(Dataset),
}

impl QueryOutput {
    pub fn as_table(&self) -> Option<&Dataset> {
        match self {
            QueryOutput::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// Everything returned for one question.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultEnvelope {
    pub intent: Intent,
    pub result: QueryOutput,
    /// Categorical filters that matched this question.
    #[serde(skip_serializing_if = "QueryContext::is_empty")]
    pub context: QueryContext,
}

impl ResultEnvelope {
    pub fn new(intent: Intent, result: QueryOutput, context: QueryContext) -> Self {
        Self {
            intent,
            result,
            context,
        }
    }
}
