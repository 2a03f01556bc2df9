use askdata_model::Dataset;
use std::sync::Arc;

use crate::directive::{Directive, Directives};
use crate::envelope::ResultEnvelope;
use crate::filter::{self, WorkingSet};
use crate::schema::SchemaIndex;
use crate::{dispatch, order, projection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentOptions {
    /// Rows returned for SAMPLE_DATA.
    pub sample_size: usize,
    /// Decimal places kept for GET_AVG and GET_MEDIAN.
    pub round_digits: u32,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            sample_size: 5,
            round_digits: 2,
        }
    }
}

/// Answers plain-English questions about one dataset.
///
/// The dataset is never modified and no state is kept between questions, so an agent can be
/// shared freely across threads.
#[derive(Clone, Debug)]
pub struct DataAgent {
    dataset: Arc<Dataset>,
    schema: SchemaIndex,
    options: AgentOptions,
}

impl DataAgent {
    pub fn new(dataset: impl Into<Arc<Dataset>>) -> Self {
        Self::with_options(dataset, AgentOptions::default())
    }

    pub fn with_options(dataset: impl Into<Arc<Dataset>>, options: AgentOptions) -> Self {
        let dataset = dataset.into();
        let schema = SchemaIndex::new(&dataset);
        log::debug!(
            "agent ready: {} rows, {} columns, numeric: {:?}",
            dataset.row_count(),
            dataset.column_count(),
            schema.numeric_columns()
        );
        Self {
            dataset,
            schema,
            options,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn schema(&self) -> &SchemaIndex {
        &self.schema
    }

    pub fn options(&self) -> AgentOptions {
        self.options
    }

    pub fn process_query(&self, query: &str) -> ResultEnvelope {
        let query = query.to_lowercase();
        let dataset = self.dataset.as_ref();
        let schema = &self.schema;

        let directives = Directives::detect(&query);
        log::debug!("question {query:?}: directives {directives:?}");

        let (mut rows, context) = filter::categorical(dataset, &query, WorkingSet::all(dataset));
        if !context.is_empty() {
            log::debug!("categorical filters {context:?} left {} rows", rows.len());
        }

        for directive in directives.iter() {
            rows = match directive {
                Directive::Range { low, high } => {
                    filter::range(dataset, schema, &query, rows, *low, *high)
                }
                Directive::Compare(cmp) => filter::compare(dataset, schema, &query, rows, cmp),
                Directive::Sort { direction, by } => {
                    order::apply_sort(dataset, schema, &query, rows, *direction, by.as_deref())
                }
                Directive::Top { n, direction } => {
                    order::apply_top(dataset, schema, &query, rows, *n, *direction)
                }
            };
            log::trace!("after {directive:?}: {} rows", rows.len());
        }

        let AgentOptions {
            sample_size,
            round_digits,
        } = self.options;
        let (intent, result) = dispatch::dispatch(dataset, schema, &query, &rows, round_digits)
            .unwrap_or_else(|| projection::project(dataset, schema, &query, &rows, sample_size));
        log::debug!("resolved to {intent}");

        ResultEnvelope::new(intent, result, context)
    }
}
