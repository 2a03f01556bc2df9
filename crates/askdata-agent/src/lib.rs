//! Keyword-driven question answering over an [`askdata_model::Dataset`].
//!
//! A question is lowercased and run through a fixed pipeline: categorical filters, numeric range
//! and comparison filters, sorting and top-N selection, then either an aggregation (MAX, MIN,
//! GET_AVG, GET_MEDIAN, COUNT) or a projection of the remaining rows. Nothing in the pipeline
//! fails; unrecognised phrases are ignored.
//!
//! ```
//! use askdata_agent::{DataAgent, Intent};
//! use askdata_model::{ColumnSchema, Dataset};
//!
//! let dataset = Dataset::with_rows(
//!     vec![ColumnSchema::text("region"), ColumnSchema::number("sales")],
//!     vec![
//!         vec!["east".into(), 10.into()],
//!         vec!["west".into(), 20.into()],
//!     ],
//! )
//! .unwrap();
//! let agent = DataAgent::new(dataset);
//! assert_eq!(agent.process_query("Count the rows").intent, Intent::Count);
//! ```

#![forbid(unsafe_code)]

mod agent;
pub mod aggregate;
pub mod directive;
pub mod dispatch;
mod envelope;
pub mod filter;
pub mod order;
pub mod projection;
mod schema;

pub use crate::agent::{AgentOptions, DataAgent};
pub use crate::directive::{Directive, Directives, SortDirection};
pub use crate::envelope::{DatasetSummary, Intent, QueryOutput, ResultEnvelope};
pub use crate::filter::{NumberComparison, QueryContext, WorkingSet};
pub use crate::schema::SchemaIndex;
