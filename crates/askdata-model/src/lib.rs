//! `askdata-model` holds the tabular data the question engine runs against.
//!
//! - [`Value`]: a single typed cell (number, text, boolean or blank)
//! - [`Dataset`]: ordered typed columns plus rows, never edited in place by consumers
//! - [`import`]: CSV ingestion with per-column type inference

#![forbid(unsafe_code)]

mod dataset;
mod error;
pub mod import;
mod value;

pub use crate::dataset::{ColumnSchema, ColumnType, Dataset};
pub use crate::error::{DatasetError, DatasetResult};
pub use crate::import::{
    import_csv, import_csv_path, CsvImportError, CsvOptions, TextEncoding, DEFAULT_MISSING_VALUES,
};
pub use crate::value::Value;
