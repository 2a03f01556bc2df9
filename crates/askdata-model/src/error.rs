use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("schema mismatch: expected {expected} values, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("column metadata mismatch: {names} names but {types} types")]
    ColumnTypeMismatch { names: usize, types: usize },
}

pub type DatasetResult<T> = Result<T, DatasetError>;
