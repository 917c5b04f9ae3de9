use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("missing column {0:?}")]
    MissingColumn(&'static str),

    #[error("column {0:?} has an unexpected type")]
    ColumnType(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
