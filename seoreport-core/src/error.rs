use seoreport_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    ApiError(#[from] ApiError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Record {index} of {name} is not a flat object")]
    NotAnObject { name: String, index: usize },
}

pub type Result<T> = std::result::Result<T, ReportError>;
