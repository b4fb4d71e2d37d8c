//! Service-level errors.

use thiserror::Error;

use super::validation::ValidationErrors;
use crate::db::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected before any repository call.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Request conflicts with stored state (duplicate country, unknown person).
    #[error("{0}")]
    Conflict(String),

    /// Argument outside the accepted set (wrong upload type, empty file).
    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// CSV, spreadsheet, or PDF generation failed.
    #[error("Export failed: {0}")]
    Export(String),
}

impl ServiceError {
    /// Short variant name, used as the error kind in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "ValidationError",
            ServiceError::Conflict(_) => "ConflictError",
            ServiceError::InvalidArgument(_) => "InvalidArgumentError",
            ServiceError::Repository(_) => "RepositoryError",
            ServiceError::Export(_) => "ExportError",
        }
    }
}

impl From<csv::Error> for ServiceError {
    fn from(err: csv::Error) -> Self {
        ServiceError::Export(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ServiceError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ServiceError::Export(err.to_string())
    }
}
