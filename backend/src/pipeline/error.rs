//! Errors raised inside a pipeline pass.

use thiserror::Error;

use crate::services::ServiceError;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// An argument could not be decoded into the type the action expects.
    #[error("{0}")]
    Binding(String),
}

impl ActionError {
    /// Short kind name written to the error log.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::Service(err) => err.kind(),
            ActionError::Binding(_) => "BindingError",
        }
    }
}

impl From<crate::db::RepositoryError> for ActionError {
    fn from(err: crate::db::RepositoryError) -> Self {
        ActionError::Service(ServiceError::Repository(err))
    }
}
