use crate::model::GenericError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A required connection setting was absent; carries the setting name.
    #[error("required setting {0} is not set")]
    ConfigurationMissing(&'static str),

    #[error("failed to connect to order store: {0}")]
    ConnectionFailed(#[source] GenericError),

    #[error("failed to query orders: {0}")]
    StorageQueryFailed(#[source] GenericError),

    #[error("failed to decode order: {0}")]
    DecodeFailed(#[source] GenericError),

    #[error("order {0} not found")]
    NotFound(String),

    #[error("failed to write orders: {0}")]
    StorageWriteFailed(#[source] GenericError),

    /// The operation was abandoned when its deadline passed.
    #[error("{0} did not complete before its deadline")]
    DeadlineExceeded(&'static str),
}

impl RepositoryError {
    pub fn query(err: impl Into<GenericError>) -> Self {
        Self::StorageQueryFailed(err.into())
    }

    pub fn decode(err: impl Into<GenericError>) -> Self {
        Self::DecodeFailed(err.into())
    }

    pub fn write(err: impl Into<GenericError>) -> Self {
        Self::StorageWriteFailed(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
