// Copyright 2025 Alexandre D. Díaz
use thiserror::Error;

pub type Result<T, E = DataError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DataError {
    /// The statement (or the connection it needed) failed. Carries the driver message untouched.
    #[error("{0}")]
    Query(String),

    #[error("no row in '{table}' matches on '{field}'")]
    NotFound { table: String, field: String },

    /// A row was fetched but the record could not be rebuilt from it.
    #[error("can't map row: {0}")]
    Mapping(String),
}

impl From<rusqlite::Error> for DataError {
    fn from(err: rusqlite::Error) -> Self {
        DataError::Query(err.to_string())
    }
}

impl From<r2d2::Error> for DataError {
    fn from(err: r2d2::Error) -> Self {
        DataError::Query(err.to_string())
    }
}
