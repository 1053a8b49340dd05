//! Error types for the LightBnB data-access layer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Statement exceeded caller deadline: {statement}")]
    Timeout { statement: String },

    #[error("Row decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the failure came from the store itself (connection, constraint, bad parameter).
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Timeout { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
