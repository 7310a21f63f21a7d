use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("report store unavailable: {0}")]
    StoreUnavailable(#[source] rusqlite::Error),

    #[error("could not decode report row: {0}")]
    Decode(#[source] rusqlite::Error),

    #[error("non-exist host {0}")]
    UnknownHost(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("could not read hosts file {}: {source}", path.display())]
    HostsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<rusqlite::Error> for Error {
    /// Row-level conversion failures are decode errors, everything else means
    /// the store could not serve the query.
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
            | rusqlite::Error::InvalidColumnIndex(_)
            | rusqlite::Error::InvalidColumnName(_) => Self::Decode(value),
            _ => Self::StoreUnavailable(value),
        }
    }
}
