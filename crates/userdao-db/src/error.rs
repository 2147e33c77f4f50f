//! Error types for the data access layer.

use thiserror::Error;

/// Errors raised while resolving a data source from its configuration.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// The URL scheme does not name a driver this crate can load.
    #[error("unsupported database driver for url '{0}'")]
    UnsupportedDriver(String),

    /// The URL points at an in-memory database. Every operation opens a
    /// fresh connection, so each one would see an empty database.
    #[error("in-memory database url '{0}' cannot be shared between connections")]
    InMemoryUnsupported(String),
}

/// Errors raised while opening a connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The driver could not open the database.
    #[error("failed to open connection to '{url}': {source}")]
    Open {
        /// The URL the connection was opened against.
        url: String,
        /// The underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// The connection opened but could not be configured.
    #[error("failed to configure connection to '{url}': {source}")]
    Configure {
        /// The URL the connection was opened against.
        url: String,
        /// The underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },
}

/// Errors returned by the user data access object.
#[derive(Debug, Error)]
pub enum DaoError {
    /// No connection could be obtained from the connection maker.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Preparing a statement or binding one of its parameters failed.
    #[error("failed to build statement: {0}")]
    StatementBuild(#[source] rusqlite::Error),

    /// A write statement failed to execute, including constraint violations.
    #[error("failed to persist record: {0}")]
    Persistence(#[source] rusqlite::Error),

    /// A read statement failed to execute or a row could not be mapped.
    #[error("failed to query records: {0}")]
    Query(#[source] rusqlite::Error),

    /// No row matched the requested id.
    #[error("no user found with id '{id}'")]
    RecordNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// The `users` table could not be created.
    #[error("failed to create schema: {0}")]
    Schema(#[source] rusqlite::Error),
}

impl DaoError {
    /// Returns `true` if a write was rejected by a table constraint, such as
    /// a duplicate primary key.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Persistence(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }

    /// Returns `true` if the error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }
}
