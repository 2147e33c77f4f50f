//! Connection acquisition.
//!
//! [`ConnectionMaker`] is the seam between callers and the source of their
//! connections. The data access object never opens a connection itself; it
//! asks whichever maker it was built with. [`SimpleConnectionMaker`] is the
//! production implementation, opening a fresh SQLite connection per call.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use serde::Deserialize;

use crate::error::{ConnectionError, DataSourceError};

/// A source of open database connections.
///
/// Every call to [`make_connection`](Self::make_connection) must return a new
/// connection. Connections are handed back through
/// [`release`](Self::release) once the caller is done with them.
pub trait ConnectionMaker {
    /// Opens a new connection.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the database cannot be reached or
    /// rejects the connection.
    fn make_connection(&self) -> Result<Connection, ConnectionError>;

    /// Closes a connection previously returned by this maker.
    ///
    /// # Errors
    ///
    /// Returns the SQLite error reported while closing. The connection is
    /// dropped either way.
    fn release(&self, conn: Connection) -> Result<(), rusqlite::Error> {
        conn.close().map_err(|(_, e)| e)
    }
}

impl<M: ConnectionMaker + ?Sized> ConnectionMaker for &M {
    fn make_connection(&self) -> Result<Connection, ConnectionError> {
        (**self).make_connection()
    }

    fn release(&self, conn: Connection) -> Result<(), rusqlite::Error> {
        (**self).release(conn)
    }
}

impl<M: ConnectionMaker + ?Sized> ConnectionMaker for Box<M> {
    fn make_connection(&self) -> Result<Connection, ConnectionError> {
        (**self).make_connection()
    }

    fn release(&self, conn: Connection) -> Result<(), rusqlite::Error> {
        (**self).release(conn)
    }
}

impl<M: ConnectionMaker + ?Sized> ConnectionMaker for Arc<M> {
    fn make_connection(&self) -> Result<Connection, ConnectionError> {
        (**self).make_connection()
    }

    fn release(&self, conn: Connection) -> Result<(), rusqlite::Error> {
        (**self).release(conn)
    }
}

/// Connection parameters for a data source.
#[derive(Clone, Deserialize)]
pub struct DataSourceConfig {
    /// Database URL, e.g. `sqlite:users.db` or `sqlite:///var/lib/users.db`.
    #[serde(default = "default_url")]
    pub url: String,

    /// User name presented to the database.
    #[serde(default = "default_user")]
    pub user: String,

    /// Password presented to the database.
    #[serde(default)]
    pub password: String,

    /// Busy timeout applied to each connection, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_url() -> String {
    "sqlite:users.db".to_string()
}

fn default_user() -> String {
    "sa".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            user: default_user(),
            password: String::new(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl fmt::Debug for DataSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .finish()
    }
}

/// A database driver resolved from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Driver {
    /// An SQLite database file.
    Sqlite {
        /// Path to the database file.
        path: PathBuf,
    },
}

impl Driver {
    /// Resolves the driver named by `url`.
    ///
    /// Accepted forms are `sqlite:<path>` and `sqlite://<path>`.
    ///
    /// # Errors
    ///
    /// Returns `DataSourceError::UnsupportedDriver` for any other scheme or
    /// an empty path, and `DataSourceError::InMemoryUnsupported` for
    /// `:memory:` databases.
    pub fn from_url(url: &str) -> Result<Self, DataSourceError> {
        let rest = url
            .strip_prefix("sqlite:")
            .ok_or_else(|| DataSourceError::UnsupportedDriver(url.to_string()))?;
        let path = rest.strip_prefix("//").unwrap_or(rest);

        if path.is_empty() {
            return Err(DataSourceError::UnsupportedDriver(url.to_string()));
        }
        if path == ":memory:" || path.starts_with("file::memory:") {
            return Err(DataSourceError::InMemoryUnsupported(url.to_string()));
        }

        Ok(Self::Sqlite {
            path: PathBuf::from(path),
        })
    }
}

/// Opens a fresh connection per call against a fixed data source.
///
/// The driver is resolved once, when the maker is built, rather than on
/// every call. SQLite does not authenticate clients, so the configured user
/// only appears in logs and the password is never read back.
#[derive(Debug, Clone)]
pub struct SimpleConnectionMaker {
    url: String,
    user: String,
    driver: Driver,
    busy_timeout: Duration,
}

impl SimpleConnectionMaker {
    /// Builds a maker from its connection parameters.
    ///
    /// # Errors
    ///
    /// Returns `DataSourceError` if the URL does not resolve to a supported
    /// driver.
    pub fn new(config: &DataSourceConfig) -> Result<Self, DataSourceError> {
        let driver = Driver::from_url(&config.url)?;
        tracing::debug!(url = %config.url, user = %config.user, ?driver, "registered database driver");

        Ok(Self {
            url: config.url.clone(),
            user: config.user.clone(),
            driver,
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
        })
    }
}

impl ConnectionMaker for SimpleConnectionMaker {
    fn make_connection(&self) -> Result<Connection, ConnectionError> {
        let Driver::Sqlite { path } = &self.driver;

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

        let conn =
            Connection::open_with_flags(path, flags).map_err(|source| ConnectionError::Open {
                url: self.url.clone(),
                source,
            })?;

        conn.busy_timeout(self.busy_timeout)
            .map_err(|source| ConnectionError::Configure {
                url: self.url.clone(),
                source,
            })?;

        tracing::debug!(url = %self.url, user = %self.user, "opened database connection");
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_sqlite_urls() {
        assert_eq!(
            Driver::from_url("sqlite:users.db").expect("plain form should resolve"),
            Driver::Sqlite {
                path: PathBuf::from("users.db")
            }
        );
        assert_eq!(
            Driver::from_url("sqlite:///var/lib/users.db").expect("slash form should resolve"),
            Driver::Sqlite {
                path: PathBuf::from("/var/lib/users.db")
            }
        );
    }

    #[test]
    fn rejects_unknown_schemes() {
        for url in ["jdbc:h2:tcp://localhost/~/test", "postgres://localhost/db", "sqlite:", ""] {
            match Driver::from_url(url) {
                Err(DataSourceError::UnsupportedDriver(reported)) => assert_eq!(reported, url),
                other => panic!("expected UnsupportedDriver for {url:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_in_memory_urls() {
        let err = Driver::from_url("sqlite::memory:").expect_err("in-memory should be rejected");
        assert!(matches!(err, DataSourceError::InMemoryUnsupported(_)));
    }

    #[test]
    fn opens_fresh_connections_with_busy_timeout() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("users.db");
        let config = DataSourceConfig {
            url: format!("sqlite:{}", path.display()),
            busy_timeout_ms: 1_500,
            ..DataSourceConfig::default()
        };

        let maker = SimpleConnectionMaker::new(&config).expect("maker should build");
        let first = maker.make_connection().expect("first connection should open");
        let second = maker.make_connection().expect("second connection should open");

        let busy_timeout: i64 = first
            .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
            .expect("should query busy_timeout");
        assert_eq!(busy_timeout, 1_500);

        maker.release(first).expect("first connection should close");
        maker.release(second).expect("second connection should close");
        assert!(path.exists(), "database file should be created on open");
    }

    #[test]
    fn reports_open_failure_with_url() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let url = format!("sqlite:{}", dir.path().join("missing").join("users.db").display());
        let config = DataSourceConfig {
            url: url.clone(),
            ..DataSourceConfig::default()
        };

        let maker = SimpleConnectionMaker::new(&config).expect("maker should build");
        match maker.make_connection() {
            Err(ConnectionError::Open { url: reported, .. }) => assert_eq!(reported, url),
            other => panic!("expected open failure, got {other:?}"),
        }
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = DataSourceConfig {
            password: "hunter2".to_string(),
            ..DataSourceConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"), "password leaked: {rendered}");
    }
}
