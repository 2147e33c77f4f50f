//! Scoped connection handling.
//!
//! [`JdbcContext`] owns a [`ConnectionMaker`] and is the only place in the
//! crate that acquires and releases connections. Every operation runs inside
//! [`JdbcContext::with_connection`], which hands the connection back to the
//! maker when the closure exits, whether it returned an error or panicked.

use rusqlite::Connection;

use crate::connection::ConnectionMaker;
use crate::error::DaoError;
use crate::statement::StatementStrategy;

/// Runs work against connections obtained from a [`ConnectionMaker`].
#[derive(Debug, Clone)]
pub struct JdbcContext<M> {
    maker: M,
}

impl<M: ConnectionMaker> JdbcContext<M> {
    /// Creates a context that draws connections from `maker`.
    pub fn new(maker: M) -> Self {
        Self { maker }
    }

    /// The connection maker this context draws from.
    pub fn maker(&self) -> &M {
        &self.maker
    }

    /// Acquires a connection, runs `work` against it and releases it.
    ///
    /// Release happens on every exit path. A failure while releasing is
    /// logged and dropped so it never replaces the result of `work`.
    ///
    /// # Errors
    ///
    /// Returns `DaoError::Connection` if no connection can be opened, or
    /// whatever error `work` returns.
    pub fn with_connection<T, F>(&self, work: F) -> Result<T, DaoError>
    where
        F: FnOnce(&Connection) -> Result<T, DaoError>,
    {
        let mut guard = ReleaseOnDrop {
            maker: &self.maker,
            conn: None,
        };
        let conn = guard.conn.insert(self.maker.make_connection()?);
        work(&*conn)
    }

    /// Builds the statement described by `strategy`, executes it as an
    /// update and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns `DaoError::Connection` if no connection can be opened,
    /// `DaoError::StatementBuild` if the strategy fails, or
    /// `DaoError::Persistence` if execution fails.
    pub fn run<S>(&self, strategy: &S) -> Result<usize, DaoError>
    where
        S: StatementStrategy + ?Sized,
    {
        self.with_connection(|conn| {
            let mut stmt = strategy.make_statement(conn)?;
            let affected = stmt.raw_execute().map_err(DaoError::Persistence)?;
            tracing::debug!(statement = strategy.label(), affected, "executed statement");

            if let Err(e) = stmt.finalize() {
                tracing::warn!(error = %e, "failed to finalize statement, ignoring");
            }

            Ok(affected)
        })
    }
}

/// Hands a connection back to its maker when dropped.
///
/// `conn` is `None` only until the connection has been opened.
struct ReleaseOnDrop<'a, M: ConnectionMaker> {
    maker: &'a M,
    conn: Option<Connection>,
}

impl<M: ConnectionMaker> Drop for ReleaseOnDrop<'_, M> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            match self.maker.release(conn) {
                Ok(()) => tracing::debug!("released database connection"),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to release database connection, ignoring")
                }
            }
        }
    }
}
