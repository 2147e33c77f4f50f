//! Statement strategies.
//!
//! A strategy knows how to build exactly one prepared statement against a
//! connection it is handed. It binds its parameters but never executes the
//! statement; execution belongs to [`JdbcContext`](crate::JdbcContext).

use rusqlite::{Connection, Statement};
use userdao_types::User;

use crate::error::DaoError;

/// Builds one prepared statement against an open connection.
pub trait StatementStrategy {
    /// Prepares the statement and binds every placeholder.
    ///
    /// # Errors
    ///
    /// Returns `DaoError::StatementBuild` if preparation or binding fails.
    fn make_statement<'c>(&self, conn: &'c Connection) -> Result<Statement<'c>, DaoError>;

    /// Short label recorded in the `statement` log field when executed.
    fn label(&self) -> &'static str {
        "statement"
    }
}

const INSERT_USER: &str = "INSERT INTO users (id, name, password) VALUES (?1, ?2, ?3)";
const DELETE_ALL_USERS: &str = "DELETE FROM users";

/// The write statements issued against the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatement<'a> {
    /// Insert one user row.
    Insert(&'a User),
    /// Delete every row.
    DeleteAll,
}

impl UserStatement<'_> {
    /// The SQL text this statement prepares.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Insert(_) => INSERT_USER,
            Self::DeleteAll => DELETE_ALL_USERS,
        }
    }
}

impl StatementStrategy for UserStatement<'_> {
    fn make_statement<'c>(&self, conn: &'c Connection) -> Result<Statement<'c>, DaoError> {
        let mut stmt = conn.prepare(self.sql()).map_err(DaoError::StatementBuild)?;

        if let Self::Insert(user) = self {
            stmt.raw_bind_parameter(1, user.id.as_str())
                .map_err(DaoError::StatementBuild)?;
            stmt.raw_bind_parameter(2, user.name.as_str())
                .map_err(DaoError::StatementBuild)?;
            stmt.raw_bind_parameter(3, user.password.as_str())
                .map_err(DaoError::StatementBuild)?;
        }

        Ok(stmt)
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::DeleteAll => "delete_all",
        }
    }
}
