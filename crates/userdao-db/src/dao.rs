//! Data access object for the `users` table.

use rusqlite::OptionalExtension;
use userdao_types::User;

use crate::connection::{ConnectionMaker, DataSourceConfig, SimpleConnectionMaker};
use crate::context::JdbcContext;
use crate::error::{DaoError, DataSourceError};
use crate::schema::create_schema;
use crate::statement::UserStatement;

const SELECT_USER_BY_ID: &str = "SELECT id, name, password FROM users WHERE id = ?1";
const COUNT_USERS: &str = "SELECT COUNT(*) FROM users";

/// Reads and writes [`User`] rows.
///
/// The DAO does not know where its connections come from. It is built with
/// a [`ConnectionMaker`] and routes every operation through a
/// [`JdbcContext`], so each call opens and releases exactly one connection.
#[derive(Debug, Clone)]
pub struct UserDao<M> {
    context: JdbcContext<M>,
}

impl UserDao<SimpleConnectionMaker> {
    /// Builds a DAO over a [`SimpleConnectionMaker`] for `config`.
    ///
    /// # Errors
    ///
    /// Returns `DataSourceError` if the configured URL is not supported.
    pub fn from_config(config: &DataSourceConfig) -> Result<Self, DataSourceError> {
        Ok(Self::new(SimpleConnectionMaker::new(config)?))
    }
}

impl<M: ConnectionMaker> UserDao<M> {
    /// Creates a DAO that draws connections from `maker`.
    pub fn new(maker: M) -> Self {
        Self::with_context(JdbcContext::new(maker))
    }

    /// Creates a DAO on top of an existing context.
    pub fn with_context(context: JdbcContext<M>) -> Self {
        Self { context }
    }

    /// Creates the `users` table if it is missing.
    ///
    /// # Errors
    ///
    /// Returns `DaoError::Connection` or `DaoError::Schema`.
    pub fn ensure_schema(&self) -> Result<(), DaoError> {
        self.context
            .with_connection(|conn| create_schema(conn).map_err(DaoError::Schema))
    }

    /// Inserts `user` as a new row.
    ///
    /// # Errors
    ///
    /// Returns `DaoError::Persistence` if the insert fails, including when a
    /// row with the same id already exists (see
    /// [`DaoError::is_constraint_violation`]).
    pub fn add(&self, user: &User) -> Result<(), DaoError> {
        self.context.run(&UserStatement::Insert(user))?;
        tracing::debug!(id = %user.id, "added user");
        Ok(())
    }

    /// Fetches the user with the given id.
    ///
    /// # Errors
    ///
    /// Returns `DaoError::RecordNotFound` if no row has this id, or
    /// `DaoError::Query` if the select fails.
    pub fn get(&self, id: &str) -> Result<User, DaoError> {
        self.context.with_connection(|conn| {
            let mut stmt = conn
                .prepare(SELECT_USER_BY_ID)
                .map_err(DaoError::StatementBuild)?;

            let user = stmt
                .query_row([id], |row| {
                    Ok(User {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        password: row.get("password")?,
                    })
                })
                .optional()
                .map_err(DaoError::Query)?;

            user.ok_or_else(|| DaoError::RecordNotFound { id: id.to_string() })
        })
    }

    /// Deletes every row in the table.
    ///
    /// # Errors
    ///
    /// Returns `DaoError::Persistence` if the delete fails.
    pub fn delete_all(&self) -> Result<(), DaoError> {
        let removed = self.context.run(&UserStatement::DeleteAll)?;
        tracing::debug!(removed, "deleted all users");
        Ok(())
    }

    /// Returns the number of rows in the table.
    ///
    /// # Errors
    ///
    /// Returns `DaoError::Query` if the count fails.
    pub fn count(&self) -> Result<u64, DaoError> {
        self.context.with_connection(|conn| {
            let count: i64 = conn
                .query_row(COUNT_USERS, [], |row| row.get(0))
                .map_err(DaoError::Query)?;
            Ok(u64::try_from(count).unwrap_or_default())
        })
    }
}
