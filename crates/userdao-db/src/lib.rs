//! Data access layer for the `users` table.
//!
//! Provides a pluggable connection source, single-statement strategies, a
//! scoped execution context and the [`UserDao`] built on top of them.
//!
//! # Design decisions
//!
//! - **One connection per operation**: [`ConnectionMaker`] implementations
//!   open a fresh connection on every call. There is no pool and no caching.
//! - **Scoped release**: [`JdbcContext::with_connection`] is the only place a
//!   connection is acquired. A drop guard hands it back to the maker on every
//!   exit path, and release failures are logged rather than returned.
//! - **Strategies build, the context executes**: a [`StatementStrategy`]
//!   prepares and binds one statement. Running it is left to the context so
//!   resource handling is written once.
//! - **Explicit not-found**: [`UserDao::get`] returns
//!   [`DaoError::RecordNotFound`] when no row matches.

mod connection;
mod context;
mod dao;
mod error;
mod schema;
mod statement;

pub use connection::{ConnectionMaker, DataSourceConfig, Driver, SimpleConnectionMaker};
pub use context::JdbcContext;
pub use dao::UserDao;
pub use error::{ConnectionError, DaoError, DataSourceError};
pub use schema::create_schema;
pub use statement::{StatementStrategy, UserStatement};
