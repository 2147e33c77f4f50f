//! Command-line wiring for the userdao data access layer.
//!
//! Loads configuration, sets up logging, assembles a [`UserDao`] over the
//! configured data source and runs the register-then-fetch demo.

pub mod config;

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use userdao_db::{DaoError, DataSourceConfig, DataSourceError, UserDao};
use userdao_types::User;

pub use config::{load_config, resolve_config_path, Config, ConfigError, LoggingConfig};

/// Errors that end a demo run.
#[derive(Debug, Error)]
pub enum DemoError {
    /// The configured data source could not be resolved.
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    /// A DAO operation failed.
    #[error(transparent)]
    Dao(#[from] DaoError),
}

/// Installs the global tracing subscriber described by `logging`.
///
/// Falls back to the `info` level if the filter string does not parse.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// The user registered by the demo.
pub fn demo_user() -> User {
    User::new("leeho", "Lee Ho", "25")
}

/// Clears the table, registers [`demo_user`] and reads it back.
///
/// # Errors
///
/// Returns `DemoError` if the data source cannot be resolved or any DAO
/// operation fails.
pub fn run_demo(database: &DataSourceConfig) -> Result<User, DemoError> {
    let dao = UserDao::from_config(database)?;
    dao.ensure_schema()?;
    dao.delete_all()?;

    let user = demo_user();
    dao.add(&user)?;
    tracing::info!(id = %user.id, "registered user");

    let fetched = dao.get(&user.id)?;
    tracing::info!(id = %fetched.id, name = %fetched.name, "fetched user");

    Ok(fetched)
}
