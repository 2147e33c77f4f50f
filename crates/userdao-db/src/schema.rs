//! Schema bootstrap for the `users` table.
//!
//! The DDL is embedded at compile time. It is idempotent and carries no
//! version tracking: the table either exists or is created.

use rusqlite::Connection;

const USERS_SCHEMA: &str = include_str!("schema/users.sql");

/// Creates the `users` table if it does not exist yet.
///
/// # Errors
///
/// Returns the SQLite error if the DDL fails.
pub fn create_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(USERS_SCHEMA)?;
    tracing::debug!("users schema is present");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_users_table_with_three_columns() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        create_schema(&conn).expect("schema should apply");

        let mut stmt = conn
            .prepare("SELECT name FROM pragma_table_info('users') ORDER BY cid")
            .expect("should prepare table_info query");
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .expect("should query table_info")
            .map(|r| r.expect("should read column name"))
            .collect();

        assert_eq!(columns, ["id", "name", "password"]);
    }

    #[test]
    fn create_schema_is_idempotent() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        create_schema(&conn).expect("first run should succeed");
        create_schema(&conn).expect("second run should succeed");
    }

    #[test]
    fn id_is_the_primary_key() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        create_schema(&conn).expect("schema should apply");

        conn.execute(
            "INSERT INTO users (id, name, password) VALUES ('a', 'A', 'x')",
            [],
        )
        .expect("first insert should succeed");
        let dup = conn.execute(
            "INSERT INTO users (id, name, password) VALUES ('a', 'B', 'y')",
            [],
        );
        assert!(dup.is_err(), "duplicate id should be rejected");
    }
}
