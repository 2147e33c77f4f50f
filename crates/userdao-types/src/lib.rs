//! Shared types for the userdao workspace.
//!
//! This crate holds the in-memory [`User`] record that the data access layer
//! persists to and reconstructs from the `users` table. It has no database
//! dependency so callers can build and inspect records without pulling in
//! the SQLite stack.

use std::fmt;

/// A single row of the `users` table.
///
/// The password is stored as given, in plaintext. That matches the table
/// layout but is a known weakness: it must be replaced with a password hash
/// before this type is used for real credentials. To keep the plaintext out
/// of logs, the [`Debug`] implementation redacts it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct User {
    /// Primary key of the row.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Plaintext password.
    pub password: String,
}

impl User {
    /// Builds a record from its three column values.
    pub fn new(id: impl Into<String>, name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_copies_all_fields() {
        let user = User::new("leeho", "Lee Ho", "25");
        assert_eq!(user.id, "leeho");
        assert_eq!(user.name, "Lee Ho");
        assert_eq!(user.password, "25");
    }

    #[test]
    fn debug_output_redacts_password() {
        let user = User::new("leeho", "Lee Ho", "s3cret-pw");
        let rendered = format!("{user:?}");
        assert!(rendered.contains("leeho"));
        assert!(rendered.contains("Lee Ho"));
        assert!(
            !rendered.contains("s3cret-pw"),
            "password leaked into debug output: {rendered}"
        );
    }

    #[test]
    fn equality_compares_every_field() {
        let a = User::new("leeho", "Lee Ho", "25");
        let mut b = a.clone();
        assert_eq!(a, b);
        b.password = "26".to_string();
        assert_ne!(a, b);
    }
}
