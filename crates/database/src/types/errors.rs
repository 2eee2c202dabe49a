//! Error types for the database layer

use std::fmt;

use thiserror::Error;

/// Column of the `users` table that carries a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    Phone,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
            UniqueField::Phone => "phone",
        }
    }

    fn from_column(column: &str) -> Option<Self> {
        match column {
            "username" => Some(UniqueField::Username),
            "email" => Some(UniqueField::Email),
            "phone" => Some(UniqueField::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-level failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write was rejected by a uniqueness constraint. `None` when the
    /// violated column could not be identified.
    #[error("unique constraint violated on {}", field_name(.0))]
    Conflict(Option<UniqueField>),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

fn field_name(field: &Option<UniqueField>) -> &'static str {
    field.map(|f| f.as_str()).unwrap_or("unknown field")
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(violated_field(db_err.message()));
            }
        }
        StoreError::Database(err)
    }
}

/// Pull the violated column out of a driver message.
///
/// SQLite reports `UNIQUE constraint failed: users.email`; Postgres-style
/// messages mention the constraint name (`users_email_key`), so a plain
/// substring scan is the fallback.
pub(crate) fn violated_field(message: &str) -> Option<UniqueField> {
    if let Some((_, columns)) = message.split_once("constraint failed:") {
        let found = columns
            .split(',')
            .filter_map(|qualified| qualified.trim().rsplit('.').next())
            .find_map(UniqueField::from_column);
        if found.is_some() {
            return found;
        }
    }

    let lowered = message.to_ascii_lowercase();
    [UniqueField::Username, UniqueField::Email, UniqueField::Phone]
        .into_iter()
        .find(|field| lowered.contains(field.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_unique_messages() {
        assert_eq!(
            violated_field("UNIQUE constraint failed: users.username"),
            Some(UniqueField::Username)
        );
        assert_eq!(
            violated_field("UNIQUE constraint failed: users.email"),
            Some(UniqueField::Email)
        );
        assert_eq!(
            violated_field("UNIQUE constraint failed: users.phone"),
            Some(UniqueField::Phone)
        );
    }

    #[test]
    fn falls_back_to_substring_scan() {
        assert_eq!(
            violated_field(
                "duplicate key value violates unique constraint \"users_phone_key\""
            ),
            Some(UniqueField::Phone)
        );
    }

    #[test]
    fn unknown_column_yields_none() {
        assert_eq!(violated_field("UNIQUE constraint failed: users.nickname"), None);
        assert_eq!(violated_field("constraint violated"), None);
    }

    #[test]
    fn conflict_messages_name_the_field() {
        assert_eq!(
            StoreError::Conflict(Some(UniqueField::Email)).to_string(),
            "unique constraint violated on email"
        );
        assert_eq!(
            StoreError::Conflict(None).to_string(),
            "unique constraint violated on unknown field"
        );
    }
}
