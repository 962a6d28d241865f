use std::borrow::Cow;

/// A specialized [`DatabaseError`] enum of this crate.
#[atlas_derive::atlas_error]
pub enum DatabaseError {
    /// Validation errors.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Occurs when connectivity or health checks fail.
    #[error("Database connection failed{}: {message}", format_context(.context))]
    Connection { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Occurs when authentication fails.
    #[error("Authentication failed{}: {message}", format_context(.context))]
    Auth { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A wrapper for underlying `SurrealDB` engine errors.
    #[error("SurrealDB error{}: {source}", format_context(.context))]
    Surreal {
        #[source]
        source: surrealdb::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Migration failures or invariant violations.
    #[error("Migration error{}: {message}", format_context(.context))]
    Migration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A query did not finish within the configured deadline.
    #[error("Query timed out after {elapsed_ms} ms{}", format_context(.context))]
    Timeout { elapsed_ms: u64, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal database error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Engine wording for a write rejected by a `UNIQUE` index:
/// ``Database index `name` already contains 'value', with record `table:id` ``.
const UNIQUE_VIOLATION_MARKER: &str = "already contains";

/// Engine wording for optimistic transaction clashes; the losing writer may retry.
const WRITE_CONFLICT_MARKERS: [&str; 3] =
    ["transaction conflict", "write conflict", "read or write conflict"];

impl DatabaseError {
    /// Whether the engine rejected a write because a `UNIQUE` index already holds the value.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        self.engine_message().is_some_and(|message| is_unique_violation_message(&message))
    }

    /// Whether a concurrent transaction won a race on the same keys; the write can be retried.
    #[must_use]
    pub fn is_write_conflict(&self) -> bool {
        self.engine_message().is_some_and(|message| is_write_conflict_message(&message))
    }

    fn engine_message(&self) -> Option<String> {
        match self {
            Self::Surreal { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }
}

fn is_unique_violation_message(message: &str) -> bool {
    message.contains("index `") && message.contains(UNIQUE_VIOLATION_MARKER)
}

fn is_write_conflict_message(message: &str) -> bool {
    let message = message.to_lowercase();
    WRITE_CONFLICT_MARKERS.iter().any(|marker| message.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_wording() {
        assert!(is_unique_violation_message(
            "Database index `country_name_key` already contains 'chile', with record `country:01J`"
        ));
        assert!(!is_unique_violation_message("Found 'chile' for field `name`, but expected a int"));
    }

    #[test]
    fn write_conflict_wording() {
        assert!(is_write_conflict_message(
            "Transaction conflict: Write conflict, retry the transaction"
        ));
        assert!(is_write_conflict_message(
            "Failed to commit transaction due to a read or write conflict. This transaction can be retried"
        ));
        assert!(!is_write_conflict_message("Database index `item_label` already contains 'a'"));
    }

    #[test]
    fn non_engine_errors_are_neither() {
        let err = DatabaseError::Timeout { elapsed_ms: 5, context: None };
        assert!(!err.is_unique_violation());
        assert!(!err.is_write_conflict());
    }
}
