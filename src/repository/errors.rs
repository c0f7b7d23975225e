//! Repository error taxonomy.
//!
//! Existence checks in the service layer are advisory only; the store's
//! uniqueness and foreign-key constraints evaluated at commit time are the
//! authoritative enforcement. The `From<diesel::result::Error>` impl below
//! classifies those commit-time failures into typed outcomes so the service
//! layer can surface a precise error without holding any locks up front.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Convenient alias for results returned from repository methods.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Classified storage-layer failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Could not obtain a connection from the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// The targeted record disappeared between lookup and mutation.
    #[error("record not found")]
    NotFound,
    /// A unique index rejected the write; carries the `table.column` pair
    /// reported by SQLite, e.g. `products.slug`.
    #[error("unique constraint violation on {0}")]
    UniqueViolation(String),
    /// A foreign key rejected the write (dangling reference).
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
    /// A persisted row no longer satisfies a domain constraint.
    #[error("validation error: {0}")]
    Validation(String),
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match &err {
            Error::NotFound => RepositoryError::NotFound,
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RepositoryError::UniqueViolation(constraint_from_message(info.message()))
            }
            Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                RepositoryError::ForeignKeyViolation(info.message().to_string())
            }
            _ => RepositoryError::Database(err),
        }
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(err: TypeConstraintError) -> Self {
        RepositoryError::Validation(err.to_string())
    }
}

/// SQLite phrases unique violations as
/// `UNIQUE constraint failed: products.slug`; keep the `table.column` tail
/// as the conflict identifier.
fn constraint_from_message(message: &str) -> String {
    message
        .rsplit(':')
        .next()
        .map(str::trim)
        .unwrap_or(message)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_constraint_from_sqlite_message() {
        assert_eq!(
            constraint_from_message("UNIQUE constraint failed: products.slug"),
            "products.slug"
        );
        assert_eq!(constraint_from_message("weird message"), "weird message");
    }

    #[test]
    fn classifies_not_found() {
        let err = RepositoryError::from(diesel::result::Error::NotFound);
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
