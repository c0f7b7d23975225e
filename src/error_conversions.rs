//! Error conversion glue between the form, repository and service layers.
//!
//! The domain and repository layers must not depend on service error types;
//! the conversions live here so `?` works across layer boundaries in the
//! services without manual mapping at every call site.

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::UnsupportedEncoding(msg) => ServiceError::UnsupportedEncoding(msg.into()),
            FormError::Validation(msg) => ServiceError::Validation(msg),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation(constraint) => ServiceError::Conflict(constraint),
            RepositoryError::ForeignKeyViolation(_) => {
                ServiceError::Validation("referenced entity does not exist".to_string())
            }
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Pool(_)
            | RepositoryError::Validation(_)
            | RepositoryError::Database(_) => ServiceError::Internal,
        }
    }
}
