use thiserror::Error;

use crate::domain::types::TelegramId;
use crate::models::config::AdminAllowList;
use crate::repository::errors::RepositoryError;

pub mod categories;
pub mod products;
pub mod users;

/// Terminal, caller-visible outcome of a service operation. None of these
/// are retried internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// No identity was supplied to an admin-gated operation.
    #[error("authentication required")]
    Unauthenticated,
    /// The supplied identity is not on the moderator allow-list.
    #[error("insufficient privileges")]
    Forbidden,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Malformed or missing field, invalid reference or bad pagination.
    #[error("{0}")]
    Validation(String),
    /// A unique constraint rejected the write at commit time.
    #[error("{0} already exists")]
    Conflict(String),
    /// The request body arrived in an unrecognized shape.
    #[error("{0}")]
    UnsupportedEncoding(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Admin gate for mutating operations. The identity itself is trusted as
/// delivered by the transport layer; this only checks allow-list membership.
pub fn ensure_admin(
    identity: Option<TelegramId>,
    admins: &AdminAllowList,
) -> ServiceResult<TelegramId> {
    let tg_id = identity.ok_or(ServiceError::Unauthenticated)?;
    if !admins.contains(tg_id) {
        return Err(ServiceError::Forbidden);
    }
    Ok(tg_id)
}

/// Classify a storage failure into the service taxonomy, logging the ones
/// that indicate infrastructure trouble rather than a caller mistake.
pub(crate) fn classify_storage(action: &str, err: RepositoryError) -> ServiceError {
    if matches!(
        err,
        RepositoryError::Pool(_) | RepositoryError::Database(_) | RepositoryError::Validation(_)
    ) {
        log::error!("Failed to {action}: {err}");
    }
    ServiceError::from(err)
}
