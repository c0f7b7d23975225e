use chrono::Utc;

use crate::domain::user::NewUser;
use crate::dto::users::UserDto;
use crate::forms::users::{EnsureUserForm, EnsureUserPayload};
use crate::models::config::AdminAllowList;
use crate::repository::{UserReader, UserWriter};

use super::{ServiceError, ServiceResult, classify_storage};

/// Look up a user by Telegram id, creating the record on first contact.
/// Admin status is stamped from the allow-list at creation time.
pub fn ensure_user<R>(
    form: EnsureUserForm,
    admins: &AdminAllowList,
    repo: &R,
) -> ServiceResult<UserDto>
where
    R: UserReader + UserWriter,
{
    let payload = EnsureUserPayload::try_from(form)?;

    match repo.get_user_by_tg_id(payload.tg_id) {
        Ok(Some(user)) => Ok(UserDto::from(user)),
        Ok(None) => {
            let now = Utc::now().naive_utc();
            let user = NewUser {
                tg_id: payload.tg_id,
                is_active: true,
                is_admin: admins.contains(payload.tg_id),
                created_at: now,
                updated_at: now,
            };
            repo.create_user(&user)
                .map(UserDto::from)
                .map_err(|e| classify_storage("create user", e))
        }
        Err(e) => {
            log::error!("Failed to look up user: {e}");
            Err(ServiceError::Internal)
        }
    }
}
