use serde::Serialize;

use crate::domain::user::User;

/// Wire representation of a user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: i32,
    pub tg_id: i64,
    pub is_admin: bool,
    pub is_active: bool,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.get(),
            tg_id: value.tg_id.get(),
            is_admin: value.is_admin,
            is_active: value.is_active,
        }
    }
}
