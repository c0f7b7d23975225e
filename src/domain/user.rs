use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{TelegramId, UserId};

/// A shop user identified by their Telegram id. Admin status mirrors the
/// configured allow-list at the time the record was created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub tg_id: TelegramId,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`User`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUser {
    pub tg_id: TelegramId,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
