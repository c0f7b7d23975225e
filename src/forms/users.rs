use serde::Deserialize;
use validator::Validate;

use crate::domain::types::TelegramId;
use crate::forms::FormError;

/// Body of the ensure-user endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct EnsureUserForm {
    #[validate(range(min = 1, message = "tg_id must be a positive integer"))]
    pub tg_id: i64,
}

/// Validated ensure-user payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnsureUserPayload {
    pub tg_id: TelegramId,
}

impl TryFrom<EnsureUserForm> for EnsureUserPayload {
    type Error = FormError;

    fn try_from(form: EnsureUserForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            tg_id: TelegramId::new(form.tg_id)?,
        })
    }
}
