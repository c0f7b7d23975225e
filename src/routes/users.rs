use actix_web::{HttpResponse, Responder, post, web};

use crate::forms::users::EnsureUserForm;
use crate::models::config::AdminAllowList;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::users::ensure_user as ensure_user_service;

#[post("/users/ensure")]
pub async fn ensure_user(
    form: web::Json<EnsureUserForm>,
    admins: web::Data<AdminAllowList>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match ensure_user_service(form.into_inner(), admins.get_ref(), repo.get_ref()) {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => error_response(err),
    }
}
