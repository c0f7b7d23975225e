use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, patch, post, web};

use crate::domain::types::CategoryId;
use crate::models::config::AdminAllowList;
use crate::repository::DieselRepository;
use crate::routes::{error_response, read_body, telegram_id};
use crate::services::ServiceError;
use crate::services::categories::{
    create_category as create_category_service, delete_category as delete_category_service,
    list_categories as list_categories_service, update_category as update_category_service,
};

#[get("/categories")]
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_categories_service(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response(err),
    }
}

#[post("/categories")]
pub async fn create_category(
    req: HttpRequest,
    payload: web::Payload,
    admins: web::Data<AdminAllowList>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let identity = telegram_id(&req);
    let body = match read_body(&req, payload).await {
        Ok(body) => body,
        Err(err) => return error_response(err),
    };

    match create_category_service(body, identity, admins.get_ref(), repo.get_ref()) {
        Ok(category) => HttpResponse::Created().json(category),
        Err(err) => error_response(err),
    }
}

#[patch("/categories/{category_id}")]
pub async fn update_category(
    req: HttpRequest,
    category_id: web::Path<i32>,
    payload: web::Payload,
    admins: web::Data<AdminAllowList>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let identity = telegram_id(&req);
    let id = match CategoryId::new(category_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return error_response(ServiceError::NotFound),
    };
    let body = match read_body(&req, payload).await {
        Ok(body) => body,
        Err(err) => return error_response(err),
    };

    match update_category_service(id, body, identity, admins.get_ref(), repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(err),
    }
}

#[delete("/categories/{category_id}")]
pub async fn delete_category(
    req: HttpRequest,
    category_id: web::Path<i32>,
    admins: web::Data<AdminAllowList>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let identity = telegram_id(&req);
    let id = match CategoryId::new(category_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return error_response(ServiceError::NotFound),
    };

    match delete_category_service(id, identity, admins.get_ref(), repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
