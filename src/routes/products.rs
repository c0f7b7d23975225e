use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, patch, post, web};

use crate::domain::types::ProductId;
use crate::forms::products::ProductListParams;
use crate::models::config::AdminAllowList;
use crate::repository::DieselRepository;
use crate::routes::{error_response, read_body, telegram_id};
use crate::services::ServiceError;
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    get_product as get_product_service, list_products as list_products_service,
    update_product as update_product_service,
};

#[get("/products")]
pub async fn list_products(
    params: web::Query<ProductListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_products_service(params.into_inner(), repo.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err),
    }
}

#[get("/products/{product_id}")]
pub async fn get_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match ProductId::new(product_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return error_response(ServiceError::NotFound),
    };

    match get_product_service(id, repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err),
    }
}

#[post("/products")]
pub async fn create_product(
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

    match create_product_service(body, identity, admins.get_ref(), repo.get_ref()) {
        Ok(product) => HttpResponse::Created().json(product),
        Err(err) => error_response(err),
    }
}

#[patch("/products/{product_id}")]
pub async fn update_product(
    req: HttpRequest,
    product_id: web::Path<i32>,
    payload: web::Payload,
    admins: web::Data<AdminAllowList>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let identity = telegram_id(&req);
    let id = match ProductId::new(product_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return error_response(ServiceError::NotFound),
    };
    let body = match read_body(&req, payload).await {
        Ok(body) => body,
        Err(err) => return error_response(err),
    };

    match update_product_service(id, body, identity, admins.get_ref(), repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    req: HttpRequest,
    product_id: web::Path<i32>,
    admins: web::Data<AdminAllowList>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let identity = telegram_id(&req);
    let id = match ProductId::new(product_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return error_response(ServiceError::NotFound),
    };

    match delete_product_service(id, identity, admins.get_ref(), repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
