use actix_web::{HttpResponse, Responder, get, web};
use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "msg": "TG Shop Backend is running"
    }))
}

#[get("/health")]
pub async fn health(pool: web::Data<DbPool>) -> impl Responder {
    let database = match pool.get() {
        Ok(mut conn) => match diesel::sql_query("SELECT 1").execute(&mut conn) {
            Ok(_) => "ok",
            Err(_) => "failed",
        },
        Err(_) => "failed",
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "time_utc": Utc::now().to_rfc3339(),
        "database": database
    }))
}
