use actix_multipart::Multipart;
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;

use crate::domain::types::TelegramId;
use crate::forms::RawBody;
use crate::services::ServiceError;

pub mod categories;
pub mod main;
pub mod products;
pub mod users;

/// Extract the caller's Telegram identity from the `X-Telegram-Id` header,
/// falling back to a `tg_id` query parameter for manual testing from a
/// browser. Verifying that the id is genuine is the calling environment's
/// responsibility.
pub(crate) fn telegram_id(req: &HttpRequest) -> Option<TelegramId> {
    let from_header = req
        .headers()
        .get("X-Telegram-Id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok());

    let from_query = || {
        serde_urlencoded::from_str::<Vec<(String, String)>>(req.query_string())
            .ok()?
            .into_iter()
            .find(|(key, _)| key == "tg_id")
            .and_then(|(_, value)| value.trim().parse::<i64>().ok())
    };

    from_header
        .or_else(from_query)
        .and_then(|id| TelegramId::new(id).ok())
}

/// Map a service failure onto the HTTP surface. The body mirrors the
/// `{"detail": ...}` shape the existing clients expect.
pub(crate) fn error_response(err: ServiceError) -> HttpResponse {
    let status = match &err {
        ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
        ServiceError::Forbidden => StatusCode::FORBIDDEN,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::UnsupportedEncoding(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpResponse::build(status).json(serde_json::json!({ "detail": err.to_string() }))
}

/// Decode a mutating request body into [`RawBody`] according to its
/// content type. JSON, urlencoded and multipart shapes are accepted;
/// anything else is an unsupported encoding.
pub(crate) async fn read_body(
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<RawBody, ServiceError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.contains("application/json") {
        let bytes = collect_bytes(payload).await?;
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Validation(format!("malformed JSON body: {e}")))?;
        Ok(RawBody::Json(value))
    } else if content_type.contains("multipart/form-data") {
        read_multipart(req, payload).await
    } else if content_type.contains("application/x-www-form-urlencoded") {
        let bytes = collect_bytes(payload).await?;
        let pairs = serde_urlencoded::from_bytes::<Vec<(String, String)>>(&bytes)
            .map_err(|e| ServiceError::Validation(format!("malformed form body: {e}")))?;
        Ok(RawBody::Form(pairs))
    } else {
        Err(ServiceError::UnsupportedEncoding(
            "unsupported media type".to_string(),
        ))
    }
}

async fn collect_bytes(mut payload: web::Payload) -> Result<web::Bytes, ServiceError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk
            .map_err(|e| ServiceError::Validation(format!("failed to read request body: {e}")))?;
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

async fn read_multipart(
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<RawBody, ServiceError> {
    let mut multipart = Multipart::new(req.headers(), payload);
    let mut pairs = Vec::new();

    while let Some(field) = multipart.next().await {
        let mut field = field
            .map_err(|e| ServiceError::Validation(format!("malformed multipart body: {e}")))?;
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let mut value = web::BytesMut::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| ServiceError::Validation(format!("malformed multipart body: {e}")))?;
            value.extend_from_slice(&chunk);
        }
        pairs.push((name, String::from_utf8_lossy(&value).into_owned()));
    }

    Ok(RawBody::Form(pairs))
}
