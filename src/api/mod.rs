pub mod health;
pub mod orders;
pub mod reviews;
pub mod swagger;
pub mod uploads;
pub mod users;

use actix_web::{error, web, HttpResponse};

use crate::utils::AppError;

/// Every route of the service, shared by `main` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .configure(uploads::configure)
        .configure(reviews::configure)
        .configure(users::configure)
        .configure(orders::configure);
}

/// Body extraction failures become 400 `{message}` like every other client error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "message": message })),
        )
        .into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "message": message })),
        )
        .into()
    })
}

/// Client errors keep their own message; anything server-side is logged
/// and answered with `server_message`.
pub(crate) fn failure(err: AppError, server_message: &str) -> HttpResponse {
    match err {
        AppError::Validation(msg) | AppError::InvalidRequest(msg) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "message": msg }))
        }
        AppError::NotFound(msg) => HttpResponse::NotFound().json(serde_json::json!({ "message": msg })),
        AppError::Unauthorized(msg) => {
            HttpResponse::Unauthorized().json(serde_json::json!({ "message": msg }))
        }
        AppError::DatabaseError(_) | AppError::StorageError(_) => {
            log::error!("❌ {}: {}", server_message, err);
            HttpResponse::InternalServerError().json(serde_json::json!({ "message": server_message }))
        }
    }
}
