use actix_web::web::Data;
use actix_web::{HttpResponse, Result};
use serde_json::json;

use super::ErrorResponse;
use crate::services::database::DatabaseService;

pub async fn health_check(db: Data<DatabaseService>) -> Result<HttpResponse> {
    match db.health_check().await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "status": "ok" }))),
        Err(e) => {
            log::error!("Health check failed: {:#}", e);
            Ok(HttpResponse::ServiceUnavailable().json(ErrorResponse::new(e.to_string())))
        }
    }
}
