use actix_web::web::{Data, Json};
use actix_web::{get, post, HttpResponse, Result};
use validator::Validate;

use super::ErrorResponse;
use crate::models::notification::{BulkDispatchResponse, BulkNotificationRequest, NotificationRequest};
use crate::services::database::DatabaseService;
use crate::services::notification::NotificationService;

#[post("")]
pub async fn send_notification(
    service: Data<NotificationService>,
    payload: Json<NotificationRequest>,
) -> Result<HttpResponse> {
    if let Err(errors) = payload.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::new(errors.to_string())));
    }

    match service.send_notification(&payload).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(outcome)),
        Err(e) => Ok(HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()))),
    }
}

#[post("/bulk")]
pub async fn send_bulk_notifications(
    service: Data<NotificationService>,
    payload: Json<BulkNotificationRequest>,
) -> Result<HttpResponse> {
    let results = service.send_bulk(&payload.students).await;
    Ok(HttpResponse::Ok().json(BulkDispatchResponse {
        success: true,
        results,
    }))
}

#[get("/history")]
pub async fn notification_history(db: Data<DatabaseService>) -> Result<HttpResponse> {
    match db.list_notifications().await {
        Ok(records) => Ok(HttpResponse::Ok().json(records)),
        Err(e) => {
            log::error!("Failed to load notification history: {:#}", e);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string())))
        }
    }
}
