use actix_web::web::{Data, Path};
use actix_web::{get, HttpResponse, Result};

use super::ErrorResponse;
use crate::services::database::DatabaseService;

#[get("")]
pub async fn list_students(db: Data<DatabaseService>) -> Result<HttpResponse> {
    match db.list_students().await {
        Ok(students) => Ok(HttpResponse::Ok().json(students)),
        Err(e) => {
            log::error!("Failed to list students: {:#}", e);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string())))
        }
    }
}

#[get("/{student_id}")]
pub async fn get_student(db: Data<DatabaseService>, path: Path<String>) -> Result<HttpResponse> {
    let student_id = path.into_inner();
    match db.get_student(&student_id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(student)),
        Ok(None) => Ok(HttpResponse::NotFound().json(ErrorResponse::new("Student not found"))),
        Err(e) => {
            log::error!("Failed to load student {}: {:#}", student_id, e);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string())))
        }
    }
}
