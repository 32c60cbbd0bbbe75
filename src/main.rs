mod config;
mod handlers;
mod models;
mod services;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::web::Data;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

use services::{
    brevo::BrevoService, database::DatabaseService, notification::NotificationService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = config::Config::from_env().expect("Failed to load configuration");

    let database_service = DatabaseService::new(&config.database_url)
        .await
        .expect("Failed to initialize database");

    if config.seed_demo_data {
        database_service
            .seed_demo_data()
            .await
            .expect("Failed to seed demo data");
    }

    let brevo_service = BrevoService::new(config.brevo.clone());
    let notification_service = Data::new(NotificationService::new(
        Arc::new(brevo_service),
        Arc::new(database_service.clone()),
    ));
    let database_service = Data::new(database_service);

    println!("🚀 Starting Student Management Server on {}", config.bind_address);
    println!("API Documentation:");
    println!("  GET  /students - List students with subjects");
    println!("  GET  /students/{{student_id}} - Get one student");
    println!("  POST /notifications - Send a parent notification");
    println!("  POST /notifications/bulk - Send bulk notifications");
    println!("  GET  /notifications/history - Notification audit trail");
    println!("  GET  /health - Health check");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(database_service.clone())
            .app_data(notification_service.clone())
            .service(
                web::scope("/students")
                    .service(handlers::students::list_students)
                    .service(handlers::students::get_student),
            )
            .service(
                web::scope("/notifications")
                    .service(handlers::notifications::send_bulk_notifications)
                    .service(handlers::notifications::notification_history)
                    .service(handlers::notifications::send_notification),
            )
            .route("/health", web::get().to(handlers::health::health_check))
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
