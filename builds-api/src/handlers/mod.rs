pub mod claims;
pub mod contact;
pub mod favicon;
pub mod likes;
pub mod projects;
pub mod uploads;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::database::Database;

pub async fn health(db: web::Data<Arc<Database>>) -> impl Responder {
    match db.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(e) => {
            tracing::error!("Health check failed: {:#}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "database": "disconnected"
            }))
        }
    }
}

/// Route table shared by the server and the HTTP tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health)).service(
        web::scope("/api")
            .route("/projects", web::get().to(projects::list_projects))
            .route("/projects", web::post().to(projects::create_project))
            .route("/projects/{slug}", web::get().to(projects::get_project))
            .route("/check-slug", web::get().to(projects::check_slug))
            .route("/claim-build", web::post().to(claims::claim_build))
            .route("/verify-claim", web::get().to(claims::verify_claim))
            .route("/contact", web::post().to(contact::send_contact))
            .route("/like", web::post().to(likes::toggle_like))
            .route("/like", web::get().to(likes::like_status))
            .route("/upload", web::post().to(uploads::upload_image))
            .route("/favicon", web::get().to(favicon::favicon)),
    );
}
