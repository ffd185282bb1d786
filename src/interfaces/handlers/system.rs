use actix_web::{get, web, HttpResponse, Responder};
use humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

use crate::{
    constants::START_TIME,
    db::postgres::Access,
    entities::session::AdminSession,
    handlers::cache::no_store,
    repositories::image::ImageRepository,
    AppState,
};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    today_date: String,
    public_database: String,
    privileged_database: String,
    version: String,
}

fn connection_status<E>(result: Result<(), E>) -> String {
    match result {
        Ok(_) => "OK".to_string(),
        Err(_) => "Unavailable".to_string(),
    }
}

#[get("/health")]
pub async fn admin_health_check(
    _admin: AdminSession,
    state: web::Data<AppState>,
) -> impl Responder {
    let now_utc = chrono::Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime.num_seconds().max(0) as u64));

    let repo = &state.gallery_handler.image_repo;
    let public_database = connection_status(repo.check_connection(Access::Public).await);
    let privileged_database = connection_status(repo.check_connection(Access::Privileged).await);

    let status = if public_database == "OK" && privileged_database == "OK" {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok()
        .insert_header(no_store())
        .json(HealthCheckResponse {
            status: status.to_string(),
            uptime: human_uptime.to_string(),
            timestamp: now_utc.to_rfc3339(),
            start_at: START_TIME.to_rfc3339(),
            today_date: now_utc.date_naive().to_string(),
            public_database,
            privileged_database,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
}
