use actix_web::{get, web, HttpResponse, Responder};

use crate::AppState;

#[get("/")]
pub async fn home(state: web::Data<AppState>) -> impl Responder {
    state.visitor_handler.record_visit().await;

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to AnonStreak!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
