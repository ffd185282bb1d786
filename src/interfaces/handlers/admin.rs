use actix_web::{web, HttpResponse};

use crate::{
    entities::{
        action::ActionResponse,
        image::{DashboardResponse, RemoveImageQuery, VisibilityRequest},
        session::AdminSession,
    },
    errors::AppError,
    handlers::cache::no_store,
    AppState,
};

/// Dashboard data. A failed listing shows as an empty wall rather than an error page.
pub async fn dashboard(
    _admin: AdminSession,
    state: web::Data<AppState>,
) -> HttpResponse {
    let images = state.gallery_handler.list_all().await.unwrap_or_default();
    let visitor_count = state.visitor_handler.count_visits().await;

    HttpResponse::Ok()
        .insert_header(no_store())
        .json(ActionResponse::ok(DashboardResponse {
            total_images: images.len(),
            images,
            visitor_count,
        }))
}

pub async fn list_images(
    _admin: AdminSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let images = state.gallery_handler.list_all().await?;

    Ok(HttpResponse::Ok()
        .insert_header(no_store())
        .json(ActionResponse::ok(images)))
}

pub async fn set_visibility(
    _admin: AdminSession,
    state: web::Data<AppState>,
    image_id: web::Path<String>,
    body: web::Json<VisibilityRequest>,
) -> Result<HttpResponse, AppError> {
    let record = state.gallery_handler
        .set_visibility(&image_id, body.is_public)
        .await?;

    Ok(HttpResponse::Ok().json(ActionResponse::ok(record)))
}

pub async fn remove_image(
    _admin: AdminSession,
    state: web::Data<AppState>,
    image_id: web::Path<String>,
    query: web::Query<RemoveImageQuery>,
) -> Result<HttpResponse, AppError> {
    state.gallery_handler
        .remove(&image_id, &query.public_id)
        .await?;

    Ok(HttpResponse::Ok().json(ActionResponse::done()))
}
