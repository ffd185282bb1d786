use actix_web::{get, post, web, HttpResponse};

use crate::{
    entities::{action::ActionResponse, image::RecordUploadRequest},
    errors::AppError,
    handlers::cache::no_store,
    AppState,
};

#[post("/images")]
pub async fn record_upload(
    state: web::Data<AppState>,
    request: web::Json<RecordUploadRequest>,
) -> Result<HttpResponse, AppError> {
    let record = state.gallery_handler.record_upload(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(ActionResponse::ok(record)))
}

#[get("/images/public")]
pub async fn public_images(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let images = state.gallery_handler.list_public().await?;

    Ok(HttpResponse::Ok()
        .insert_header(no_store())
        .json(ActionResponse::ok(images)))
}
