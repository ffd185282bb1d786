use actix_web::{post, web, HttpResponse};

use crate::{entities::action::ActionResponse, errors::AppError, handlers::cache::no_store, AppState};

#[post("/uploads/signature")]
pub async fn upload_signature(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let credentials = state.gallery_handler.request_upload_credentials()?;

    Ok(HttpResponse::Ok()
        .insert_header(no_store())
        .json(ActionResponse::ok(credentials)))
}
