use actix_web::web;

use crate::handlers::{images, uploads};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(uploads::upload_signature)
        .service(images::record_upload)
        .service(images::public_images);
}
