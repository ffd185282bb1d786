use actix_web::web;

use crate::handlers::{admin, session, system::admin_health_check};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(web::resource("").route(web::get().to(session::login_page)))
            .service(web::resource("/login").route(web::post().to(session::login)))
            .service(web::resource("/logout").route(web::post().to(session::logout)))
            .service(web::resource("/dashboard").route(web::get().to(admin::dashboard)))
            .service(web::resource("/images").route(web::get().to(admin::list_images)))
            .service(
                web::resource("/images/{image_id}")
                    .route(web::patch().to(admin::set_visibility))
                    .route(web::delete().to(admin::remove_image))
            )
            .service(admin_health_check)
    );
}
