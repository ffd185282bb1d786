use actix_web::web;

use crate::handlers::home::home;

mod admin;
mod api;
mod json_error;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api/v1")
            .configure(api::config_routes)
    );

    cfg.configure(admin::config_routes);
    cfg.configure(json_error::config_routes);
}
