use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod telemetry;

pub use domain::{entities, preflight, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{db, media, utils};

use db::postgres::DbPools;
use errors::MediaHostError;
use media::cloudinary::CloudinaryClient;
use repositories::{
    image::ImageRepository,
    media_host::MediaHost,
    sqlx_repo::{SqlxImageRepo, SqlxVisitorRepo},
    visitor::VisitorRepository,
};
use settings::AppConfig;
use use_cases::{gallery::GalleryHandler, session::SessionGate, visitors::VisitorHandler};

pub type SharedImageRepo = Arc<dyn ImageRepository>;
pub type SharedVisitorRepo = Arc<dyn VisitorRepository>;
pub type SharedMediaHost = Arc<dyn MediaHost>;

pub type AppGalleryHandler = GalleryHandler<SharedImageRepo, SharedMediaHost>;
pub type AppVisitorHandler = VisitorHandler<SharedVisitorRepo>;

pub struct AppState {
    pub gallery_handler: AppGalleryHandler,
    pub visitor_handler: AppVisitorHandler,
    pub session_gate: SessionGate,
}

impl AppState {
    pub fn new(config: &AppConfig, pools: DbPools) -> Result<Self, MediaHostError> {
        let media_host = CloudinaryClient::new(config)?;

        Ok(AppState::from_parts(
            config,
            Arc::new(SqlxImageRepo::new(pools.clone())),
            Arc::new(SqlxVisitorRepo::new(pools)),
            Arc::new(media_host),
        ))
    }

    pub fn from_parts(
        config: &AppConfig,
        image_repo: SharedImageRepo,
        visitor_repo: SharedVisitorRepo,
        media_host: SharedMediaHost,
    ) -> Self {
        AppState {
            gallery_handler: GalleryHandler::new(image_repo, media_host),
            visitor_handler: VisitorHandler::new(visitor_repo),
            session_gate: SessionGate::new(config),
        }
    }
}
