pub mod image;
pub mod media_host;
pub mod sqlx_repo;
pub mod visitor;
