use actix_cors::Cors;
use anyhow::Context;
use actix_web::{http::{header, Method}, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use anonstreak::{
    db::postgres::DbPools,
    graceful_shutdown::shutdown_signal,
    middlewares::session::SessionMiddleware,
    routes::configure_routes,
    settings::AppConfig,
    telemetry::init_tracing,
    AppState,
};

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allowed_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin().send_wildcard();
    }

    origins
        .iter()
        .fold(cors.supports_credentials(), |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let pools = DbPools::connect(&config.database_url, &config.privileged_database_url)
        .await
        .context("Failed to create database connection pools")?;

    if config.run_migrations {
        pools.run_migrations()
            .await
            .context("Failed to apply database migrations")?;
    }

    let app_state = web::Data::new(
        AppState::new(&config, pools.clone()).context("Failed to build media host client")?
    );

    let server_addr = format!("{}:{}", config.host, config.port);
    let origins = config.cors_origins();

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(SessionMiddleware)
            .wrap(NormalizePath::trim())
            .wrap(build_cors(&origins))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    let result = tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    };

    pools.close().await;
    tracing::info!("Database pools closed");

    Ok(result?)
}
