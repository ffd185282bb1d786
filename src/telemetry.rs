use tracing_subscriber::EnvFilter;

use crate::settings::AppConfig;

const DEFAULT_FILTER: &str = "info,anonstreak=debug";

/// Installs the global subscriber. `RUST_LOG` wins over the default filter;
/// production emits one JSON object per line.
///
/// Calling it twice is harmless, the second call is ignored.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
