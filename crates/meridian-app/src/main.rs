use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::session::{CookieStore, SessionHandler};
use salvo::{Listener, Router};

use meridian_app::app::api::routes;
use meridian_app::config::ConfigHandler;
use meridian_app::middleware::timezone::TimezoneMiddleware;
use meridian_app::tz_handler::ActiveZonesHandler;
use meridian_core::config::load_config;
use meridian_core::tz::context::ActiveZones;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting meridian timezone preference server");

    let config = load_config()?;

    tracing::info!(
        server = %config.server.bind_addr(),
        default_timezone = %config.timezone.default,
        "Configuration loaded"
    );

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    // Fatal on an unresolvable default timezone or unusable session secret.
    config.validate()?;
    let default_tz = config.timezone.resolve_default()?;

    let zones = Arc::new(ActiveZones::new(default_tz));

    let session_handler =
        SessionHandler::builder(CookieStore::new(), config.session.secret.as_bytes()).build()?;

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(ConfigHandler {
            settings: config.clone(),
        })
        .hoop(ActiveZonesHandler { zones })
        .hoop(session_handler)
        .hoop(TimezoneMiddleware)
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
