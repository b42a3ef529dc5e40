use std::net::SocketAddr;

use pricealert::{config, routes, services, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = config::load();

    let storage = match services::storage::open(&settings).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to open storage");
            std::process::exit(1);
        }
    };

    let state = match AppState::build(settings.clone(), storage).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialise state");
            std::process::exit(1);
        }
    };

    services::scheduler::spawn_price_check_monitor(state.clone());
    services::scheduler::spawn_cleanup_monitor(state.clone());

    let app = routes::app(state);

    let ip = match settings.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!(host = %settings.host, error = %e, "invalid HOST");
            std::process::exit(1);
        }
    };
    let addr = SocketAddr::from((ip, settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "bind failed");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
    }
}
