//! Backend entry-point: wires the REST API over the configured data store.

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::{HealthState, live, ready};
use backend::server::config::ServerConfig;
use backend::server::{configure_api, memory_state, rest_state};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    let state = match &config.data_store {
        Some(data_store) => {
            info!(url = %data_store.base_url, "using hosted data store");
            rest_state(data_store).map_err(std::io::Error::other)?
        }
        None => {
            warn!("DATA_STORE_URL unset; falling back to the in-memory store (dev only)");
            let (state, _store) = memory_state();
            state
        }
    };

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_health_state.clone())
            .configure(|cfg| configure_api(cfg, server_state.clone()))
            .service(ready)
            .service(live)
    })
    .bind(config.bind_addr.as_str())?;

    health_state.mark_ready();
    info!(bind_addr = %config.bind_addr, "server listening");
    server.run().await
}
