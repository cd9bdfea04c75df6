//! API Gateway Library
//!
//! This crate provides the HTTP integration API for the HR resources and
//! translates each request into a call on the HR coordination service.

pub mod clients;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod token;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::clients::HrClient;
use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the gateway as an embedded component (for combined binary).
pub async fn run_embedded(
    host: &str,
    port: u16,
    hr_port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::from_env();
    config.hr_service.endpoint = format!("http://{}:{}", loopback(host), hr_port);

    run_server_with_config(host, port, config).await
}

/// Run the gateway against the configured HR service URL.
pub async fn run_standalone(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    run_server_with_config(host, port, GatewayConfig::from_env()).await
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if !config.jwt.has_strong_secret() {
        warn!("JWT_SECRET is missing or too short; every request will be rejected");
    }

    // Create gRPC client
    let hr_client = Arc::new(HrClient::connect(&config.hr_service)?);

    // Create app state
    let state = AppState::new(hr_client, config);

    // Build router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Gateway listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wildcard bind addresses are not dialable.
fn loopback(host: &str) -> &str {
    match host {
        "0.0.0.0" | "::" => "127.0.0.1",
        other => other,
    }
}
