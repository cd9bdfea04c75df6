//! HR Service Library
//!
//! This crate provides the coordination layer for the HR integration
//! resources via gRPC. It can be run as a standalone service or embedded in
//! the combined binary.

pub mod cache;
pub mod config;
pub mod grpc;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tracing::info;

use crate::cache::RedisReferenceCache;
use crate::config::HrServiceConfig;
use crate::grpc::HrGrpcService;
use crate::infra::Database;
use crate::repository::ResourceStore;
use crate::service::ResourceManager;

/// Run the HR service as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = HrServiceConfig::from_env();
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = HrServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run the gRPC server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: HrServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize storage
    let db = Database::connect(&config.database).await?;
    let cache = RedisReferenceCache::connect(&config.cache).await?;

    // Create repository and service
    let repo = Arc::new(ResourceStore::new(db.get_connection()));
    let service = Arc::new(ResourceManager::new(repo, Arc::new(cache)));

    // Create gRPC service
    let grpc_service = HrGrpcService::new(service);

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!(
        cache_ttl_seconds = config.cache.default_ttl_seconds,
        "HR service listening on {}", addr
    );

    // Run server
    Server::builder()
        .add_service(proto::HumanResourcesServiceServer::new(grpc_service))
        .serve(addr)
        .await?;

    Ok(())
}
