//! Combined binary for development - runs hr-service and the gateway in one process.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hr-api")]
#[command(about = "HR integration API and coordination service in one binary")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both services in a single process (development mode)
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value = "3000")]
        gateway_port: u16,
        #[arg(long, default_value = "50052")]
        hr_port: u16,
    },
    /// Run hr-service database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

impl From<MigrateAction> for hr_service_lib::MigrateAction {
    fn from(action: MigrateAction) -> Self {
        match action {
            MigrateAction::Up => hr_service_lib::MigrateAction::Up,
            MigrateAction::Down => hr_service_lib::MigrateAction::Down,
            MigrateAction::Status => hr_service_lib::MigrateAction::Status,
            MigrateAction::Fresh => hr_service_lib::MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            gateway_port,
            hr_port,
        } => {
            info!("Starting combined services in development mode");
            info!("  Gateway:    http://{}:{}", host, gateway_port);
            info!("  HR service: http://{}:{}", host, hr_port);

            // Spawn hr-service first (it owns the database)
            let hr_host = host.clone();
            let hr_handle = tokio::spawn(async move {
                if let Err(e) = hr_service_lib::run_embedded(&hr_host, hr_port).await {
                    error!("HR service failed: {}", e);
                }
            });

            // Wait a moment for hr-service to start
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;

            let gateway_host = host.clone();
            let gateway_handle = tokio::spawn(async move {
                if let Err(e) = gateway_lib::run_embedded(&gateway_host, gateway_port, hr_port).await
                {
                    error!("Gateway failed: {}", e);
                }
            });

            // Wait for either service to exit (which would indicate an error)
            tokio::select! {
                _ = hr_handle => {
                    error!("HR service exited unexpectedly");
                }
                _ = gateway_handle => {
                    error!("Gateway exited unexpectedly");
                }
            }
        }
        Commands::Migrate { action } => {
            hr_service_lib::run_migrations(action.into()).await?;
        }
    }

    Ok(())
}
