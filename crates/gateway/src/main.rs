//! API Gateway - HTTP integration API for the HR resources.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::config::GatewayConfig;
use gateway_lib::token::issue_token;

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "HTTP integration API for HR resources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "GATEWAY_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "GATEWAY_PORT", default_value = "3000")]
        port: u16,
    },
    /// Print a signed bearer token for local testing
    Token {
        /// Person id of the caller
        #[arg(long)]
        person_id: String,
        /// Login name
        #[arg(long)]
        name: String,
        /// Permission code to grant (repeatable)
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            gateway_lib::run_standalone(&host, port).await?;
        }
        Commands::Token {
            person_id,
            name,
            permissions,
        } => {
            let config = GatewayConfig::from_env();
            let token = issue_token(&config.jwt, &person_id, &name, permissions)?;
            println!("{}", token);
        }
    }

    Ok(())
}
