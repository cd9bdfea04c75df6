//! Gateway configuration.

use std::env;

use common::{GrpcClientConfig, JwtConfig};
use domain::DEFAULT_JWT_EXPIRATION_HOURS;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HR coordination service gRPC endpoint
    pub hr_service: GrpcClientConfig,
    /// Bearer token verification
    pub jwt: JwtConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = GrpcClientConfig::default();

        Self {
            hr_service: GrpcClientConfig {
                endpoint: env::var("HR_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:50052".to_string()),
                connect_timeout_ms: env::var("HR_SERVICE_CONNECT_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.connect_timeout_ms),
                request_timeout_ms: env::var("HR_SERVICE_REQUEST_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.request_timeout_ms),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").unwrap_or_default(),
                expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                    .ok()
                    .and_then(|h| h.parse().ok())
                    .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            },
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            hr_service: GrpcClientConfig::new("http://localhost:50052"),
            jwt: JwtConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_hr_service() {
        let config = GatewayConfig::default();
        assert_eq!(config.hr_service.endpoint, "http://localhost:50052");
        assert!(!config.jwt.has_strong_secret());
    }
}
