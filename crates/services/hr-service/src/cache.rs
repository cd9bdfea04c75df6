//! Redis cache for reference data.
//!
//! Reference resources (the unpaged code tables) and data-privacy rules are
//! read far more often than they change, so whole lists are cached per
//! resource and expire after the configured TTL. Privacy rules are cached
//! unresolved; each caller's restricted properties are derived from them.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};

use common::{AppError, AppResult, CacheConfig};
use domain::{PrivacyRule, ResourceRecord};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Key prefix for cached resource lists
pub const CACHE_PREFIX_RESOURCE: &str = "hr:resource:";

/// Key prefix for cached data-privacy rules
pub const CACHE_PREFIX_PRIVACY: &str = "hr:privacy:";

pub fn resource_key(resource: &str) -> String {
    format!("{}{}", CACHE_PREFIX_RESOURCE, resource)
}

pub fn privacy_key(resource: &str) -> String {
    format!("{}{}", CACHE_PREFIX_PRIVACY, resource)
}

/// Reference-data cache trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReferenceCache: Send + Sync {
    /// Cached record list of a resource, if present
    async fn records(&self, resource: &str) -> AppResult<Option<Vec<ResourceRecord>>>;

    /// Replace the cached record list of a resource
    async fn store_records(&self, resource: &str, records: &[ResourceRecord]) -> AppResult<()>;

    /// Cached data-privacy rules of a resource, if present
    async fn privacy(&self, resource: &str) -> AppResult<Option<Vec<PrivacyRule>>>;

    /// Replace the cached data-privacy rules of a resource
    async fn store_privacy(&self, resource: &str, rules: &[PrivacyRule]) -> AppResult<()>;

    /// Check connectivity
    async fn ping(&self) -> AppResult<()>;
}

/// Redis implementation of ReferenceCache.
#[derive(Clone)]
pub struct RedisReferenceCache {
    connection: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisReferenceCache {
    /// Connect to Redis.
    pub async fn connect(config: &CacheConfig) -> Result<Self, RedisError> {
        let client = Client::open(config.url.as_str())?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Redis cache connected");

        Ok(Self {
            connection,
            ttl_seconds: config.ttl().as_secs(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, self.ttl_seconds).await?;
        Ok(())
    }
}

#[async_trait]
impl ReferenceCache for RedisReferenceCache {
    async fn records(&self, resource: &str) -> AppResult<Option<Vec<ResourceRecord>>> {
        self.get(&resource_key(resource)).await
    }

    async fn store_records(&self, resource: &str, records: &[ResourceRecord]) -> AppResult<()> {
        self.set(&resource_key(resource), records).await
    }

    async fn privacy(&self, resource: &str) -> AppResult<Option<Vec<PrivacyRule>>> {
        self.get(&privacy_key(resource)).await
    }

    async fn store_privacy(&self, resource: &str, rules: &[PrivacyRule]) -> AppResult<()> {
        self.set(&privacy_key(resource), rules).await
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
