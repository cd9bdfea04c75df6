//! Cache-control extractor.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{headers::CacheControl, TypedHeader};

/// True when the request carries `Cache-Control: no-cache`. A missing or
/// unparseable header reads as false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BypassCache(pub bool);

#[async_trait]
impl<S> FromRequestParts<S> for BypassCache
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bypass = match TypedHeader::<CacheControl>::from_request_parts(parts, state).await {
            Ok(TypedHeader(cache_control)) => cache_control.no_cache(),
            Err(_) => false,
        };

        Ok(BypassCache(bypass))
    }
}
