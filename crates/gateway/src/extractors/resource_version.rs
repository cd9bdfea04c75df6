//! Media-type version negotiation.
//!
//! Callers pick a resource version with
//! `Accept: application/vnd.hedtech.integration.v{N}+json`. Generic JSON
//! (`application/json`, `*/*`) or no header at all selects the resource's
//! default version.

use axum::{async_trait, extract::FromRequestParts, http::header::ACCEPT, http::request::Parts};

use common::{AppError, AppResult};
use domain::{ResourceDescriptor, INTEGRATION_MEDIA_TYPE_PREFIX, INTEGRATION_MEDIA_TYPE_SUFFIX};

/// Unversioned integration media type
const INTEGRATION_MEDIA_TYPE: &str = "application/vnd.hedtech.integration+json";

/// Version of the resource representation to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceVersion(pub u32);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceVersion
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let resource = parts
            .extensions
            .get::<&'static ResourceDescriptor>()
            .copied()
            .ok_or_else(|| AppError::internal("Resource descriptor missing from request"))?;

        let accept = parts.headers.get(ACCEPT).and_then(|h| h.to_str().ok());
        negotiate_version(accept, resource).map(ResourceVersion)
    }
}

/// Resolve the Accept header against the versions a resource serves. The
/// first acceptable media range wins.
pub fn negotiate_version(accept: Option<&str>, resource: &ResourceDescriptor) -> AppResult<u32> {
    let Some(accept) = accept.filter(|a| !a.trim().is_empty()) else {
        return Ok(resource.default_version);
    };

    for range in accept.split(',') {
        let media_type = range.split(';').next().unwrap_or_default().trim();

        if is_generic(media_type) {
            return Ok(resource.default_version);
        }

        if let Some(version) = requested_version(media_type) {
            if resource.supports_version(version) {
                return Ok(version);
            }
        }
    }

    Err(AppError::NotAcceptable(accept.to_string()))
}

fn is_generic(media_type: &str) -> bool {
    matches!(
        media_type.to_ascii_lowercase().as_str(),
        "*/*" | "application/*" | "application/json" | INTEGRATION_MEDIA_TYPE
    )
}

/// Major version of a versioned integration media type; `v12.1.0` reads as 12.
fn requested_version(media_type: &str) -> Option<u32> {
    let lower = media_type.to_ascii_lowercase();
    let version = lower
        .strip_prefix(INTEGRATION_MEDIA_TYPE_PREFIX)?
        .strip_suffix(INTEGRATION_MEDIA_TYPE_SUFFIX)?;

    version.split('.').next()?.parse().ok()
}
