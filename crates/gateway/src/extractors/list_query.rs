//! Query string of a list request.

use axum::{async_trait, extract::FromRequestParts, extract::Query, http::request::Parts};
use serde::Deserialize;

use common::{AppError, AppResult};
use domain::{Criteria, Paging, ResourceDescriptor};

/// `?offset=&limit=&criteria=`. Any other key is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub criteria: Option<String>,
}

impl ListQuery {
    /// Paging for a paged resource; unpaged resources ignore offset and limit.
    pub fn paging(&self, resource: &ResourceDescriptor) -> AppResult<Option<Paging>> {
        match resource.default_page_size {
            Some(page_size) => Ok(Some(Paging::resolve(self.offset, self.limit, page_size)?)),
            None => Ok(None),
        }
    }

    /// Parsed criteria filter, empty when absent.
    pub fn criteria(&self, resource: &ResourceDescriptor) -> AppResult<Criteria> {
        match self.criteria.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Ok(Criteria::parse(raw, resource)?),
            _ => Ok(Criteria::default()),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ListQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::invalid_argument(e.body_text()))?;
        Ok(query)
    }
}
