//! Offset/limit paging for list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub offset: u64,
    pub limit: u64,
}

impl Paging {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Fill in defaults for a paged resource. A missing limit takes the
    /// resource's page size and larger limits are clamped to it.
    pub fn resolve(
        offset: Option<u64>,
        limit: Option<u64>,
        default_page_size: u64,
    ) -> DomainResult<Self> {
        let limit = match limit {
            Some(0) => {
                return Err(DomainError::invalid_argument(
                    "The limit must be greater than zero.",
                ))
            }
            Some(limit) => limit.min(default_page_size),
            None => default_page_size,
        };

        Ok(Self {
            offset: offset.unwrap_or(0),
            limit,
        })
    }
}
