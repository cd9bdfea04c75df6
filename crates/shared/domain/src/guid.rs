//! Resource GUID checks.

use uuid::Uuid;

use crate::constants::NULL_GUID_MESSAGE;
use crate::error::{DomainError, DomainResult};

/// Normalize a GUID taken from a request URL.
///
/// Blank values and the nil UUID are rejected; anything else is passed
/// through so that unknown keys surface as not-found from the store.
pub fn require_guid(raw: &str) -> DomainResult<String> {
    let guid = raw.trim();
    if guid.is_empty() {
        return Err(DomainError::invalid_argument(NULL_GUID_MESSAGE));
    }
    if matches!(Uuid::parse_str(guid), Ok(uuid) if uuid.is_nil()) {
        return Err(DomainError::invalid_argument(NULL_GUID_MESSAGE));
    }
    Ok(guid.to_lowercase())
}
