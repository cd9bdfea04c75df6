//! Request bodies for POST and PUT.
//!
//! The API accepts any JSON object as a resource body. These helpers enforce
//! the GUID rules shared by every writable resource and fold a partial PUT
//! body onto the stored document.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::constants::{
    GUID_MISMATCH_MESSAGE, MISSING_BODY_MESSAGE, NIL_GUID_MESSAGE, NULL_GUID_MESSAGE,
};
use crate::error::{DomainError, DomainResult};

/// Decode a write body. It must be present and a JSON object.
pub fn parse_body(raw: &[u8]) -> DomainResult<Map<String, Value>> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(DomainError::invalid_argument(MISSING_BODY_MESSAGE));
    }

    match serde_json::from_slice(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Err(DomainError::invalid_argument(MISSING_BODY_MESSAGE)),
        Ok(_) => Err(DomainError::invalid_argument(
            "The request body must be a JSON object.",
        )),
        Err(e) => Err(DomainError::invalid_argument(format!(
            "The request body is not valid JSON: {}",
            e
        ))),
    }
}

/// A POST body may omit `id` or carry the nil GUID; the store assigns one.
pub fn check_create_body(body: &Map<String, Value>) -> DomainResult<()> {
    match body.get("id") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(id)) if is_nil(id) => Ok(()),
        Some(_) => Err(DomainError::invalid_argument(
            "Nil GUID must be used in POST operation.",
        )),
    }
}

/// Reconcile the URL GUID with the body of a PUT.
///
/// A body without `id` takes the URL GUID. Otherwise neither may be the nil
/// GUID and both must agree, ignoring case. Returns the normalized GUID.
pub fn reconcile_update_guid(guid: &str, body: &mut Map<String, Value>) -> DomainResult<String> {
    let guid = guid.trim();
    if guid.is_empty() {
        return Err(DomainError::invalid_argument(NULL_GUID_MESSAGE));
    }
    let guid = guid.to_lowercase();

    let body_id = match body.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) if id.trim().is_empty() => None,
        Some(Value::String(id)) => Some(id.trim().to_lowercase()),
        Some(_) => {
            return Err(DomainError::invalid_argument(
                "The id property must be a string.",
            ))
        }
    };

    match body_id {
        None if is_nil(&guid) => Err(DomainError::invalid_argument(NIL_GUID_MESSAGE)),
        None => {
            body.insert("id".to_string(), Value::String(guid.clone()));
            Ok(guid)
        }
        Some(id) if is_nil(&guid) || is_nil(&id) => {
            Err(DomainError::invalid_argument(NIL_GUID_MESSAGE))
        }
        Some(id) if id != guid => Err(DomainError::invalid_argument(GUID_MISMATCH_MESSAGE)),
        Some(_) => Ok(guid),
    }
}

/// Overlay the top-level properties of `patch` onto `existing`.
///
/// Properties absent from the patch keep their stored value; a property set
/// to `null` is cleared.
pub fn merge_payload(existing: &Value, patch: Map<String, Value>) -> Value {
    let mut merged = match existing {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    for (key, value) in patch {
        if value.is_null() {
            merged.remove(&key);
        } else {
            merged.insert(key, value);
        }
    }
    Value::Object(merged)
}

fn is_nil(id: &str) -> bool {
    matches!(Uuid::parse_str(id.trim()), Ok(uuid) if uuid.is_nil())
}
