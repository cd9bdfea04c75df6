//! Opaque resource DTO.
//!
//! The integration API does not interpret resource bodies. A record is its
//! GUID plus the JSON document the coordination layer produced; on the wire
//! it is that document with `id` set to the GUID.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};

/// A single resource instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    pub id: String,
    pub payload: Value,
}

impl ResourceRecord {
    pub fn new(id: impl Into<String>, payload: Value) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }

    /// Parse a record from its wire form. The document must be an object
    /// carrying a non-empty string `id`.
    pub fn from_json(value: Value) -> DomainResult<Self> {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| DomainError::integration("Resource document has no id"))?;

        Ok(Self { id, payload: value })
    }

    /// Wire form: the payload object with `id` forced to the record GUID.
    pub fn to_json(&self) -> Value {
        let mut object = match &self.payload {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other.clone());
                map
            }
        };
        object.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(object)
    }

    /// Remove the named top-level properties. Returns true if anything was removed.
    pub fn redact(&mut self, properties: &[String]) -> bool {
        let Value::Object(map) = &mut self.payload else {
            return false;
        };

        let mut removed = false;
        for property in properties {
            if property == "id" {
                continue;
            }
            removed |= map.remove(property).is_some();
        }
        removed
    }
}

impl Serialize for ResourceRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResourceRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ResourceRecord::from_json(value).map_err(serde::de::Error::custom)
    }
}

/// One page of a resource listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePage {
    pub items: Vec<ResourceRecord>,
    /// Total number of matching records across all pages
    pub total: u64,
}

impl ResourcePage {
    pub fn new(items: Vec<ResourceRecord>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_form_carries_id() {
        let record = ResourceRecord::new("abc", json!({"code": "FT", "title": "Full time"}));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": "abc", "code": "FT", "title": "Full time"})
        );
    }

    #[test]
    fn id_from_record_wins_over_payload() {
        let record = ResourceRecord::new("real", json!({"id": "stale"}));
        assert_eq!(record.to_json()["id"], "real");
    }

    #[test]
    fn document_without_id_is_rejected() {
        let err = ResourceRecord::from_json(json!({"code": "X"})).unwrap_err();
        assert!(matches!(err, DomainError::Integration(_)));
        assert!(ResourceRecord::from_json(json!({"id": "  "})).is_err());
    }

    #[test]
    fn redact_removes_properties_but_keeps_id() {
        let mut record = ResourceRecord::new(
            "p1",
            json!({"id": "p1", "dateOfBirth": "1990-01-01", "name": "A"}),
        );
        let removed = record.redact(&["dateOfBirth".to_string(), "id".to_string()]);
        assert!(removed);
        assert_eq!(record.to_json(), json!({"id": "p1", "name": "A"}));
        assert!(!record.redact(&["missing".to_string()]));
    }
}
