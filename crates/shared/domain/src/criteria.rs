//! Filter criteria for list endpoints.
//!
//! `criteria` arrives as a JSON object in the query string, e.g.
//! `?criteria={"person":{"id":"..."}}`. Each key names a top-level DTO
//! property and the record matches when that property equals the value.

use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};
use crate::resource::ResourceDescriptor;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria(Map<String, Value>);

impl Criteria {
    /// Parse and validate raw criteria against a resource's filter list.
    pub fn parse(raw: &str, resource: &ResourceDescriptor) -> DomainResult<Self> {
        let value: Value = serde_json::from_str(raw).map_err(|e| {
            DomainError::invalid_argument(format!("The criteria filter is not valid JSON: {}", e))
        })?;

        let Value::Object(map) = value else {
            return Err(DomainError::invalid_argument(
                "The criteria filter must be a JSON object.",
            ));
        };

        let criteria = Self(map);
        criteria.validate_for(resource)?;
        Ok(criteria)
    }

    /// Wrap an already decoded object (e.g. received over gRPC).
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Every key must be a filter the resource accepts.
    pub fn validate_for(&self, resource: &ResourceDescriptor) -> DomainResult<()> {
        match self.0.keys().find(|k| !resource.accepts_filter(k)) {
            Some(key) => Err(DomainError::invalid_argument(format!(
                "'{}' is not a valid filter for {}.",
                key, resource.name
            ))),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    /// True when every criterion equals the payload's property of the same name.
    pub fn matches(&self, payload: &Value) -> bool {
        self.0
            .iter()
            .all(|(key, expected)| payload.get(key) == Some(expected))
    }
}
