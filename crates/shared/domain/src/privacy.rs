//! Data privacy rules.
//!
//! A rule hides one top-level property of a resource. Callers holding the
//! rule's exempt permission still see the property.

use serde::{Deserialize, Serialize};

/// One restricted property of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyRule {
    pub property: String,
    /// Permission that lifts the restriction; `None` restricts everyone
    pub exempt_permission: Option<String>,
}

impl PrivacyRule {
    pub fn new(property: impl Into<String>, exempt_permission: Option<&str>) -> Self {
        Self {
            property: property.into(),
            exempt_permission: exempt_permission.map(str::to_string),
        }
    }

    /// Whether the rule hides the property from a caller with `permissions`.
    pub fn applies_to(&self, permissions: &[String]) -> bool {
        match &self.exempt_permission {
            Some(exempt) => !permissions.iter().any(|p| p == exempt),
            None => true,
        }
    }
}

/// Properties hidden from a caller holding `permissions`.
pub fn restricted_for(rules: &[PrivacyRule], permissions: &[String]) -> Vec<String> {
    let mut properties: Vec<String> = rules
        .iter()
        .filter(|rule| rule.applies_to(permissions))
        .map(|rule| rule.property.clone())
        .collect();
    properties.sort();
    properties.dedup();
    properties
}
