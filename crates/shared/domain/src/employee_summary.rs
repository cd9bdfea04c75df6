//! Employee summary query types.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Employment status reported in a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Leave,
    Terminated,
}

impl EmployeeStatus {
    pub fn is_active(&self) -> bool {
        !matches!(self, EmployeeStatus::Terminated)
    }
}

impl From<&str> for EmployeeStatus {
    fn from(s: &str) -> Self {
        match s {
            "leave" => EmployeeStatus::Leave,
            "terminated" => EmployeeStatus::Terminated,
            _ => EmployeeStatus::Active,
        }
    }
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmployeeStatus::Active => write!(f, "active"),
            EmployeeStatus::Leave => write!(f, "leave"),
            EmployeeStatus::Terminated => write!(f, "terminated"),
        }
    }
}

/// Criteria for `POST /qapi/employee-summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_has_ids"))]
pub struct EmployeeSummaryQueryCriteria {
    /// Return employees reporting to any of these supervisors
    #[serde(default)]
    #[validate(custom(function = "validate_ids"))]
    pub supervisor_ids: Vec<String>,
    /// Return these employees
    #[serde(default)]
    #[validate(custom(function = "validate_ids"))]
    pub employee_ids: Vec<String>,
    /// Include terminated employees
    #[serde(default)]
    pub include_inactive: bool,
}

fn validate_has_ids(criteria: &EmployeeSummaryQueryCriteria) -> Result<(), ValidationError> {
    if criteria.supervisor_ids.is_empty() && criteria.employee_ids.is_empty() {
        let mut error = ValidationError::new("criteria_empty");
        error.message = Some("Either supervisorIds or employeeIds must be provided".into());
        return Err(error);
    }
    Ok(())
}

fn validate_ids(ids: &[String]) -> Result<(), ValidationError> {
    if ids.iter().any(|id| id.trim().is_empty()) {
        let mut error = ValidationError::new("blank_id");
        error.message = Some("Ids cannot be blank".into());
        return Err(error);
    }
    Ok(())
}

/// One employee in a summary response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub employee_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_position_id: Option<String>,
    pub supervisor_ids: Vec<String>,
    pub status: EmployeeStatus,
}

impl EmployeeSummary {
    /// Whether this summary satisfies the query.
    pub fn matches(&self, criteria: &EmployeeSummaryQueryCriteria) -> bool {
        if !criteria.include_inactive && !self.status.is_active() {
            return false;
        }

        let by_employee = criteria.employee_ids.contains(&self.employee_id);
        let by_supervisor = self
            .supervisor_ids
            .iter()
            .any(|s| criteria.supervisor_ids.contains(s));

        by_employee || by_supervisor
    }
}
