//! Query types for the self-service `/qapi` endpoints other than
//! employee summaries.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::employee_summary::EmployeeSummary;

/// Media type answered by `POST /qapi/employees`.
pub const EMPLOYEE_NAME_SEARCH_MEDIA_TYPE: &str =
    "application/vnd.ellucian-employee-name-search.v1+json";

/// Criteria for `POST /qapi/employee-leave-plans`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_leave_plan_criteria"))]
pub struct EmployeeLeavePlanQueryCriteria {
    /// Return plans of this supervisor's direct reports
    #[serde(default)]
    pub supervisor_id: Option<String>,
    /// Return plans of these employees
    #[serde(default)]
    pub supervisee_ids: Option<Vec<String>>,
}

fn validate_leave_plan_criteria(
    criteria: &EmployeeLeavePlanQueryCriteria,
) -> Result<(), ValidationError> {
    let no_supervisor = criteria
        .supervisor_id
        .as_deref()
        .map_or(true, |id| id.trim().is_empty());
    if no_supervisor && criteria.supervisee_ids.is_none() {
        let mut error = ValidationError::new("criteria_empty");
        error.message = Some("Criteria must include a supervisor Id or supervisee Id(s)".into());
        return Err(error);
    }
    Ok(())
}

impl EmployeeLeavePlanQueryCriteria {
    pub fn supervisor(&self) -> Option<&str> {
        self.supervisor_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn supervisees(&self) -> &[String] {
        self.supervisee_ids.as_deref().unwrap_or_default()
    }
}

/// Criteria for `POST /qapi/employees`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EmployeeNameQueryCriteria {
    /// Case-insensitive fragment of the employee's name
    #[validate(custom(function = "validate_keyword"))]
    pub query_keyword: String,
    #[serde(default)]
    pub include_inactive: bool,
}

fn validate_keyword(keyword: &str) -> Result<(), ValidationError> {
    if keyword.trim().len() < 2 {
        let mut error = ValidationError::new("keyword_too_short");
        error.message = Some("The query keyword must have at least two characters".into());
        return Err(error);
    }
    Ok(())
}

/// One match of an employee name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EmployeeName {
    pub id: String,
    pub name: String,
}

impl From<EmployeeSummary> for EmployeeName {
    fn from(summary: EmployeeSummary) -> Self {
        Self {
            id: summary.employee_id,
            name: summary.name,
        }
    }
}

/// Criteria for `POST /qapi/human-resources`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HumanResourceDemographicsQueryCriteria {
    #[validate(length(min = 1, message = "At least one id must be provided"))]
    pub ids: Vec<String>,
}

/// Demographic summary of one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HumanResourceDemographics {
    pub id: String,
    pub preferred_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_position_id: Option<String>,
}

impl From<EmployeeSummary> for HumanResourceDemographics {
    fn from(summary: EmployeeSummary) -> Self {
        Self {
            id: summary.employee_id,
            preferred_name: summary.name,
            primary_position_id: summary.primary_position_id,
        }
    }
}
