//! Self-service query handlers: leave plans, employee name search and
//! human resource demographics.

use axum::{
    extract::{Extension, State},
    http::HeaderValue,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};

use common::{AppError, AppResult};
use domain::{
    EmployeeLeavePlanQueryCriteria, EmployeeName, EmployeeNameQueryCriteria,
    EmployeeSummaryQueryCriteria, HumanResourceDemographics,
    HumanResourceDemographicsQueryCriteria, ResourceRecord, APPROVE_REJECT_TIME_ENTRY,
    EMPLOYEE_NAME_SEARCH_MEDIA_TYPE, VIEW_EMPLOYEE_DATA, VIEW_EMPLOYEE_LEAVE_PLANS,
    VIEW_EMPLOYEE_SUMMARY,
};

use crate::extractors::ValidatedJson;
use crate::handlers::resource_handler::X_MEDIA_TYPE;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Message returned when a name search is not allowed
pub const EMPLOYEE_QUERY_FORBIDDEN_MESSAGE: &str =
    "User doesn't have the permission to query the employee information.";

/// Create self-service query routes
pub fn self_service_routes() -> Router<AppState> {
    Router::new()
        .route("/employee-leave-plans", post(query_employee_leave_plans))
        .route("/employees", post(query_employee_names))
        .route("/human-resources", post(query_human_resource_demographics))
}

/// Query employee leave plans
///
/// Without a supervisor id only the caller's own plans are returned. A
/// supervisor may read the plans of their direct reports, optionally narrowed
/// to `superviseeIds`. `VIEW.EMPLOYEE.LEAVE.PLANS` lifts both limits.
#[utoipa::path(
    post,
    path = "/qapi/employee-leave-plans",
    tag = "Employees",
    security(("bearer_auth" = [])),
    request_body = EmployeeLeavePlanQueryCriteria,
    responses(
        (status = 200, description = "Employee leave plan DTOs", body = Vec<serde_json::Value>),
        (status = 400, description = "Neither supervisor nor supervisee ids"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Plans of other employees")
    )
)]
pub async fn query_employee_leave_plans(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(criteria): ValidatedJson<EmployeeLeavePlanQueryCriteria>,
) -> AppResult<Json<Vec<ResourceRecord>>> {
    let (supervisor, supervisees) = leave_plan_scope(&user, &criteria)?;

    let plans = state
        .hr
        .query_employee_leave_plans(supervisor, supervisees)
        .await?;
    Ok(Json(plans))
}

/// Who the caller may read leave plans for.
fn leave_plan_scope(
    user: &CurrentUser,
    criteria: &EmployeeLeavePlanQueryCriteria,
) -> AppResult<(Option<String>, Vec<String>)> {
    let supervisor = criteria.supervisor().map(str::to_string);
    let supervisees = criteria.supervisees().to_vec();

    if user.has_permission(VIEW_EMPLOYEE_LEAVE_PLANS) {
        return Ok((supervisor, supervisees));
    }

    match supervisor {
        Some(id) if id == user.person_id => Ok((Some(id), supervisees)),
        Some(_) => Err(leave_plans_forbidden(user)),
        None if supervisees.iter().any(|id| *id != user.person_id) => {
            Err(leave_plans_forbidden(user))
        }
        None => Ok((None, vec![user.person_id.clone()])),
    }
}

fn leave_plans_forbidden(user: &CurrentUser) -> AppError {
    AppError::forbidden(format!(
        "User '{}' does not have permission to view leave plans of other employees.",
        user.user_name
    ))
}

/// Search employees by name
#[utoipa::path(
    post,
    path = "/qapi/employees",
    tag = "Employees",
    security(("bearer_auth" = [])),
    request_body = EmployeeNameQueryCriteria,
    responses(
        (status = 200, description = "Matching employees", body = Vec<EmployeeName>),
        (status = 400, description = "Keyword too short"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing permission")
    )
)]
pub async fn query_employee_names(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(criteria): ValidatedJson<EmployeeNameQueryCriteria>,
) -> AppResult<Response> {
    if !user.has_permission(VIEW_EMPLOYEE_DATA) && !user.has_permission(VIEW_EMPLOYEE_SUMMARY) {
        return Err(AppError::forbidden(EMPLOYEE_QUERY_FORBIDDEN_MESSAGE));
    }

    let names: Vec<EmployeeName> = state
        .hr
        .search_employees(criteria)
        .await?
        .into_iter()
        .map(EmployeeName::from)
        .collect();

    let mut response = Json(names).into_response();
    response.headers_mut().insert(
        X_MEDIA_TYPE,
        HeaderValue::from_static(EMPLOYEE_NAME_SEARCH_MEDIA_TYPE),
    );
    Ok(response)
}

/// Query human resource demographics
///
/// Callers may read their own record. Holders of `APPROVE.REJECT.TIME.ENTRY`
/// may also read the records of the employees they supervise.
#[utoipa::path(
    post,
    path = "/qapi/human-resources",
    tag = "Employees",
    security(("bearer_auth" = [])),
    request_body = HumanResourceDemographicsQueryCriteria,
    responses(
        (status = 200, description = "Demographics", body = Vec<HumanResourceDemographics>),
        (status = 400, description = "No ids"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Records of other employees")
    )
)]
pub async fn query_human_resource_demographics(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(criteria): ValidatedJson<HumanResourceDemographicsQueryCriteria>,
) -> AppResult<Json<Vec<HumanResourceDemographics>>> {
    let only_self = criteria.ids.iter().all(|id| *id == user.person_id);
    if !only_self && !user.has_permission(APPROVE_REJECT_TIME_ENTRY) {
        return Err(demographics_forbidden(&user));
    }

    let summaries = state
        .hr
        .query_employee_summaries(EmployeeSummaryQueryCriteria {
            employee_ids: criteria.ids,
            include_inactive: true,
            ..Default::default()
        })
        .await?;

    let visible = |id: &str, supervisors: &[String]| {
        id == user.person_id || supervisors.iter().any(|s| *s == user.person_id)
    };
    if summaries
        .iter()
        .any(|s| !visible(&s.employee_id, &s.supervisor_ids))
    {
        return Err(demographics_forbidden(&user));
    }

    Ok(Json(
        summaries
            .into_iter()
            .map(HumanResourceDemographics::from)
            .collect(),
    ))
}

fn demographics_forbidden(user: &CurrentUser) -> AppError {
    AppError::forbidden(format!(
        "User '{}' may only view their own demographics or those of their supervisees.",
        user.user_name
    ))
}
