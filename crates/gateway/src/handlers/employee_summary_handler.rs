//! Employee summary query handler.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::post,
    Router,
};

use common::{AppError, AppResult};
use domain::{EmployeeSummary, EmployeeSummaryQueryCriteria, VIEW_EMPLOYEE_SUMMARY};

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Create employee summary routes
pub fn employee_summary_routes() -> Router<AppState> {
    Router::new().route("/employee-summary", post(query_employee_summaries))
}

/// Query employee summaries
///
/// Supervisors may always query their own direct reports; any other query
/// needs `VIEW.EMPLOYEE.SUMMARY`.
#[utoipa::path(
    post,
    path = "/qapi/employee-summary",
    tag = "Employees",
    security(("bearer_auth" = [])),
    request_body = EmployeeSummaryQueryCriteria,
    responses(
        (status = 200, description = "Matching employee summaries", body = Vec<EmployeeSummary>),
        (status = 400, description = "No ids in criteria"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing permission")
    )
)]
pub async fn query_employee_summaries(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(criteria): ValidatedJson<EmployeeSummaryQueryCriteria>,
) -> AppResult<Json<Vec<EmployeeSummary>>> {
    if !may_query(&user, &criteria) {
        return Err(AppError::forbidden(format!(
            "User '{}' does not have permission to query employee summaries.",
            user.user_name
        )));
    }

    let summaries = state.hr.query_employee_summaries(criteria).await?;
    Ok(Json(summaries))
}

fn may_query(user: &CurrentUser, criteria: &EmployeeSummaryQueryCriteria) -> bool {
    if user.has_permission(VIEW_EMPLOYEE_SUMMARY) {
        return true;
    }

    criteria.employee_ids.is_empty()
        && criteria
            .supervisor_ids
            .iter()
            .all(|id| *id == user.person_id)
}
