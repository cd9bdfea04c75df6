//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use domain::{
    EmployeeLeavePlanQueryCriteria, EmployeeName, EmployeeNameQueryCriteria, EmployeeStatus,
    EmployeeSummary, EmployeeSummaryQueryCriteria, HumanResourceDemographics,
    HumanResourceDemographicsQueryCriteria,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Integration API",
        description = "Versioned Human Resources integration resources"
    ),
    paths(
        crate::handlers::resource_handler::list_resources,
        crate::handlers::resource_handler::get_resource,
        crate::handlers::resource_handler::create_resource,
        crate::handlers::resource_handler::update_resource,
        crate::handlers::resource_handler::delete_resource,
        crate::handlers::employee_summary_handler::query_employee_summaries,
        crate::handlers::self_service_handler::query_employee_leave_plans,
        crate::handlers::self_service_handler::query_employee_names,
        crate::handlers::self_service_handler::query_human_resource_demographics,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            EmployeeSummaryQueryCriteria,
            EmployeeSummary,
            EmployeeStatus,
            EmployeeLeavePlanQueryCriteria,
            EmployeeNameQueryCriteria,
            EmployeeName,
            HumanResourceDemographicsQueryCriteria,
            HumanResourceDemographics,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Resources", description = "HR integration resources, one route set per catalogue entry"),
        (name = "Employees", description = "Employee queries"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
