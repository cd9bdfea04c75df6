//! Domain-level constants.
//!
//! Media types, permission codes, and the fixed user-facing messages of the
//! integration API.

// =============================================================================
// Media Types
// =============================================================================

/// Integration media type template; `{}` is replaced by the major version
pub const INTEGRATION_MEDIA_TYPE_PREFIX: &str = "application/vnd.hedtech.integration.v";

/// Integration media type suffix
pub const INTEGRATION_MEDIA_TYPE_SUFFIX: &str = "+json";

/// Build the integration media type for a version.
pub fn integration_media_type(version: u32) -> String {
    format!(
        "{}{}{}",
        INTEGRATION_MEDIA_TYPE_PREFIX, version, INTEGRATION_MEDIA_TYPE_SUFFIX
    )
}

// =============================================================================
// Permission Codes
// =============================================================================

pub const VIEW_EMPLOYEE_DATA: &str = "VIEW.EMPLOYEE.DATA";
pub const VIEW_INSTITUTION_JOB: &str = "VIEW.INSTITUTION.JOB";
pub const VIEW_INSTITUTION_POSITION: &str = "VIEW.INSTITUTION.POSITION";
pub const VIEW_JOB_APPLICATIONS: &str = "VIEW.JOB.APPLICATIONS";
pub const VIEW_EMPLOYEE_LEAVE_PLANS: &str = "VIEW.EMPLOYEE.LEAVE.PLANS";
pub const VIEW_EMPLOYEE_LEAVE_TRANSACTIONS: &str = "VIEW.EMPLOYEE.LEAVE.TRANSACTIONS";
pub const VIEW_CONTRIBUTION_PAYROLL_DEDUCTIONS: &str = "VIEW.CONTRIBUTION.PAYROLL.DEDUCTIONS";
pub const VIEW_PAYROLL_DEDUCTION_ARRANGEMENTS: &str = "VIEW.PAYROLL.DEDUCTION.ARRANGEMENTS";
pub const VIEW_EMPLOYMENT_PERFORMANCE_REVIEWS: &str = "VIEW.EMPLOYMENT.PERFORMANCE.REVIEW";
pub const VIEW_PERSON_EMP_PROFICIENCIES: &str = "VIEW.PERSON.EMP.PROFICIENCIES";
pub const VIEW_PERSON_BENEFICIARIES: &str = "VIEW.PERSON.BENEFICIARIES";
pub const VIEW_PERSON_BENEFIT_DEPENDENTS: &str = "VIEW.PERSON.BENEFIT.DEPENDENTS";
pub const VIEW_INSTITUTION_JOB_SUPERVISORS: &str = "VIEW.INSTITUTION.JOB.SUPERVISORS";
pub const VIEW_EMPLOYEE_SUMMARY: &str = "VIEW.EMPLOYEE.SUMMARY";
pub const APPROVE_REJECT_TIME_ENTRY: &str = "APPROVE.REJECT.TIME.ENTRY";

pub const UPDATE_EMPLOYEE: &str = "UPDATE.EMPLOYEE";
pub const CREATE_INSTITUTION_JOB: &str = "CREATE.INSTITUTION.JOB";
pub const CREATE_PAYROLL_DEDUCTION_ARRANGEMENTS: &str = "CREATE.PAYROLL.DEDUCTION.ARRANGEMENTS";
pub const UPDATE_EMPLOYMENT_PERFORMANCE_REVIEWS: &str = "UPDATE.EMPLOYMENT.PERFORMANCE.REVIEW";
pub const DELETE_EMPLOYMENT_PERFORMANCE_REVIEWS: &str = "DELETE.EMPLOYMENT.PERFORMANCE.REVIEW";

// =============================================================================
// Messages
// =============================================================================

/// Message returned when a resource is requested without a GUID
pub const NULL_GUID_MESSAGE: &str = "The GUID must be specified in the request URL.";

/// Message returned for writes a resource does not accept
pub const NOT_SUPPORTED_MESSAGE: &str = "The requested operation is not supported.";

/// Message returned when the caller's session is no longer valid
pub const SESSION_EXPIRED_MESSAGE: &str = "Your previous session has expired and is no longer valid.";

/// Message returned when a write arrives without a body
pub const MISSING_BODY_MESSAGE: &str = "The request body is required.";

/// Message returned when the URL or body GUID is the nil GUID
pub const NIL_GUID_MESSAGE: &str = "GUID must be specified.";

/// Message returned when the URL and body GUIDs disagree
pub const GUID_MISMATCH_MESSAGE: &str = "GUID not the same as in request body.";

/// Message returned for failures the service layer did not classify
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error occurred while processing the request.";

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 8;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
