//! Domain layer - HR integration resources and value objects.
//!
//! This crate contains pure domain types with no infrastructure dependencies.
//! Resource DTOs are opaque JSON documents; the catalogue describes how each
//! resource is exposed, and the gateway and hr-service both read from it.

pub mod constants;
pub mod criteria;
pub mod employee_summary;
pub mod error;
pub mod guid;
pub mod paging;
pub mod privacy;
pub mod record;
pub mod resource;
pub mod self_service;
pub mod write;

pub use constants::*;
pub use criteria::Criteria;
pub use employee_summary::{EmployeeStatus, EmployeeSummary, EmployeeSummaryQueryCriteria};
pub use error::{DomainError, DomainResult};
pub use guid::require_guid;
pub use paging::Paging;
pub use privacy::{restricted_for, PrivacyRule};
pub use record::{ResourcePage, ResourceRecord};
pub use resource::{find, ResourceDescriptor, WriteAccess, WriteOp, CATALOGUE};
pub use self_service::{
    EmployeeLeavePlanQueryCriteria, EmployeeName, EmployeeNameQueryCriteria,
    HumanResourceDemographics, HumanResourceDemographicsQueryCriteria,
    EMPLOYEE_NAME_SEARCH_MEDIA_TYPE,
};
