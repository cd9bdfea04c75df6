//! HR integration resource catalogue.
//!
//! Every resource the API exposes is described once here: its route name,
//! the media-type versions it answers to, paging defaults, the permission a
//! caller needs, which DTO properties may be used as filter criteria, and
//! which writes it accepts. The gateway mounts one set of generic handlers
//! per entry.

use crate::constants::*;

/// Static description of one integration resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Route name, e.g. `bargaining-units`
    pub name: &'static str,
    /// Supported major versions, ascending
    pub versions: &'static [u32],
    /// Version served when the caller does not ask for one
    pub default_version: u32,
    /// Default (and maximum) page size; `None` means the list is unpaged
    pub default_page_size: Option<u64>,
    /// Permission code required to read; `None` means any authenticated caller
    pub permission: Option<&'static str>,
    /// Top-level DTO properties accepted in `criteria`
    pub filters: &'static [&'static str],
    /// Writes the resource accepts; `None` means read-only
    pub writes: Option<WriteAccess>,
}

/// A write against a single resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Create,
    Update,
    Delete,
}

impl WriteOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOp::Create => "create",
            WriteOp::Update => "update",
            WriteOp::Delete => "delete",
        }
    }
}

impl std::fmt::Display for WriteOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which writes a resource accepts and who may perform them.
///
/// Writes are only served at a single media-type version. Holding
/// `permission` also grants read access to the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteAccess {
    pub version: u32,
    /// Permission for POST and PUT
    pub permission: &'static str,
    pub create: bool,
    pub update: bool,
    /// Permission for DELETE; `None` means deletes are not supported
    pub delete_permission: Option<&'static str>,
}

impl WriteAccess {
    /// POST and PUT at `version`, no DELETE.
    const fn create_update(version: u32, permission: &'static str) -> Self {
        Self {
            version,
            permission,
            create: true,
            update: true,
            delete_permission: None,
        }
    }

    const fn with_delete(self, permission: &'static str) -> Self {
        Self {
            delete_permission: Some(permission),
            ..self
        }
    }
}

const CODE_FILTER: &[&str] = &["code"];

impl ResourceDescriptor {
    /// Read-only reference data: unpaged, filterable by code, no permission.
    const fn reference(name: &'static str, versions: &'static [u32]) -> Self {
        Self {
            name,
            versions,
            default_version: versions[versions.len() - 1],
            default_page_size: None,
            permission: None,
            filters: CODE_FILTER,
            writes: None,
        }
    }

    /// Paged resource guarded by an optional permission.
    const fn paged(
        name: &'static str,
        versions: &'static [u32],
        page_size: u64,
        permission: Option<&'static str>,
        filters: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            versions,
            default_version: versions[versions.len() - 1],
            default_page_size: Some(page_size),
            permission,
            filters,
            writes: None,
        }
    }

    const fn writable(self, writes: WriteAccess) -> Self {
        Self {
            writes: Some(writes),
            ..self
        }
    }

    /// Collection route, e.g. `/pay-cycles`.
    pub fn collection_path(&self) -> String {
        format!("/{}", self.name)
    }

    /// Item route in axum path syntax, e.g. `/pay-cycles/:guid`.
    pub fn item_path(&self) -> String {
        format!("/{}/:guid", self.name)
    }

    pub fn is_paged(&self) -> bool {
        self.default_page_size.is_some()
    }

    pub fn supports_version(&self, version: u32) -> bool {
        self.versions.contains(&version)
    }

    pub fn accepts_filter(&self, property: &str) -> bool {
        self.filters.contains(&property)
    }

    /// Permission codes any one of which grants read access.
    pub fn read_permissions(&self) -> Vec<&'static str> {
        self.permission
            .into_iter()
            .chain(self.writes.map(|w| w.permission))
            .collect()
    }

    /// Permission required for `op` at `version`, or `None` when the
    /// resource does not accept that write at that version.
    pub fn write_permission(&self, op: WriteOp, version: u32) -> Option<&'static str> {
        let writes = self.writes.filter(|w| w.version == version)?;
        match op {
            WriteOp::Create if writes.create => Some(writes.permission),
            WriteOp::Update if writes.update => Some(writes.permission),
            WriteOp::Delete => writes.delete_permission,
            _ => None,
        }
    }

    /// Media type for the given version of this resource.
    pub fn media_type(&self, version: u32) -> String {
        integration_media_type(version)
    }
}

/// Every HR resource exposed through the integration API.
pub static CATALOGUE: &[ResourceDescriptor] = &[
    ResourceDescriptor::reference("bargaining-units", &[7]),
    ResourceDescriptor::reference("beneficiary-preference-types", &[11]),
    ResourceDescriptor::reference("contract-types", &[11]),
    ResourceDescriptor::paged(
        "contribution-payroll-deductions",
        &[8],
        100,
        Some(VIEW_CONTRIBUTION_PAYROLL_DEDUCTIONS),
        &["arrangement", "deductedOn"],
    ),
    ResourceDescriptor::reference("cost-calculation-methods", &[11]),
    ResourceDescriptor::reference("deduction-categories", &[11]),
    ResourceDescriptor::reference("deduction-types", &[7, 11]),
    ResourceDescriptor::reference("earning-types", &[12]),
    ResourceDescriptor::paged(
        "employee-leave-plans",
        &[11],
        200,
        Some(VIEW_EMPLOYEE_LEAVE_PLANS),
        &["person", "leavePlan"],
    ),
    ResourceDescriptor::paged(
        "employee-leave-transactions",
        &[11],
        200,
        Some(VIEW_EMPLOYEE_LEAVE_TRANSACTIONS),
        &["leavePlan", "person"],
    ),
    ResourceDescriptor::paged(
        "employees",
        &[7, 11, 12],
        100,
        Some(VIEW_EMPLOYEE_DATA),
        &[
            "person",
            "campus",
            "status",
            "startOn",
            "endOn",
            "rehireableStatus",
            "contract",
        ],
    )
    .writable(WriteAccess::create_update(12, UPDATE_EMPLOYEE)),
    ResourceDescriptor::reference("employment-classifications", &[7]),
    ResourceDescriptor::reference("employment-departments", &[10]),
    ResourceDescriptor::reference("employment-frequencies", &[11]),
    ResourceDescriptor::reference("employment-leave-of-absence-reasons", &[7]),
    ResourceDescriptor::reference("employment-organizations", &[10]),
    ResourceDescriptor::reference("employment-performance-review-ratings", &[10]),
    ResourceDescriptor::reference("employment-performance-review-types", &[10]),
    ResourceDescriptor::paged(
        "employment-performance-reviews",
        &[10],
        100,
        Some(VIEW_EMPLOYMENT_PERFORMANCE_REVIEWS),
        &["person", "job", "type"],
    )
    .writable(
        WriteAccess::create_update(10, UPDATE_EMPLOYMENT_PERFORMANCE_REVIEWS)
            .with_delete(DELETE_EMPLOYMENT_PERFORMANCE_REVIEWS),
    ),
    ResourceDescriptor::reference("employment-proficiencies", &[10]),
    ResourceDescriptor::reference("employment-proficiency-levels", &[10]),
    ResourceDescriptor::reference("employment-termination-reasons", &[7]),
    ResourceDescriptor::reference("institution-employers", &[11]),
    ResourceDescriptor::paged(
        "institution-job-supervisors",
        &[10, 11],
        100,
        Some(VIEW_INSTITUTION_JOB_SUPERVISORS),
        &["person", "employer", "position"],
    ),
    ResourceDescriptor::paged(
        "institution-jobs",
        &[8, 11, 12],
        100,
        Some(VIEW_INSTITUTION_JOB),
        &[
            "person",
            "employer",
            "position",
            "department",
            "startOn",
            "endOn",
            "status",
            "classification",
            "preference",
        ],
    )
    .writable(WriteAccess::create_update(12, CREATE_INSTITUTION_JOB)),
    ResourceDescriptor::paged(
        "institution-positions",
        &[7, 11, 12],
        100,
        Some(VIEW_INSTITUTION_POSITION),
        &[
            "campus",
            "status",
            "bargainingUnit",
            "reportsToPosition",
            "exemptionType",
            "compensationType",
            "startOn",
            "endOn",
        ],
    ),
    ResourceDescriptor::reference("instructor-tenure-types", &[9]),
    ResourceDescriptor::paged(
        "job-applications",
        &[10],
        100,
        Some(VIEW_JOB_APPLICATIONS),
        &["person", "position"],
    ),
    ResourceDescriptor::reference("job-change-reasons", &[7]),
    ResourceDescriptor::paged("leave-plans", &[11], 100, None, &["code", "type"]),
    ResourceDescriptor::reference("leave-types", &[11]),
    ResourceDescriptor::reference("pay-classes", &[11]),
    ResourceDescriptor::reference("pay-classifications", &[11, 12]),
    ResourceDescriptor::reference("pay-cycles", &[12]),
    ResourceDescriptor::paged(
        "pay-periods",
        &[12],
        100,
        None,
        &["code", "payCycle", "startOn", "endOn"],
    ),
    ResourceDescriptor::reference("pay-scales", &[11]),
    ResourceDescriptor::reference("payroll-deduction-arrangement-change-reasons", &[7]),
    ResourceDescriptor::paged(
        "payroll-deduction-arrangements",
        &[7],
        100,
        Some(VIEW_PAYROLL_DEDUCTION_ARRANGEMENTS),
        &["person", "deduction", "status"],
    )
    .writable(WriteAccess::create_update(
        7,
        CREATE_PAYROLL_DEDUCTION_ARRANGEMENTS,
    )),
    ResourceDescriptor::paged(
        "person-beneficiaries",
        &[11],
        100,
        Some(VIEW_PERSON_BENEFICIARIES),
        &["person"],
    ),
    ResourceDescriptor::paged(
        "person-benefit-dependents",
        &[11],
        100,
        Some(VIEW_PERSON_BENEFIT_DEPENDENTS),
        &["person", "dependent"],
    ),
    ResourceDescriptor::paged(
        "person-employment-proficiencies",
        &[10],
        100,
        Some(VIEW_PERSON_EMP_PROFICIENCIES),
        &["person"],
    ),
    ResourceDescriptor::reference("person-employment-references", &[10]),
    ResourceDescriptor::reference("position-classifications", &[12]),
    ResourceDescriptor::reference("proficiency-licensing-authorities", &[10]),
    ResourceDescriptor::reference("rehire-types", &[7]),
];

/// Look up a resource by route name.
pub fn find(name: &str) -> Option<&'static ResourceDescriptor> {
    CATALOGUE.iter().find(|d| d.name == name)
}
