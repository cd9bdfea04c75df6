//! Resource manager - coordinates HR resource reads and writes.
//!
//! Looks resources up in the catalogue, serves reference lists through the
//! cache, and hands paged lists and writes to the repository. Data privacy
//! rules are resolved per caller.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::write::{check_create_body, merge_payload};
use domain::{
    find, require_guid, restricted_for, Criteria, DomainError, EmployeeSummary,
    EmployeeSummaryQueryCriteria, Paging, PrivacyRule, ResourceDescriptor, ResourcePage,
    ResourceRecord, WriteOp,
};

use crate::cache::ReferenceCache;
use crate::repository::ResourceRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Resource whose records answer `/qapi/employee-leave-plans`.
pub const EMPLOYEE_LEAVE_PLANS: &str = "employee-leave-plans";

/// Parameters of a list call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    pub resource: String,
    pub version: u32,
    /// Ignored for unpaged resources; defaulted for paged ones
    pub paging: Option<Paging>,
    pub criteria: Criteria,
    pub bypass_cache: bool,
}

/// Result of a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub database: bool,
    pub cache: bool,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.database && self.cache
    }
}

/// Coordination contract served over gRPC.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ResourceService: Send + Sync {
    /// One page of a resource, filtered by criteria
    async fn list_resources(&self, request: ListRequest) -> AppResult<ResourcePage>;

    /// A single record by GUID
    async fn get_resource(
        &self,
        resource: &str,
        version: u32,
        guid: &str,
        bypass_cache: bool,
    ) -> AppResult<ResourceRecord>;

    /// Store a new record; the GUID is assigned here
    async fn create_resource(
        &self,
        resource: &str,
        version: u32,
        body: Map<String, Value>,
    ) -> AppResult<ResourceRecord>;

    /// Merge a partial body onto an existing record
    async fn update_resource(
        &self,
        resource: &str,
        version: u32,
        guid: &str,
        body: Map<String, Value>,
    ) -> AppResult<ResourceRecord>;

    /// Remove a record
    async fn delete_resource(&self, resource: &str, version: u32, guid: &str) -> AppResult<()>;

    /// DTO properties withheld from a caller holding `permissions`
    async fn data_privacy(
        &self,
        resource: &str,
        permissions: &[String],
        bypass_cache: bool,
    ) -> AppResult<Vec<String>>;

    /// Employee summaries matching the criteria
    async fn query_employee_summaries(
        &self,
        criteria: EmployeeSummaryQueryCriteria,
    ) -> AppResult<Vec<EmployeeSummary>>;

    /// Employee summaries whose name contains `keyword`
    async fn search_employees(
        &self,
        keyword: &str,
        include_inactive: bool,
    ) -> AppResult<Vec<EmployeeSummary>>;

    /// Leave plans of a supervisor's reports, or of the listed employees
    async fn query_employee_leave_plans(
        &self,
        supervisor_id: Option<String>,
        supervisee_ids: Vec<String>,
    ) -> AppResult<Vec<ResourceRecord>>;

    /// Check the database and cache
    async fn health(&self) -> HealthReport;
}

/// Concrete implementation of ResourceService.
pub struct ResourceManager {
    repo: Arc<dyn ResourceRepository>,
    cache: Arc<dyn ReferenceCache>,
}

impl ResourceManager {
    pub fn new(repo: Arc<dyn ResourceRepository>, cache: Arc<dyn ReferenceCache>) -> Self {
        Self { repo, cache }
    }

    fn descriptor(resource: &str, version: u32) -> AppResult<&'static ResourceDescriptor> {
        let descriptor = find(resource).ok_or_else(|| {
            AppError::invalid_argument(format!("Unknown resource '{}'", resource))
        })?;

        // Zero means the caller did not pin a version
        if version != 0 && !descriptor.supports_version(version) {
            return Err(AppError::invalid_argument(format!(
                "Version {} of {} is not supported",
                version, resource
            )));
        }

        Ok(descriptor)
    }

    /// Descriptor of a resource that accepts `op`; unpinned writes use the
    /// write version.
    fn write_descriptor(
        resource: &str,
        version: u32,
        op: WriteOp,
    ) -> AppResult<&'static ResourceDescriptor> {
        let descriptor = Self::descriptor(resource, version)?;
        let version = match (version, descriptor.writes) {
            (0, Some(writes)) => writes.version,
            _ => version,
        };

        match descriptor.write_permission(op, version) {
            Some(_) => Ok(descriptor),
            None => Err(AppError::NotSupported),
        }
    }

    /// Full record list of a reference resource. A bypass skips the cache
    /// read but still refreshes the entry.
    async fn load_reference(
        &self,
        descriptor: &ResourceDescriptor,
        bypass_cache: bool,
    ) -> AppResult<Vec<ResourceRecord>> {
        if !bypass_cache {
            match self.cache.records(descriptor.name).await {
                Ok(Some(records)) => {
                    tracing::debug!(resource = descriptor.name, "Cache hit");
                    return Ok(records);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(resource = descriptor.name, "Cache read failed: {}", e),
            }
        }

        let records = self.repo.list_by_resource(descriptor.name).await?;
        if let Err(e) = self.cache.store_records(descriptor.name, &records).await {
            tracing::warn!(resource = descriptor.name, "Cache write failed: {}", e);
        }

        Ok(records)
    }

    async fn privacy_rules(
        &self,
        descriptor: &ResourceDescriptor,
        bypass_cache: bool,
    ) -> AppResult<Vec<PrivacyRule>> {
        if !bypass_cache {
            match self.cache.privacy(descriptor.name).await {
                Ok(Some(rules)) => return Ok(rules),
                Ok(None) => {}
                Err(e) => tracing::warn!(resource = descriptor.name, "Cache read failed: {}", e),
            }
        }

        let rules = self.repo.privacy_rules(descriptor.name).await?;
        if let Err(e) = self.cache.store_privacy(descriptor.name, &rules).await {
            tracing::warn!(resource = descriptor.name, "Cache write failed: {}", e);
        }

        Ok(rules)
    }
}

#[async_trait]
impl ResourceService for ResourceManager {
    async fn list_resources(&self, request: ListRequest) -> AppResult<ResourcePage> {
        let descriptor = Self::descriptor(&request.resource, request.version)?;
        request.criteria.validate_for(descriptor)?;

        let Some(page_size) = descriptor.default_page_size else {
            let matching: Vec<ResourceRecord> = self
                .load_reference(descriptor, request.bypass_cache)
                .await?
                .into_iter()
                .filter(|r| request.criteria.matches(&r.to_json()))
                .collect();
            let total = matching.len() as u64;
            return Ok(ResourcePage::new(matching, total));
        };

        let paging = match request.paging {
            Some(p) => Paging::resolve(Some(p.offset), Some(p.limit), page_size)?,
            None => Paging::new(0, page_size),
        };
        self.repo
            .list_page(descriptor.name, &request.criteria, paging)
            .await
    }

    async fn get_resource(
        &self,
        resource: &str,
        version: u32,
        guid: &str,
        bypass_cache: bool,
    ) -> AppResult<ResourceRecord> {
        let descriptor = Self::descriptor(resource, version)?;
        let guid = require_guid(guid)?;

        let record = if descriptor.is_paged() {
            self.repo.find_by_guid(descriptor.name, &guid).await?
        } else {
            self.load_reference(descriptor, bypass_cache)
                .await?
                .into_iter()
                .find(|r| r.id.eq_ignore_ascii_case(&guid))
        };

        record.ok_or_not_found(&format!("{} {}", descriptor.name, guid))
    }

    async fn create_resource(
        &self,
        resource: &str,
        version: u32,
        mut body: Map<String, Value>,
    ) -> AppResult<ResourceRecord> {
        let descriptor = Self::write_descriptor(resource, version, WriteOp::Create)?;
        check_create_body(&body)?;

        let guid = Uuid::new_v4().to_string();
        body.insert("id".to_string(), Value::String(guid.clone()));

        let record = self
            .repo
            .insert(descriptor.name, ResourceRecord::new(guid, Value::Object(body)))
            .await?;
        tracing::info!(resource = descriptor.name, guid = %record.id, "Record created");
        Ok(record)
    }

    async fn update_resource(
        &self,
        resource: &str,
        version: u32,
        guid: &str,
        body: Map<String, Value>,
    ) -> AppResult<ResourceRecord> {
        let descriptor = Self::write_descriptor(resource, version, WriteOp::Update)?;
        let guid = require_guid(guid)?;
        let key = format!("{} {}", descriptor.name, guid);

        let existing = self
            .repo
            .find_by_guid(descriptor.name, &guid)
            .await?
            .ok_or_not_found(&key)?;

        let mut merged = merge_payload(&existing.payload, body);
        if let Value::Object(map) = &mut merged {
            map.insert("id".to_string(), Value::String(guid.clone()));
        }

        let record = self
            .repo
            .update(descriptor.name, ResourceRecord::new(guid, merged))
            .await?
            .ok_or_not_found(&key)?;
        tracing::info!(resource = descriptor.name, guid = %record.id, "Record updated");
        Ok(record)
    }

    async fn delete_resource(&self, resource: &str, version: u32, guid: &str) -> AppResult<()> {
        let descriptor = Self::write_descriptor(resource, version, WriteOp::Delete)?;
        let guid = require_guid(guid)?;

        if !self.repo.delete(descriptor.name, &guid).await? {
            return Err(AppError::NotFound(format!(
                "No record found for {} {}",
                descriptor.name, guid
            )));
        }
        tracing::info!(resource = descriptor.name, guid = %guid, "Record deleted");
        Ok(())
    }

    async fn data_privacy(
        &self,
        resource: &str,
        permissions: &[String],
        bypass_cache: bool,
    ) -> AppResult<Vec<String>> {
        let descriptor = Self::descriptor(resource, 0)?;
        let rules = self.privacy_rules(descriptor, bypass_cache).await?;
        Ok(restricted_for(&rules, permissions))
    }

    async fn query_employee_summaries(
        &self,
        criteria: EmployeeSummaryQueryCriteria,
    ) -> AppResult<Vec<EmployeeSummary>> {
        criteria
            .validate()
            .map_err(|e| DomainError::invalid_argument(e.to_string()))?;

        let summaries = self.repo.list_employee_summaries().await?;
        Ok(summaries
            .into_iter()
            .filter(|s| s.matches(&criteria))
            .collect())
    }

    async fn search_employees(
        &self,
        keyword: &str,
        include_inactive: bool,
    ) -> AppResult<Vec<EmployeeSummary>> {
        if keyword.trim().is_empty() {
            return Err(AppError::invalid_argument("A query keyword is required."));
        }

        let summaries = self.repo.search_employee_summaries(keyword).await?;
        Ok(summaries
            .into_iter()
            .filter(|s| include_inactive || s.status.is_active())
            .collect())
    }

    async fn query_employee_leave_plans(
        &self,
        supervisor_id: Option<String>,
        supervisee_ids: Vec<String>,
    ) -> AppResult<Vec<ResourceRecord>> {
        let people = match supervisor_id {
            Some(supervisor) => {
                let reports = EmployeeSummaryQueryCriteria {
                    supervisor_ids: vec![supervisor],
                    ..Default::default()
                };
                self.repo
                    .list_employee_summaries()
                    .await?
                    .into_iter()
                    .filter(|s| s.matches(&reports))
                    .map(|s| s.employee_id)
                    .filter(|id| supervisee_ids.is_empty() || supervisee_ids.contains(id))
                    .collect()
            }
            None if supervisee_ids.is_empty() => {
                return Err(AppError::invalid_argument(
                    "Criteria must include a supervisor Id or supervisee Id(s)",
                ))
            }
            None => supervisee_ids,
        };

        self.repo.list_by_person(EMPLOYEE_LEAVE_PLANS, &people).await
    }

    async fn health(&self) -> HealthReport {
        let database = match self.repo.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Database ping failed: {}", e);
                false
            }
        };
        let cache = match self.cache.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Cache ping failed: {}", e);
                false
            }
        };

        HealthReport { database, cache }
    }
}
