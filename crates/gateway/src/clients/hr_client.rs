//! Client for the HR coordination service.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use common::{AppError, AppResult, GrpcClientConfig};
use domain::{
    Criteria, EmployeeNameQueryCriteria, EmployeeStatus, EmployeeSummary,
    EmployeeSummaryQueryCriteria, Paging, ResourcePage, ResourceRecord,
};
use proto::hr::{
    human_resources_service_client::HumanResourcesServiceClient, CreateResourceRequest,
    DataPrivacyRequest, DeleteResourceRequest, EmployeeLeavePlanQueryRequest,
    EmployeeNameSearchRequest, EmployeeSummaryQueryRequest, GetResourceRequest,
    ListResourcesRequest, PageRequest, PingRequest, UpdateResourceRequest,
};

#[cfg(test)]
use mockall::automock;

/// Parameters of a list call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceQuery {
    pub resource: String,
    pub version: u32,
    /// `None` for unpaged resources
    pub paging: Option<Paging>,
    pub criteria: Criteria,
    pub bypass_cache: bool,
}

/// Reachability of the coordination service and its dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrServiceHealth {
    pub healthy: bool,
    pub database: String,
    pub cache: String,
}

/// The coordination layer as seen by the HTTP handlers.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HrResourceService: Send + Sync {
    /// One page of a resource
    async fn list_resources(&self, query: ResourceQuery) -> AppResult<ResourcePage>;

    /// A single record by GUID
    async fn get_resource(
        &self,
        resource: &str,
        version: u32,
        guid: &str,
        bypass_cache: bool,
    ) -> AppResult<ResourceRecord>;

    /// Store a new record
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

    /// DTO properties this caller may not see
    async fn data_privacy(
        &self,
        resource: &str,
        person_id: &str,
        permissions: &[String],
        bypass_cache: bool,
    ) -> AppResult<Vec<String>>;

    /// Employee summaries matching the criteria
    async fn query_employee_summaries(
        &self,
        criteria: EmployeeSummaryQueryCriteria,
    ) -> AppResult<Vec<EmployeeSummary>>;

    /// Employees whose name contains the keyword
    async fn search_employees(
        &self,
        criteria: EmployeeNameQueryCriteria,
    ) -> AppResult<Vec<EmployeeSummary>>;

    /// Leave plans of a supervisor's reports, or of the listed employees
    async fn query_employee_leave_plans(
        &self,
        supervisor_id: Option<String>,
        supervisee_ids: Vec<String>,
    ) -> AppResult<Vec<ResourceRecord>>;

    /// Check the coordination service
    async fn ping(&self) -> AppResult<HrServiceHealth>;
}

/// gRPC client wrapper for hr-service.
pub struct HrClient {
    client: HumanResourcesServiceClient<Channel>,
}

impl HrClient {
    /// Build a lazily connected client; the channel dials on first use.
    pub fn connect(config: &GrpcClientConfig) -> Result<Self, tonic::transport::Error> {
        debug!("Connecting to hr-service at {}", config.endpoint);
        let channel = Endpoint::from_shared(config.endpoint.clone())?
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .connect_lazy();

        Ok(Self {
            client: HumanResourcesServiceClient::new(channel),
        })
    }
}

#[async_trait]
impl HrResourceService for HrClient {
    async fn list_resources(&self, query: ResourceQuery) -> AppResult<ResourcePage> {
        let criteria_json = if query.criteria.is_empty() {
            String::new()
        } else {
            query.criteria.to_json_string()
        };
        let request = tonic::Request::new(ListResourcesRequest {
            resource: query.resource,
            version: query.version,
            bypass_cache: query.bypass_cache,
            page: query.paging.map(|p| PageRequest {
                offset: p.offset,
                limit: p.limit,
            }),
            criteria_json,
        });

        let mut client = self.client.clone();
        let response = client.list_resources(request).await.map_err(AppError::from)?;
        let proto = response.into_inner();

        let items = proto
            .items_json
            .iter()
            .map(String::as_str)
            .map(parse_record)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(ResourcePage::new(items, proto.total))
    }

    async fn get_resource(
        &self,
        resource: &str,
        version: u32,
        guid: &str,
        bypass_cache: bool,
    ) -> AppResult<ResourceRecord> {
        let request = tonic::Request::new(GetResourceRequest {
            resource: resource.to_string(),
            version,
            guid: guid.to_string(),
            bypass_cache,
        });

        let mut client = self.client.clone();
        let response = client.get_resource(request).await.map_err(AppError::from)?;
        parse_record(&response.into_inner().item_json)
    }

    async fn create_resource(
        &self,
        resource: &str,
        version: u32,
        body: Map<String, Value>,
    ) -> AppResult<ResourceRecord> {
        let request = tonic::Request::new(CreateResourceRequest {
            resource: resource.to_string(),
            version,
            item_json: Value::Object(body).to_string(),
        });

        let mut client = self.client.clone();
        let response = client.create_resource(request).await.map_err(AppError::from)?;
        parse_record(&response.into_inner().item_json)
    }

    async fn update_resource(
        &self,
        resource: &str,
        version: u32,
        guid: &str,
        body: Map<String, Value>,
    ) -> AppResult<ResourceRecord> {
        let request = tonic::Request::new(UpdateResourceRequest {
            resource: resource.to_string(),
            version,
            guid: guid.to_string(),
            item_json: Value::Object(body).to_string(),
        });

        let mut client = self.client.clone();
        let response = client.update_resource(request).await.map_err(AppError::from)?;
        parse_record(&response.into_inner().item_json)
    }

    async fn delete_resource(&self, resource: &str, version: u32, guid: &str) -> AppResult<()> {
        let request = tonic::Request::new(DeleteResourceRequest {
            resource: resource.to_string(),
            version,
            guid: guid.to_string(),
        });

        let mut client = self.client.clone();
        client.delete_resource(request).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn data_privacy(
        &self,
        resource: &str,
        person_id: &str,
        permissions: &[String],
        bypass_cache: bool,
    ) -> AppResult<Vec<String>> {
        let request = tonic::Request::new(DataPrivacyRequest {
            resource: resource.to_string(),
            bypass_cache,
            person_id: person_id.to_string(),
            permissions: permissions.to_vec(),
        });

        let mut client = self.client.clone();
        let response = client.get_data_privacy(request).await.map_err(AppError::from)?;
        Ok(response.into_inner().properties)
    }

    async fn query_employee_summaries(
        &self,
        criteria: EmployeeSummaryQueryCriteria,
    ) -> AppResult<Vec<EmployeeSummary>> {
        let request = tonic::Request::new(EmployeeSummaryQueryRequest {
            supervisor_ids: criteria.supervisor_ids,
            employee_ids: criteria.employee_ids,
            include_inactive: criteria.include_inactive,
        });

        let mut client = self.client.clone();
        let response = client
            .query_employee_summaries(request)
            .await
            .map_err(AppError::from)?;

        Ok(response
            .into_inner()
            .summaries
            .into_iter()
            .map(proto_to_summary)
            .collect())
    }

    async fn search_employees(
        &self,
        criteria: EmployeeNameQueryCriteria,
    ) -> AppResult<Vec<EmployeeSummary>> {
        let request = tonic::Request::new(EmployeeNameSearchRequest {
            keyword: criteria.query_keyword,
            include_inactive: criteria.include_inactive,
        });

        let mut client = self.client.clone();
        let response = client.search_employees(request).await.map_err(AppError::from)?;

        Ok(response
            .into_inner()
            .summaries
            .into_iter()
            .map(proto_to_summary)
            .collect())
    }

    async fn query_employee_leave_plans(
        &self,
        supervisor_id: Option<String>,
        supervisee_ids: Vec<String>,
    ) -> AppResult<Vec<ResourceRecord>> {
        let request = tonic::Request::new(EmployeeLeavePlanQueryRequest {
            supervisor_id: supervisor_id.unwrap_or_default(),
            supervisee_ids,
        });

        let mut client = self.client.clone();
        let response = client
            .query_employee_leave_plans(request)
            .await
            .map_err(AppError::from)?;

        response
            .into_inner()
            .items_json
            .iter()
            .map(String::as_str)
            .map(parse_record)
            .collect()
    }

    async fn ping(&self) -> AppResult<HrServiceHealth> {
        let mut client = self.client.clone();
        let response = client
            .ping(tonic::Request::new(PingRequest {}))
            .await
            .map_err(AppError::from)?
            .into_inner();

        Ok(HrServiceHealth {
            healthy: response.healthy,
            database: response.database,
            cache: response.cache,
        })
    }
}

/// Decode one DTO document sent by hr-service.
fn parse_record(json: &str) -> AppResult<ResourceRecord> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| AppError::Integration(format!("Invalid resource document: {}", e)))?;
    Ok(ResourceRecord::from_json(value)?)
}

/// Convert proto EmployeeSummary to domain.
fn proto_to_summary(proto: proto::hr::EmployeeSummary) -> EmployeeSummary {
    EmployeeSummary {
        employee_id: proto.employee_id,
        name: proto.name,
        primary_position_id: Some(proto.primary_position_id).filter(|id| !id.is_empty()),
        supervisor_ids: proto.supervisor_ids,
        status: EmployeeStatus::from(proto.status.as_str()),
    }
}
