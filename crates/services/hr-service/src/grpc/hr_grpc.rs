//! gRPC implementation for HumanResourcesService.

use std::sync::Arc;

use serde_json::Value;
use tonic::{Request, Response, Status};

use crate::service::{ListRequest, ResourceService};
use common::AppError;
use domain::write::parse_body;
use domain::{Criteria, EmployeeSummaryQueryCriteria, Paging, ResourceRecord};
use proto::hr::{
    human_resources_service_server::HumanResourcesService, CreateResourceRequest,
    DataPrivacyRequest, DataPrivacyResponse, DeleteResourceRequest, DeleteResourceResponse,
    EmployeeLeavePlanQueryRequest, EmployeeNameSearchRequest,
    EmployeeSummary as EmployeeSummaryProto, EmployeeSummaryQueryRequest,
    EmployeeSummaryQueryResponse, GetResourceRequest, ListResourcesRequest, ListResourcesResponse,
    PingRequest, PingResponse, ResourceResponse, UpdateResourceRequest,
};

/// gRPC service wrapper for ResourceService.
pub struct HrGrpcService {
    service: Arc<dyn ResourceService>,
}

impl HrGrpcService {
    /// Create a new gRPC service wrapper.
    pub fn new(service: Arc<dyn ResourceService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl HumanResourcesService for HrGrpcService {
    async fn list_resources(
        &self,
        request: Request<ListResourcesRequest>,
    ) -> Result<Response<ListResourcesResponse>, Status> {
        let req = request.into_inner();
        let list = ListRequest {
            criteria: parse_criteria(&req.criteria_json)?,
            paging: req.page.map(|p| Paging::new(p.offset, p.limit)),
            resource: req.resource,
            version: req.version,
            bypass_cache: req.bypass_cache,
        };

        let page = self.service.list_resources(list).await.map_err(Status::from)?;
        Ok(Response::new(ListResourcesResponse {
            total: page.total,
            ..records_to_proto(&page.items)
        }))
    }

    async fn get_resource(
        &self,
        request: Request<GetResourceRequest>,
    ) -> Result<Response<ResourceResponse>, Status> {
        let req = request.into_inner();

        let record = self
            .service
            .get_resource(&req.resource, req.version, &req.guid, req.bypass_cache)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(ResourceResponse {
            item_json: record.to_json().to_string(),
        }))
    }

    async fn create_resource(
        &self,
        request: Request<CreateResourceRequest>,
    ) -> Result<Response<ResourceResponse>, Status> {
        let req = request.into_inner();
        let body = parse_body(req.item_json.as_bytes()).map_err(AppError::from)?;

        let record = self
            .service
            .create_resource(&req.resource, req.version, body)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(ResourceResponse {
            item_json: record.to_json().to_string(),
        }))
    }

    async fn update_resource(
        &self,
        request: Request<UpdateResourceRequest>,
    ) -> Result<Response<ResourceResponse>, Status> {
        let req = request.into_inner();
        let body = parse_body(req.item_json.as_bytes()).map_err(AppError::from)?;

        let record = self
            .service
            .update_resource(&req.resource, req.version, &req.guid, body)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(ResourceResponse {
            item_json: record.to_json().to_string(),
        }))
    }

    async fn delete_resource(
        &self,
        request: Request<DeleteResourceRequest>,
    ) -> Result<Response<DeleteResourceResponse>, Status> {
        let req = request.into_inner();

        self.service
            .delete_resource(&req.resource, req.version, &req.guid)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(DeleteResourceResponse {}))
    }

    async fn get_data_privacy(
        &self,
        request: Request<DataPrivacyRequest>,
    ) -> Result<Response<DataPrivacyResponse>, Status> {
        let req = request.into_inner();
        tracing::debug!(
            resource = %req.resource,
            person_id = %req.person_id,
            "Resolving data privacy"
        );

        let properties = self
            .service
            .data_privacy(&req.resource, &req.permissions, req.bypass_cache)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(DataPrivacyResponse { properties }))
    }

    async fn query_employee_summaries(
        &self,
        request: Request<EmployeeSummaryQueryRequest>,
    ) -> Result<Response<EmployeeSummaryQueryResponse>, Status> {
        let req = request.into_inner();
        let criteria = EmployeeSummaryQueryCriteria {
            supervisor_ids: req.supervisor_ids,
            employee_ids: req.employee_ids,
            include_inactive: req.include_inactive,
        };

        let summaries = self
            .service
            .query_employee_summaries(criteria)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(EmployeeSummaryQueryResponse {
            summaries: summaries.iter().map(summary_to_proto).collect(),
        }))
    }

    async fn search_employees(
        &self,
        request: Request<EmployeeNameSearchRequest>,
    ) -> Result<Response<EmployeeSummaryQueryResponse>, Status> {
        let req = request.into_inner();

        let summaries = self
            .service
            .search_employees(&req.keyword, req.include_inactive)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(EmployeeSummaryQueryResponse {
            summaries: summaries.iter().map(summary_to_proto).collect(),
        }))
    }

    async fn query_employee_leave_plans(
        &self,
        request: Request<EmployeeLeavePlanQueryRequest>,
    ) -> Result<Response<ListResourcesResponse>, Status> {
        let req = request.into_inner();
        let supervisor = Some(req.supervisor_id).filter(|id| !id.trim().is_empty());

        let plans = self
            .service
            .query_employee_leave_plans(supervisor, req.supervisee_ids)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(records_to_proto(&plans)))
    }

    async fn ping(&self, _request: Request<PingRequest>) -> Result<Response<PingResponse>, Status> {
        let report = self.service.health().await;
        Ok(Response::new(PingResponse {
            healthy: report.is_healthy(),
            database: up_or_down(report.database).to_string(),
            cache: up_or_down(report.cache).to_string(),
        }))
    }
}

/// Decode the JSON criteria object; empty means no filter.
fn parse_criteria(raw: &str) -> Result<Criteria, Status> {
    if raw.trim().is_empty() {
        return Ok(Criteria::default());
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(Criteria::from_map(map)),
        Ok(_) => Err(invalid_criteria("criteria must be a JSON object")),
        Err(e) => Err(invalid_criteria(&e.to_string())),
    }
}

fn invalid_criteria(detail: &str) -> Status {
    Status::from(AppError::invalid_argument(format!("Invalid criteria: {}", detail)))
}

/// Every record as a JSON document; `total` is the record count.
fn records_to_proto(records: &[ResourceRecord]) -> ListResourcesResponse {
    ListResourcesResponse {
        items_json: records.iter().map(|r| r.to_json().to_string()).collect(),
        total: records.len() as u64,
    }
}

fn up_or_down(ok: bool) -> &'static str {
    if ok {
        "up"
    } else {
        "down"
    }
}

/// Convert domain EmployeeSummary to proto.
fn summary_to_proto(summary: &domain::EmployeeSummary) -> EmployeeSummaryProto {
    EmployeeSummaryProto {
        employee_id: summary.employee_id.clone(),
        name: summary.name.clone(),
        primary_position_id: summary.primary_position_id.clone().unwrap_or_default(),
        supervisor_ids: summary.supervisor_ids.clone(),
        status: summary.status.to_string(),
    }
}
