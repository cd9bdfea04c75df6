//! Integration tests for the HTTP integration API.
//!
//! These tests drive the full router with a stub coordination service, so
//! no hr-service, database or Redis is needed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use common::{AppError, AppResult, JwtConfig};
use domain::{
    integration_media_type, EmployeeNameQueryCriteria, EmployeeStatus, EmployeeSummary,
    EmployeeSummaryQueryCriteria, ResourcePage, ResourceRecord, APPROVE_REJECT_TIME_ENTRY,
    CREATE_INSTITUTION_JOB, DELETE_EMPLOYMENT_PERFORMANCE_REVIEWS,
    EMPLOYEE_NAME_SEARCH_MEDIA_TYPE, GUID_MISMATCH_MESSAGE, MISSING_BODY_MESSAGE,
    NOT_SUPPORTED_MESSAGE, NULL_GUID_MESSAGE, SESSION_EXPIRED_MESSAGE, UNEXPECTED_ERROR_MESSAGE,
    UPDATE_EMPLOYEE, UPDATE_EMPLOYMENT_PERFORMANCE_REVIEWS, VIEW_EMPLOYEE_DATA,
    VIEW_EMPLOYEE_SUMMARY,
};
use gateway_lib::clients::{HrResourceService, HrServiceHealth, ResourceQuery};
use gateway_lib::handlers::self_service_handler::EMPLOYEE_QUERY_FORBIDDEN_MESSAGE;
use gateway_lib::config::GatewayConfig;
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;
use gateway_lib::token::{issue_token, Claims};

const SECRET: &str = "test-secret-key-for-testing-only-32chars";
const PAY_CYCLE_ID: &str = "5f2c3b8e-41f4-4d27-9d1a-4b3e4c8a9f10";
const EMPLOYEE_ID: &str = "8d3e2a71-0c5b-4f6e-9a1d-2b7c4e5f6a80";
const NEW_ID: &str = "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d";
const NIL_GUID: &str = "00000000-0000-0000-0000-000000000000";

// =============================================================================
// Stub Coordination Service
// =============================================================================

/// Canned coordination service that records what it was asked.
#[derive(Default)]
struct StubHrService {
    records: Vec<ResourceRecord>,
    total: u64,
    restricted: Vec<String>,
    /// Callers holding this permission get an empty privacy list
    privacy_exempt: Option<&'static str>,
    summaries: Vec<EmployeeSummary>,
    /// Failure returned by every resource read and write
    failure: Option<fn() -> AppError>,
    unavailable: bool,
    calls: Mutex<Vec<String>>,
    last_query: Mutex<Option<ResourceQuery>>,
}

impl StubHrService {
    fn with_records(records: Vec<ResourceRecord>) -> Self {
        let total = records.len() as u64;
        Self {
            records,
            total,
            ..Default::default()
        }
    }

    fn record_call(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn last_query(&self) -> ResourceQuery {
        self.last_query.lock().unwrap().clone().expect("no list call")
    }

    fn fail(&self) -> AppResult<()> {
        match self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }

    fn find(&self, guid: &str) -> AppResult<ResourceRecord> {
        self.records
            .iter()
            .find(|r| r.id == guid)
            .cloned()
            .ok_or_else(|| AppError::not_found(guid))
    }
}

#[async_trait]
impl HrResourceService for StubHrService {
    async fn list_resources(&self, query: ResourceQuery) -> AppResult<ResourcePage> {
        self.record_call(format!("list {}", query.resource));
        *self.last_query.lock().unwrap() = Some(query);
        self.fail()?;
        Ok(ResourcePage::new(self.records.clone(), self.total))
    }

    async fn get_resource(
        &self,
        resource: &str,
        _version: u32,
        guid: &str,
        _bypass_cache: bool,
    ) -> AppResult<ResourceRecord> {
        self.record_call(format!("get {} {}", resource, guid));
        self.fail()?;
        self.find(guid)
    }

    async fn create_resource(
        &self,
        resource: &str,
        version: u32,
        mut body: Map<String, Value>,
    ) -> AppResult<ResourceRecord> {
        self.record_call(format!("create {} v{}", resource, version));
        self.fail()?;
        body.insert("id".to_string(), json!(NEW_ID));
        Ok(ResourceRecord::new(NEW_ID, Value::Object(body)))
    }

    async fn update_resource(
        &self,
        resource: &str,
        _version: u32,
        guid: &str,
        body: Map<String, Value>,
    ) -> AppResult<ResourceRecord> {
        self.record_call(format!("update {} {}", resource, guid));
        self.fail()?;
        let mut record = self.find(guid)?;
        if let Value::Object(payload) = &mut record.payload {
            payload.extend(body);
        }
        Ok(record)
    }

    async fn delete_resource(&self, resource: &str, _version: u32, guid: &str) -> AppResult<()> {
        self.record_call(format!("delete {} {}", resource, guid));
        self.fail()?;
        self.find(guid).map(|_| ())
    }

    async fn data_privacy(
        &self,
        resource: &str,
        person_id: &str,
        permissions: &[String],
        _bypass_cache: bool,
    ) -> AppResult<Vec<String>> {
        self.record_call(format!("privacy {} {}", resource, person_id));
        match self.privacy_exempt {
            Some(exempt) if permissions.iter().any(|p| p == exempt) => Ok(vec![]),
            _ => Ok(self.restricted.clone()),
        }
    }

    async fn query_employee_summaries(
        &self,
        criteria: EmployeeSummaryQueryCriteria,
    ) -> AppResult<Vec<EmployeeSummary>> {
        self.record_call("summaries");
        Ok(self
            .summaries
            .iter()
            .filter(|s| s.matches(&criteria))
            .cloned()
            .collect())
    }

    async fn search_employees(
        &self,
        criteria: EmployeeNameQueryCriteria,
    ) -> AppResult<Vec<EmployeeSummary>> {
        self.record_call(format!("search {}", criteria.query_keyword));
        let keyword = criteria.query_keyword.to_lowercase();
        Ok(self
            .summaries
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&keyword))
            .cloned()
            .collect())
    }

    async fn query_employee_leave_plans(
        &self,
        supervisor_id: Option<String>,
        supervisee_ids: Vec<String>,
    ) -> AppResult<Vec<ResourceRecord>> {
        self.record_call(format!("leave-plans {:?} {:?}", supervisor_id, supervisee_ids));
        Ok(self.records.clone())
    }

    async fn ping(&self) -> AppResult<HrServiceHealth> {
        if self.unavailable {
            return Err(AppError::service_unavailable("hr-service"));
        }
        Ok(HrServiceHealth {
            healthy: true,
            database: "up".to_string(),
            cache: "up".to_string(),
        })
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: SECRET.to_string(),
        expiration_hours: 1,
    }
}

fn app(hr: Arc<StubHrService>) -> Router {
    let config = GatewayConfig {
        jwt: jwt_config(),
        ..Default::default()
    };
    create_router(AppState::new(hr, config))
}

fn token(person_id: &str, permissions: &[&str]) -> String {
    issue_token(
        &jwt_config(),
        person_id,
        "jdoe",
        permissions.iter().map(|p| p.to_string()).collect(),
    )
    .unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn send(method: Method, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn pay_cycle() -> ResourceRecord {
    ResourceRecord::new(PAY_CYCLE_ID, json!({"code": "MO", "title": "Monthly"}))
}

fn employee(id: &str) -> ResourceRecord {
    ResourceRecord::new(
        id,
        json!({"person": {"id": "p1"}, "status": "active", "dateOfBirth": "1980-02-03"}),
    )
}

fn summary(id: &str, supervisor: &str) -> EmployeeSummary {
    EmployeeSummary {
        employee_id: id.to_string(),
        name: format!("Employee {}", id),
        primary_position_id: None,
        supervisor_ids: vec![supervisor.to_string()],
        status: EmployeeStatus::Active,
    }
}

// =============================================================================
// Resource Listing Tests
// =============================================================================

#[tokio::test]
async fn test_list_returns_records_with_media_type() {
    let hr = Arc::new(StubHrService::with_records(vec![pay_cycle()]));

    let response = app(hr.clone())
        .oneshot(get("/pay-cycles", &token("p1", &[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["x-media-type"],
        integration_media_type(12).as_str()
    );
    assert!(response.headers().get("x-total-count").is_none());
    assert_eq!(
        body_json(response).await,
        json!([{"id": PAY_CYCLE_ID, "code": "MO", "title": "Monthly"}])
    );

    let query = hr.last_query();
    assert_eq!(query.resource, "pay-cycles");
    assert_eq!(query.version, 12);
    assert!(query.paging.is_none());
    assert!(!query.bypass_cache);
}

#[tokio::test]
async fn test_paged_list_sets_paging_headers() {
    let mut stub = StubHrService::with_records(vec![employee("e2"), employee("e3")]);
    stub.total = 40;
    let hr = Arc::new(stub);

    let response = app(hr.clone())
        .oneshot(get(
            "/employees?offset=1&limit=2",
            &token("p1", &[VIEW_EMPLOYEE_DATA]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-total-count"], "40");
    assert_eq!(response.headers()["x-hedtech-pageoffset"], "1");
    assert_eq!(response.headers()["x-hedtech-pagemaxsize"], "2");

    let paging = hr.last_query().paging.unwrap();
    assert_eq!((paging.offset, paging.limit), (1, 2));
}

#[tokio::test]
async fn test_no_cache_header_bypasses_cache() {
    let hr = Arc::new(StubHrService::with_records(vec![pay_cycle()]));

    let mut request = get("/pay-cycles", &token("p1", &[]));
    request
        .headers_mut()
        .insert(header::CACHE_CONTROL, "no-cache".parse().unwrap());
    let response = app(hr.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(hr.last_query().bypass_cache);
}

#[tokio::test]
async fn test_unknown_query_parameter_is_rejected() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr.clone())
        .oneshot(get("/pay-cycles?sort=code", &token("p1", &[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(hr.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_criteria_filter_is_rejected() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr.clone())
        .oneshot(get(
            "/pay-periods?criteria=%7B%22title%22%3A%22x%22%7D",
            &token("p1", &[]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["code"], "Validation.Exception");
    assert!(hr.calls().is_empty());
}

#[tokio::test]
async fn test_requested_version_is_forwarded() {
    let hr = Arc::new(StubHrService::with_records(vec![employee("e1")]));

    let mut request = get("/employees", &token("p1", &[VIEW_EMPLOYEE_DATA]));
    request.headers_mut().insert(
        header::ACCEPT,
        "application/vnd.hedtech.integration.v7+json".parse().unwrap(),
    );
    let response = app(hr.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-media-type"], integration_media_type(7).as_str());
    assert_eq!(hr.last_query().version, 7);
}

#[tokio::test]
async fn test_unsupported_version_is_not_acceptable() {
    let hr = Arc::new(StubHrService::default());

    let mut request = get("/employees", &token("p1", &[VIEW_EMPLOYEE_DATA]));
    request.headers_mut().insert(
        header::ACCEPT,
        "application/vnd.hedtech.integration.v9+json".parse().unwrap(),
    );
    let response = app(hr.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert!(hr.calls().is_empty());
}

#[tokio::test]
async fn test_restricted_properties_are_removed() {
    let mut stub = StubHrService::with_records(vec![employee("e1")]);
    stub.restricted = vec!["dateOfBirth".to_string()];
    let hr = Arc::new(stub);

    let response = app(hr)
        .oneshot(get("/employees", &token("p1", &[VIEW_EMPLOYEE_DATA])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-restricted"], "partial");
    let body = body_json(response).await;
    assert!(body[0].get("dateOfBirth").is_none());
    assert_eq!(body[0]["status"], "active");
}

#[tokio::test]
async fn test_privacy_follows_caller_permissions() {
    let mut stub = StubHrService::with_records(vec![employee("e1")]);
    stub.restricted = vec!["dateOfBirth".to_string()];
    stub.privacy_exempt = Some("VIEW.PERSON.DOB");
    let hr = Arc::new(stub);

    let response = app(hr.clone())
        .oneshot(get(
            "/employees",
            &token("hr1", &[VIEW_EMPLOYEE_DATA, "VIEW.PERSON.DOB"]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-content-restricted").is_none());
    assert_eq!(body_json(response).await[0]["dateOfBirth"], "1980-02-03");
    assert!(hr.calls().contains(&"privacy employees hr1".to_string()));
}

#[tokio::test]
async fn test_privacy_list_without_matches_is_not_flagged() {
    let mut stub = StubHrService::with_records(vec![pay_cycle()]);
    stub.restricted = vec!["dateOfBirth".to_string()];
    let hr = Arc::new(stub);

    let response = app(hr)
        .oneshot(get("/pay-cycles", &token("p1", &[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-content-restricted").is_none());
    assert_eq!(body_json(response).await[0]["code"], "MO");
}

#[tokio::test]
async fn test_empty_list_skips_privacy_lookup() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr.clone())
        .oneshot(get("/pay-cycles", &token("p1", &[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
    assert_eq!(hr.calls(), vec!["list pay-cycles".to_string()]);
}

// =============================================================================
// Single Resource Tests
// =============================================================================

#[tokio::test]
async fn test_get_by_guid_returns_record() {
    let hr = Arc::new(StubHrService::with_records(vec![pay_cycle()]));

    let response = app(hr.clone())
        .oneshot(get(
            &format!("/pay-cycles/{}", PAY_CYCLE_ID.to_uppercase()),
            &token("p1", &[]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["code"], "MO");
    assert_eq!(hr.calls()[0], format!("get pay-cycles {}", PAY_CYCLE_ID));
}

#[tokio::test]
async fn test_unknown_guid_is_not_found() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr)
        .oneshot(get(&format!("/pay-cycles/{}", PAY_CYCLE_ID), &token("p1", &[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["errors"][0]["code"], "GUID.Not.Found");
}

#[tokio::test]
async fn test_nil_guid_is_rejected() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr.clone())
        .oneshot(get(
            "/pay-cycles/00000000-0000-0000-0000-000000000000",
            &token("p1", &[]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errors"][0]["message"], NULL_GUID_MESSAGE);
    assert!(hr.calls().is_empty());
}

#[tokio::test]
async fn test_trailing_slash_without_guid_is_rejected() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr)
        .oneshot(get("/pay-cycles/", &token("p1", &[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errors"][0]["message"], NULL_GUID_MESSAGE);
}

// =============================================================================
// Write Tests
// =============================================================================

#[tokio::test]
async fn test_writes_to_read_only_resources_are_not_supported() {
    let hr = Arc::new(StubHrService::default());
    let token = token("p1", &[VIEW_EMPLOYEE_DATA, UPDATE_EMPLOYEE]);

    for (method, uri) in [
        (Method::POST, "/pay-cycles".to_string()),
        (Method::PUT, format!("/pay-cycles/{}", PAY_CYCLE_ID)),
        (Method::DELETE, format!("/pay-cycles/{}", PAY_CYCLE_ID)),
        (Method::PUT, "/pay-cycles/".to_string()),
        (Method::DELETE, format!("/employees/{}", EMPLOYEE_ID)),
        (Method::DELETE, "/employees/".to_string()),
    ] {
        let response = app(hr.clone())
            .oneshot(send(method.clone(), &uri, &token, Some(json!({"code": "X"}))))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{} {}",
            method,
            uri
        );
        assert_eq!(
            body_json(response).await["errors"][0]["message"],
            NOT_SUPPORTED_MESSAGE
        );
    }

    assert!(hr.calls().is_empty());
}

#[tokio::test]
async fn test_create_performance_review_returns_stored_record() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr.clone())
        .oneshot(send(
            Method::POST,
            "/employment-performance-reviews",
            &token("p1", &[UPDATE_EMPLOYMENT_PERFORMANCE_REVIEWS]),
            Some(json!({"id": NIL_GUID, "rating": {"id": "r1"}})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["x-media-type"],
        integration_media_type(10).as_str()
    );
    assert!(response.headers().get("x-content-restricted").is_none());
    let body = body_json(response).await;
    assert_eq!(body["id"], NEW_ID);
    assert_eq!(body["rating"]["id"], "r1");
    assert_eq!(hr.calls()[0], "create employment-performance-reviews v10");
}

#[tokio::test]
async fn test_create_without_body_is_rejected() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr.clone())
        .oneshot(send(
            Method::POST,
            "/institution-jobs",
            &token("p1", &[CREATE_INSTITUTION_JOB]),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["errors"][0]["message"],
        MISSING_BODY_MESSAGE
    );
    assert!(hr.calls().is_empty());
}

#[tokio::test]
async fn test_create_needs_write_permission() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr.clone())
        .oneshot(send(
            Method::POST,
            "/employees",
            &token("p1", &[VIEW_EMPLOYEE_DATA]),
            Some(json!({"person": {"id": "p9"}})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["errors"][0]["code"], "Access.Denied");
    assert!(hr.calls().is_empty());
}

#[tokio::test]
async fn test_write_at_read_only_version_is_not_supported() {
    let hr = Arc::new(StubHrService::with_records(vec![employee(EMPLOYEE_ID)]));

    let mut request = send(
        Method::PUT,
        &format!("/employees/{}", EMPLOYEE_ID),
        &token("p1", &[UPDATE_EMPLOYEE]),
        Some(json!({"status": "leave"})),
    );
    request.headers_mut().insert(
        header::ACCEPT,
        "application/vnd.hedtech.integration.v11+json".parse().unwrap(),
    );
    let response = app(hr.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(hr.calls().is_empty());
}

#[tokio::test]
async fn test_update_merges_body_and_redacts_response() {
    let mut stub = StubHrService::with_records(vec![employee(EMPLOYEE_ID)]);
    stub.restricted = vec!["dateOfBirth".to_string()];
    let hr = Arc::new(stub);

    let response = app(hr.clone())
        .oneshot(send(
            Method::PUT,
            &format!("/employees/{}", EMPLOYEE_ID.to_uppercase()),
            &token("p1", &[UPDATE_EMPLOYEE]),
            Some(json!({"status": "leave"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-restricted"], "partial");
    let body = body_json(response).await;
    assert_eq!(body["id"], EMPLOYEE_ID);
    assert_eq!(body["status"], "leave");
    assert!(body.get("dateOfBirth").is_none());
    assert_eq!(
        hr.calls(),
        vec![
            "privacy employees p1".to_string(),
            format!("update employees {}", EMPLOYEE_ID),
        ]
    );
}

#[tokio::test]
async fn test_update_guid_rules() {
    let hr = Arc::new(StubHrService::with_records(vec![employee(EMPLOYEE_ID)]));
    let token = token("p1", &[UPDATE_EMPLOYEE]);
    let uri = format!("/employees/{}", EMPLOYEE_ID);

    for (uri, body, message) in [
        (uri.clone(), json!({"id": PAY_CYCLE_ID}), GUID_MISMATCH_MESSAGE),
        (uri.clone(), json!({"id": NIL_GUID}), "GUID must be specified."),
        ("/employees/".to_string(), json!({}), NULL_GUID_MESSAGE),
    ] {
        let response = app(hr.clone())
            .oneshot(send(Method::PUT, &uri, &token, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", message);
        assert_eq!(body_json(response).await["errors"][0]["message"], message);
    }

    assert!(hr.calls().is_empty());
}

#[tokio::test]
async fn test_update_of_restricted_property_is_forbidden() {
    let mut stub = StubHrService::with_records(vec![employee(EMPLOYEE_ID)]);
    stub.restricted = vec!["dateOfBirth".to_string()];
    let hr = Arc::new(stub);

    let response = app(hr.clone())
        .oneshot(send(
            Method::PUT,
            &format!("/employees/{}", EMPLOYEE_ID),
            &token("p1", &[UPDATE_EMPLOYEE]),
            Some(json!({"dateOfBirth": "1990-01-01"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(hr.calls(), vec!["privacy employees p1".to_string()]);
}

#[tokio::test]
async fn test_delete_performance_review() {
    let review = ResourceRecord::new(EMPLOYEE_ID, json!({"rating": {"id": "r1"}}));
    let hr = Arc::new(StubHrService::with_records(vec![review]));
    let uri = format!("/employment-performance-reviews/{}", EMPLOYEE_ID);

    let response = app(hr.clone())
        .oneshot(send(
            Method::DELETE,
            &uri,
            &token("p1", &[UPDATE_EMPLOYMENT_PERFORMANCE_REVIEWS]),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(hr.calls().is_empty());

    let response = app(hr.clone())
        .oneshot(send(
            Method::DELETE,
            &uri,
            &token("p1", &[DELETE_EMPLOYMENT_PERFORMANCE_REVIEWS]),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        hr.calls(),
        vec![format!("delete employment-performance-reviews {}", EMPLOYEE_ID)]
    );
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[tokio::test]
async fn test_service_failures_map_to_status_and_code() {
    let cases: [(fn() -> AppError, StatusCode, &str); 10] = [
        (|| AppError::Repository("db down".into()), StatusCode::BAD_REQUEST, "Repository.Error"),
        (|| AppError::Integration("bad dto".into()), StatusCode::BAD_REQUEST, "Integration.Error"),
        (|| AppError::Unexpected("null".into()), StatusCode::BAD_REQUEST, "Global.Internal.Error"),
        (|| AppError::InvalidArgument("bad".into()), StatusCode::BAD_REQUEST, "Validation.Exception"),
        (|| AppError::not_found("x"), StatusCode::NOT_FOUND, "GUID.Not.Found"),
        (|| AppError::forbidden("no"), StatusCode::FORBIDDEN, "Access.Denied"),
        (|| AppError::SessionExpired, StatusCode::UNAUTHORIZED, "Session.Expired"),
        (|| AppError::NotSupported, StatusCode::METHOD_NOT_ALLOWED, "Global.Internal.Error"),
        (
            || AppError::service_unavailable("hr-service"),
            StatusCode::SERVICE_UNAVAILABLE,
            "Service.Unavailable",
        ),
        (|| AppError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR, "Global.Internal.Error"),
    ];
    let token = token("p1", &[VIEW_EMPLOYEE_DATA]);

    for (failure, status, code) in cases {
        let hr = Arc::new(StubHrService {
            records: vec![employee(EMPLOYEE_ID)],
            failure: Some(failure),
            ..Default::default()
        });

        for uri in ["/employees".to_string(), format!("/employees/{}", EMPLOYEE_ID)] {
            let response = app(hr.clone()).oneshot(get(&uri, &token)).await.unwrap();
            assert_eq!(response.status(), status, "{} {}", uri, code);
            let body = body_json(response).await;
            assert_eq!(body["errors"][0]["code"], code, "{}", uri);
        }
    }
}

#[tokio::test]
async fn test_unexpected_failure_hides_details() {
    let hr = Arc::new(StubHrService {
        failure: Some(|| AppError::Unexpected("NullReferenceException at line 12".into())),
        ..Default::default()
    });

    let response = app(hr)
        .oneshot(get("/pay-cycles", &token("p1", &[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["errors"][0]["message"],
        UNEXPECTED_ERROR_MESSAGE
    );
}

// =============================================================================
// Authentication & Authorization Tests
// =============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let hr = Arc::new(StubHrService::default());

    let request = Request::builder()
        .uri("/pay-cycles")
        .body(Body::empty())
        .unwrap();
    let response = app(hr.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(hr.calls().is_empty());
}

#[tokio::test]
async fn test_expired_token_reports_session_expired() {
    let hr = Arc::new(StubHrService::default());
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "p1".to_string(),
        name: "jdoe".to_string(),
        permissions: vec![],
        exp: now - 7200,
        iat: now - 10800,
    };
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let response = app(hr).oneshot(get("/pay-cycles", &expired)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["errors"][0]["message"],
        SESSION_EXPIRED_MESSAGE
    );
}

#[tokio::test]
async fn test_missing_permission_is_forbidden() {
    let hr = Arc::new(StubHrService::with_records(vec![employee("e1")]));

    let response = app(hr.clone())
        .oneshot(get("/employees", &token("p1", &[])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(hr.calls().is_empty());
}

// =============================================================================
// Employee Summary Tests
// =============================================================================

fn summary_request(token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/qapi/employee-summary")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_supervisor_queries_own_reports() {
    let hr = Arc::new(StubHrService {
        summaries: vec![summary("E1", "S1"), summary("E2", "S2")],
        ..Default::default()
    });

    let response = app(hr)
        .oneshot(summary_request(
            &token("S1", &[]),
            json!({"supervisorIds": ["S1"]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["employeeId"], "E1");
}

#[tokio::test]
async fn test_summary_query_without_ids_is_rejected() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr.clone())
        .oneshot(summary_request(&token("p1", &[VIEW_EMPLOYEE_SUMMARY]), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(hr.calls().is_empty());
}

#[tokio::test]
async fn test_summary_query_for_others_needs_permission() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr.clone())
        .oneshot(summary_request(
            &token("S1", &[]),
            json!({"employeeIds": ["E9"]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(hr.calls().is_empty());
}

// =============================================================================
// Self-Service Query Tests
// =============================================================================

#[tokio::test]
async fn test_leave_plans_default_to_own_plans() {
    let hr = Arc::new(StubHrService::with_records(vec![ResourceRecord::new(
        "lp1",
        json!({"person": {"id": "E1"}}),
    )]));

    let response = app(hr.clone())
        .oneshot(send(
            Method::POST,
            "/qapi/employee-leave-plans",
            &token("E1", &[]),
            Some(json!({"superviseeIds": []})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await[0]["id"], "lp1");
    assert_eq!(hr.calls(), vec![r#"leave-plans None ["E1"]"#.to_string()]);
}

#[tokio::test]
async fn test_leave_plans_criteria_rules() {
    let hr = Arc::new(StubHrService::default());

    let response = app(hr.clone())
        .oneshot(send(
            Method::POST,
            "/qapi/employee-leave-plans",
            &token("E1", &[]),
            Some(json!({})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app(hr.clone())
        .oneshot(send(
            Method::POST,
            "/qapi/employee-leave-plans",
            &token("E1", &[]),
            Some(json!({"supervisorId": "S9"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app(hr.clone())
        .oneshot(send(
            Method::POST,
            "/qapi/employee-leave-plans",
            &token("S1", &[]),
            Some(json!({"supervisorId": "S1", "superviseeIds": ["E1"]})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        hr.calls(),
        vec![r#"leave-plans Some("S1") ["E1"]"#.to_string()]
    );
}

#[tokio::test]
async fn test_employee_name_search() {
    let hr = Arc::new(StubHrService {
        summaries: vec![summary("E1", "S1"), summary("E22", "S1")],
        ..Default::default()
    });

    let response = app(hr.clone())
        .oneshot(send(
            Method::POST,
            "/qapi/employees",
            &token("p1", &[]),
            Some(json!({"queryKeyword": "employee e2"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["errors"][0]["message"],
        EMPLOYEE_QUERY_FORBIDDEN_MESSAGE
    );

    let response = app(hr.clone())
        .oneshot(send(
            Method::POST,
            "/qapi/employees",
            &token("p1", &[VIEW_EMPLOYEE_DATA]),
            Some(json!({"queryKeyword": "employee e2"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["x-media-type"],
        EMPLOYEE_NAME_SEARCH_MEDIA_TYPE
    );
    assert_eq!(
        body_json(response).await,
        json!([{"id": "E22", "name": "Employee E22"}])
    );
}

#[tokio::test]
async fn test_human_resources_limits_to_self_and_supervisees() {
    let hr = Arc::new(StubHrService {
        summaries: vec![summary("S1", "S0"), summary("E1", "S1"), summary("E2", "S2")],
        ..Default::default()
    });

    let request = |token: &str, ids: Value| {
        send(
            Method::POST,
            "/qapi/human-resources",
            token,
            Some(json!({ "ids": ids })),
        )
    };

    let response = app(hr.clone())
        .oneshot(request(&token("S1", &[]), json!(["S1"])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await[0]["preferredName"], "Employee S1");

    let response = app(hr.clone())
        .oneshot(request(&token("S1", &[]), json!(["E1"])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let approver = token("S1", &[APPROVE_REJECT_TIME_ENTRY]);
    let response = app(hr.clone())
        .oneshot(request(&approver, json!(["S1", "E1"])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = app(hr.clone())
        .oneshot(request(&approver, json!(["E2"])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Health Tests
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let hr = Arc::new(StubHrService::default());

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app(hr).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["hr_service"]["database"], "up");
}

#[tokio::test]
async fn test_health_reports_unreachable_service() {
    let hr = Arc::new(StubHrService {
        unavailable: true,
        ..Default::default()
    });

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app(hr).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "degraded");
}
