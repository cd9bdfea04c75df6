//! Generic integration resource handlers.
//!
//! One set of routes is mounted per catalogue entry. The entry itself rides
//! along as a request extension so the handlers and extractors know which
//! resource they are serving. Writes reach hr-service only for entries that
//! accept them; every other write is answered with 405 here.

use axum::{
    body::Bytes,
    extract::{Extension, Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};

use common::{AppError, AppResult};
use domain::write::{check_create_body, parse_body, reconcile_update_guid};
use domain::{require_guid, Paging, ResourceDescriptor, ResourceRecord, WriteOp, CATALOGUE};

use crate::clients::ResourceQuery;
use crate::extractors::{BypassCache, ListQuery, ResourceVersion};
use crate::middleware::{require_permission, require_write_permission, CurrentUser};
use crate::state::AppState;

pub const X_MEDIA_TYPE: HeaderName = HeaderName::from_static("x-media-type");
pub const X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");
pub const X_PAGE_OFFSET: HeaderName = HeaderName::from_static("x-hedtech-pageoffset");
pub const X_PAGE_MAX_SIZE: HeaderName = HeaderName::from_static("x-hedtech-pagemaxsize");
pub const X_CONTENT_RESTRICTED: HeaderName = HeaderName::from_static("x-content-restricted");

/// Create routes for every resource in the catalogue.
pub fn resource_routes() -> Router<AppState> {
    CATALOGUE
        .iter()
        .fold(Router::new(), |router, resource| router.merge(routes_for(resource)))
}

/// Routes of a single resource.
pub fn routes_for(resource: &'static ResourceDescriptor) -> Router<AppState> {
    let collection = resource.collection_path();

    Router::new()
        .route(&collection, get(list_resources).post(create_resource))
        .route(
            &format!("{}/", collection),
            get(missing_guid)
                .put(update_missing_guid)
                .delete(delete_missing_guid),
        )
        .route(
            &resource.item_path(),
            get(get_resource).put(update_resource).delete(delete_resource),
        )
        .route_layer(Extension(resource))
}

/// List a resource
#[utoipa::path(
    get,
    path = "/{resource}",
    tag = "Resources",
    security(("bearer_auth" = [])),
    params(
        ("resource" = String, Path, description = "Catalogue name, e.g. pay-cycles"),
        ("offset" = Option<u64>, Query, description = "Paged resources only"),
        ("limit" = Option<u64>, Query, description = "Paged resources only"),
        ("criteria" = Option<String>, Query, description = "JSON object filter")
    ),
    responses(
        (status = 200, description = "Resource DTOs", body = Vec<serde_json::Value>),
        (status = 400, description = "Invalid query or service failure"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing permission"),
        (status = 406, description = "Unsupported version")
    )
)]
pub async fn list_resources(
    State(state): State<AppState>,
    Extension(resource): Extension<&'static ResourceDescriptor>,
    Extension(user): Extension<CurrentUser>,
    BypassCache(bypass_cache): BypassCache,
    ResourceVersion(version): ResourceVersion,
    query: ListQuery,
) -> AppResult<Response> {
    require_permission(&user, resource)?;
    let paging = query.paging(resource)?;
    let criteria = query.criteria(resource)?;

    let mut page = state
        .hr
        .list_resources(ResourceQuery {
            resource: resource.name.to_string(),
            version,
            paging,
            criteria,
            bypass_cache,
        })
        .await?;

    let restricted =
        apply_data_privacy(&state, resource, &user, &mut page.items, bypass_cache).await?;

    let mut response = Json(page.items).into_response();
    let headers = response.headers_mut();
    set_media_type(headers, resource, version)?;
    if restricted {
        headers.insert(X_CONTENT_RESTRICTED, HeaderValue::from_static("partial"));
    }
    if let Some(paging) = paging {
        set_paging(headers, paging, page.total);
    }

    Ok(response)
}

/// Get a resource by GUID
#[utoipa::path(
    get,
    path = "/{resource}/{guid}",
    tag = "Resources",
    security(("bearer_auth" = [])),
    params(
        ("resource" = String, Path, description = "Catalogue name, e.g. pay-cycles"),
        ("guid" = String, Path, description = "Resource GUID")
    ),
    responses(
        (status = 200, description = "Resource DTO", body = serde_json::Value),
        (status = 400, description = "Missing GUID or service failure"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing permission"),
        (status = 404, description = "No record for GUID"),
        (status = 406, description = "Unsupported version")
    )
)]
pub async fn get_resource(
    State(state): State<AppState>,
    Extension(resource): Extension<&'static ResourceDescriptor>,
    Extension(user): Extension<CurrentUser>,
    BypassCache(bypass_cache): BypassCache,
    ResourceVersion(version): ResourceVersion,
    Path(guid): Path<String>,
) -> AppResult<Response> {
    let guid = require_guid(&guid)?;
    require_permission(&user, resource)?;

    let record = state
        .hr
        .get_resource(resource.name, version, &guid, bypass_cache)
        .await?;

    let mut items = [record];
    let restricted =
        apply_data_privacy(&state, resource, &user, &mut items, bypass_cache).await?;
    let [record] = items;

    record_response(record, resource, version, restricted)
}

/// `GET {route}/` with an empty GUID segment.
pub async fn missing_guid() -> AppResult<Response> {
    Err(AppError::null_guid())
}

/// `PUT {route}/` with an empty GUID segment.
pub async fn update_missing_guid(
    Extension(resource): Extension<&'static ResourceDescriptor>,
    ResourceVersion(version): ResourceVersion,
) -> AppResult<Response> {
    writable(resource, WriteOp::Update, version)?;
    Err(AppError::null_guid())
}

/// `DELETE {route}/` with an empty GUID segment.
pub async fn delete_missing_guid(
    Extension(resource): Extension<&'static ResourceDescriptor>,
    ResourceVersion(version): ResourceVersion,
) -> AppResult<Response> {
    writable(resource, WriteOp::Delete, version)?;
    Err(AppError::null_guid())
}

/// Create a resource
#[utoipa::path(
    post,
    path = "/{resource}",
    tag = "Resources",
    security(("bearer_auth" = [])),
    params(("resource" = String, Path, description = "Catalogue name")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Stored resource DTO", body = serde_json::Value),
        (status = 400, description = "Missing body, non-nil id or service failure"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing permission"),
        (status = 405, description = "Resource does not accept creates at this version")
    )
)]
pub async fn create_resource(
    State(state): State<AppState>,
    Extension(resource): Extension<&'static ResourceDescriptor>,
    Extension(user): Extension<CurrentUser>,
    ResourceVersion(version): ResourceVersion,
    body: Bytes,
) -> AppResult<Response> {
    let permission = writable(resource, WriteOp::Create, version)?;
    let body = parse_body(&body)?;
    check_create_body(&body)?;
    require_write_permission(&user, resource, WriteOp::Create, permission)?;

    let record = state.hr.create_resource(resource.name, version, body).await?;

    let properties = restricted_properties(&state, resource, &user, true).await?;
    let mut items = [record];
    let restricted = redact_all(&mut items, &properties);
    let [record] = items;

    record_response(record, resource, version, restricted)
}

/// Update a resource
///
/// The body may be partial; properties it omits keep their stored values.
#[utoipa::path(
    put,
    path = "/{resource}/{guid}",
    tag = "Resources",
    security(("bearer_auth" = [])),
    params(
        ("resource" = String, Path, description = "Catalogue name"),
        ("guid" = String, Path, description = "Resource GUID")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Updated resource DTO", body = serde_json::Value),
        (status = 400, description = "Missing body, GUID mismatch or service failure"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing permission or restricted property"),
        (status = 404, description = "No record for GUID"),
        (status = 405, description = "Resource does not accept updates at this version")
    )
)]
pub async fn update_resource(
    State(state): State<AppState>,
    Extension(resource): Extension<&'static ResourceDescriptor>,
    Extension(user): Extension<CurrentUser>,
    ResourceVersion(version): ResourceVersion,
    Path(guid): Path<String>,
    body: Bytes,
) -> AppResult<Response> {
    let permission = writable(resource, WriteOp::Update, version)?;
    if guid.trim().is_empty() {
        return Err(AppError::null_guid());
    }
    let mut body = parse_body(&body)?;
    let guid = reconcile_update_guid(&guid, &mut body)?;
    require_write_permission(&user, resource, WriteOp::Update, permission)?;

    let properties = restricted_properties(&state, resource, &user, true).await?;
    if let Some(property) = properties.iter().find(|p| *p != "id" && body.contains_key(*p)) {
        return Err(AppError::forbidden(format!(
            "Data privacy settings do not allow '{}' of {} to be updated.",
            property, resource.name
        )));
    }

    let record = state
        .hr
        .update_resource(resource.name, version, &guid, body)
        .await?;

    let mut items = [record];
    let restricted = redact_all(&mut items, &properties);
    let [record] = items;

    record_response(record, resource, version, restricted)
}

/// Delete a resource
#[utoipa::path(
    delete,
    path = "/{resource}/{guid}",
    tag = "Resources",
    security(("bearer_auth" = [])),
    params(
        ("resource" = String, Path, description = "Catalogue name"),
        ("guid" = String, Path, description = "Resource GUID")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Missing GUID or service failure"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing permission"),
        (status = 404, description = "No record for GUID"),
        (status = 405, description = "Resource does not accept deletes")
    )
)]
pub async fn delete_resource(
    State(state): State<AppState>,
    Extension(resource): Extension<&'static ResourceDescriptor>,
    Extension(user): Extension<CurrentUser>,
    ResourceVersion(version): ResourceVersion,
    Path(guid): Path<String>,
) -> AppResult<Response> {
    let permission = writable(resource, WriteOp::Delete, version)?;
    let guid = require_guid(&guid)?;
    require_write_permission(&user, resource, WriteOp::Delete, permission)?;

    state.hr.delete_resource(resource.name, version, &guid).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Permission a write needs, or `NotSupported` when the resource does not
/// accept `op` at `version`.
fn writable(resource: &ResourceDescriptor, op: WriteOp, version: u32) -> AppResult<&'static str> {
    resource.write_permission(op, version).ok_or_else(|| {
        tracing::debug!(resource = resource.name, operation = %op, version, "Write rejected");
        AppError::NotSupported
    })
}

/// Data privacy list of a resource for the calling user.
async fn restricted_properties(
    state: &AppState,
    resource: &ResourceDescriptor,
    user: &CurrentUser,
    bypass_cache: bool,
) -> AppResult<Vec<String>> {
    state
        .hr
        .data_privacy(resource.name, &user.person_id, &user.permissions, bypass_cache)
        .await
}

/// Strip restricted properties from every record. True if any record lost
/// a property.
fn redact_all(items: &mut [ResourceRecord], properties: &[String]) -> bool {
    if properties.is_empty() {
        return false;
    }

    let mut removed = false;
    for item in items.iter_mut() {
        removed |= item.redact(properties);
    }
    removed
}

/// Strip the caller's restricted properties from non-empty results. Returns
/// true when anything was removed.
async fn apply_data_privacy(
    state: &AppState,
    resource: &ResourceDescriptor,
    user: &CurrentUser,
    items: &mut [ResourceRecord],
    bypass_cache: bool,
) -> AppResult<bool> {
    if items.is_empty() {
        return Ok(false);
    }

    let properties = restricted_properties(state, resource, user, bypass_cache).await?;
    Ok(redact_all(items, &properties))
}

fn record_response(
    record: ResourceRecord,
    resource: &ResourceDescriptor,
    version: u32,
    restricted: bool,
) -> AppResult<Response> {
    let mut response = Json(record).into_response();
    let headers = response.headers_mut();
    set_media_type(headers, resource, version)?;
    if restricted {
        headers.insert(X_CONTENT_RESTRICTED, HeaderValue::from_static("partial"));
    }
    Ok(response)
}

fn set_media_type(
    headers: &mut HeaderMap,
    resource: &ResourceDescriptor,
    version: u32,
) -> AppResult<()> {
    let value = HeaderValue::from_str(&resource.media_type(version))
        .map_err(|e| AppError::internal(format!("Invalid media type header: {}", e)))?;
    headers.insert(X_MEDIA_TYPE, value);
    Ok(())
}

fn set_paging(headers: &mut HeaderMap, paging: Paging, total: u64) {
    headers.insert(X_TOTAL_COUNT, HeaderValue::from(total));
    headers.insert(X_PAGE_OFFSET, HeaderValue::from(paging.offset));
    headers.insert(X_PAGE_MAX_SIZE, HeaderValue::from(paging.limit));
}
