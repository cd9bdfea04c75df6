//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use common::{AppError, AppResult};
use domain::{ResourceDescriptor, WriteOp, BEARER_TOKEN_PREFIX};

use crate::state::AppState;
use crate::token::verify_token;

/// Current authenticated caller extracted from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub person_id: String,
    pub user_name: String,
    pub permissions: Vec<String>,
}

impl CurrentUser {
    pub fn has_permission(&self, code: &str) -> bool {
        self.permissions.iter().any(|p| p == code)
    }
}

/// Check the caller may read a resource. The resource's write permission
/// also grants read access.
pub fn require_permission(user: &CurrentUser, resource: &ResourceDescriptor) -> AppResult<()> {
    let codes = resource.read_permissions();
    if codes.is_empty() || codes.iter().any(|code| user.has_permission(code)) {
        return Ok(());
    }

    Err(AppError::forbidden(format!(
        "User '{}' does not have permission to view {}.",
        user.user_name, resource.name
    )))
}

/// Check the caller holds `code`, the permission a write needs.
pub fn require_write_permission(
    user: &CurrentUser,
    resource: &ResourceDescriptor,
    op: WriteOp,
    code: &str,
) -> AppResult<()> {
    if user.has_permission(code) {
        return Ok(());
    }

    Err(AppError::forbidden(format!(
        "User '{}' does not have permission to {} {}.",
        user.user_name, op, resource.name
    )))
}

/// Authentication middleware that validates JWT tokens.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Extract token from Authorization header
    let token = extract_token(&request)?;

    let claims = verify_token(&state.config.jwt, token)?;

    let current_user = CurrentUser {
        person_id: claims.sub,
        user_name: claims.name,
        permissions: claims.permissions,
    };

    // Insert current user into request extensions
    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header.
fn extract_token(request: &Request<Body>) -> AppResult<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)
}
