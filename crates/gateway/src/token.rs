//! Bearer token issue and verification.
//!
//! Tokens are HS256 JWTs signed with the shared `JWT_SECRET`. The claims
//! carry the caller's person id and the permission codes granted to them.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use common::{AppError, AppResult, JwtConfig};
use domain::MIN_JWT_SECRET_LENGTH;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Person id of the caller
    pub sub: String,
    /// Login name
    pub name: String,
    /// Permission codes, e.g. `VIEW.EMPLOYEE.DATA`
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Sign a token for the given caller.
pub fn issue_token(
    config: &JwtConfig,
    person_id: &str,
    user_name: &str,
    permissions: Vec<String>,
) -> AppResult<String> {
    if !config.has_strong_secret() {
        return Err(AppError::internal(format!(
            "JWT secret must be at least {} characters",
            MIN_JWT_SECRET_LENGTH
        )));
    }

    let now = Utc::now();
    let claims = Claims {
        sub: person_id.to_string(),
        name: user_name.to_string(),
        permissions,
        exp: (now + Duration::hours(config.expiration_hours)).timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?)
}

/// Verify a token and return its claims. An expired token means the
/// caller's session is over.
pub fn verify_token(config: &JwtConfig, token: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::SessionExpired,
        _ => AppError::from(e),
    })
}
