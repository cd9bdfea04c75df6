//! Middleware for authentication.

mod auth;

pub use auth::{auth_middleware, require_permission, require_write_permission, CurrentUser};
