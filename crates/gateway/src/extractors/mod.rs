//! Request extractors shared by the resource handlers.

mod bypass_cache;
mod list_query;
mod resource_version;
mod validated_json;

pub use bypass_cache::BypassCache;
pub use list_query::ListQuery;
pub use resource_version::{negotiate_version, ResourceVersion};
pub use validated_json::ValidatedJson;
