//! Service layer - coordination logic.

mod resource_manager;

pub use resource_manager::{HealthReport, ListRequest, ResourceManager, ResourceService};

#[cfg(any(test, feature = "test-utils"))]
pub use resource_manager::MockResourceService;
