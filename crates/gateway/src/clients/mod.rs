//! gRPC clients for calling microservices.

mod hr_client;

pub use hr_client::{HrClient, HrResourceService, HrServiceHealth, ResourceQuery};

#[cfg(test)]
pub use hr_client::MockHrResourceService;
