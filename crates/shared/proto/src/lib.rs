//! gRPC protocol buffer definitions.
//!
//! This crate contains the generated gRPC service definitions for:
//! - HumanResourcesService: HR resource reads and writes, per-caller data
//!   privacy lists, self-service employee queries and health pings

/// HR coordination service definitions.
pub mod hr {
    tonic::include_proto!("hr");
}

// Re-export commonly used items
pub use hr::human_resources_service_client::HumanResourcesServiceClient;
pub use hr::human_resources_service_server::{HumanResourcesService, HumanResourcesServiceServer};
