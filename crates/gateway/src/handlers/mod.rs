//! HTTP handlers.

pub mod employee_summary_handler;
pub mod health_handler;
pub mod resource_handler;
pub mod self_service_handler;

pub use employee_summary_handler::employee_summary_routes;
pub use health_handler::health_routes;
pub use resource_handler::resource_routes;
pub use self_service_handler::self_service_routes;
