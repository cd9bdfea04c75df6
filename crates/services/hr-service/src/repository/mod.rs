//! Repository layer for data access.

pub mod entities;
mod resource_repository;

pub use resource_repository::{ResourceRepository, ResourceStore};

#[cfg(any(test, feature = "test-utils"))]
pub use resource_repository::MockResourceRepository;
