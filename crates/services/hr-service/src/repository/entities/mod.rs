//! SeaORM entities.

pub mod data_privacy_setting;
pub mod employee_summary;
pub mod hr_resource;
