//! Database migrations.
//!
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_hr_resources_table;
mod m20250301_000002_create_data_privacy_settings_table;
mod m20250301_000003_create_employee_summaries_table;
mod m20250301_000004_add_privacy_exempt_permission;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_hr_resources_table::Migration),
            Box::new(m20250301_000002_create_data_privacy_settings_table::Migration),
            Box::new(m20250301_000003_create_employee_summaries_table::Migration),
            Box::new(m20250301_000004_add_privacy_exempt_permission::Migration),
        ]
    }
}
