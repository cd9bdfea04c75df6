//! Migration: Create the hr_resources table.
//!
//! One row per resource instance. The payload is the integration DTO as
//! produced by the coordination layer.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HrResources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(HrResources::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(HrResources::Resource).string().not_null())
                    .col(ColumnDef::new(HrResources::Payload).json_binary().not_null())
                    .col(
                        ColumnDef::new(HrResources::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(HrResources::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Lists always filter by resource name
        manager
            .create_index(
                Index::create()
                    .name("idx_hr_resources_resource")
                    .table(HrResources::Table)
                    .col(HrResources::Resource)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HrResources::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HrResources {
    Table,
    Id,
    Resource,
    Payload,
    CreatedAt,
    UpdatedAt,
}
