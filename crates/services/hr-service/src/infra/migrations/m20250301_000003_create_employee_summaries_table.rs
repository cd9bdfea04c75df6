//! Migration: Create the employee_summaries table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmployeeSummaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeSummaries::EmployeeId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmployeeSummaries::Name).string().not_null())
                    .col(ColumnDef::new(EmployeeSummaries::PrimaryPositionId).string().null())
                    .col(
                        ColumnDef::new(EmployeeSummaries::SupervisorIds)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeSummaries::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeeSummaries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EmployeeSummaries {
    Table,
    EmployeeId,
    Name,
    PrimaryPositionId,
    SupervisorIds,
    Status,
}
