//! Migration: Let a data privacy setting name a permission that lifts it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(DataPrivacySettings::Table)
                    .add_column(ColumnDef::new(DataPrivacySettings::ExemptPermission).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(DataPrivacySettings::Table)
                    .drop_column(DataPrivacySettings::ExemptPermission)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum DataPrivacySettings {
    Table,
    ExemptPermission,
}
