//! Migration: Create the data_privacy_settings table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DataPrivacySettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DataPrivacySettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DataPrivacySettings::Resource).string().not_null())
                    .col(ColumnDef::new(DataPrivacySettings::Property).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_data_privacy_resource_property")
                    .table(DataPrivacySettings::Table)
                    .col(DataPrivacySettings::Resource)
                    .col(DataPrivacySettings::Property)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DataPrivacySettings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DataPrivacySettings {
    Table,
    Id,
    Resource,
    Property,
}
