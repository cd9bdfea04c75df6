//! HR resource database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::ResourceRecord;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hr_resources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Catalogue name, e.g. `pay-cycles`
    pub resource: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain record
impl From<Model> for ResourceRecord {
    fn from(model: Model) -> Self {
        ResourceRecord::new(model.id.to_string(), model.payload)
    }
}
