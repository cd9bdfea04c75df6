//! Data privacy setting entity: one restricted DTO property per row.

use sea_orm::entity::prelude::*;

use domain::PrivacyRule;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "data_privacy_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub resource: String,
    pub property: String,
    /// Callers holding this permission see the property
    pub exempt_permission: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PrivacyRule {
    fn from(model: Model) -> Self {
        PrivacyRule {
            property: model.property,
            exempt_permission: model.exempt_permission,
        }
    }
}
