//! Employee summary entity.

use sea_orm::entity::prelude::*;

use domain::{EmployeeStatus, EmployeeSummary};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employee_summaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_id: String,
    pub name: String,
    pub primary_position_id: Option<String>,
    /// JSON array of supervisor ids
    #[sea_orm(column_type = "JsonBinary")]
    pub supervisor_ids: Json,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for EmployeeSummary {
    fn from(model: Model) -> Self {
        let supervisor_ids = model
            .supervisor_ids
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| id.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        EmployeeSummary {
            employee_id: model.employee_id,
            name: model.name,
            primary_position_id: model.primary_position_id,
            supervisor_ids,
            status: EmployeeStatus::from(model.status.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn supervisor_ids_are_read_from_json_array() {
        let model = Model {
            employee_id: "E1".to_string(),
            name: "Ada".to_string(),
            primary_position_id: Some("POS1".to_string()),
            supervisor_ids: json!(["S1", "S2", 7]),
            status: "leave".to_string(),
        };

        let summary = EmployeeSummary::from(model);
        assert_eq!(summary.supervisor_ids, vec!["S1", "S2"]);
        assert_eq!(summary.status, EmployeeStatus::Leave);
    }
}
