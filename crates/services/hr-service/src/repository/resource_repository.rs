//! Resource repository backed by PostgreSQL.
//!
//! Paged resources are filtered and paged in SQL; criteria compare a
//! top-level `payload` property with `jsonb` equality.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::entities::{data_privacy_setting, employee_summary, hr_resource};
use crate::infra::db;
use common::{AppError, AppResult};
use domain::{Criteria, EmployeeSummary, Paging, PrivacyRule, ResourcePage, ResourceRecord};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Resource repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// All records of a resource, oldest first
    async fn list_by_resource(&self, resource: &str) -> AppResult<Vec<ResourceRecord>>;

    /// One page of the records matching `criteria`, with the total match count
    async fn list_page(
        &self,
        resource: &str,
        criteria: &Criteria,
        paging: Paging,
    ) -> AppResult<ResourcePage>;

    /// Records whose `person.id` is one of `person_ids`
    async fn list_by_person(
        &self,
        resource: &str,
        person_ids: &[String],
    ) -> AppResult<Vec<ResourceRecord>>;

    /// Find one record of a resource by GUID
    async fn find_by_guid(&self, resource: &str, guid: &str) -> AppResult<Option<ResourceRecord>>;

    /// Store a new record under its GUID
    async fn insert(&self, resource: &str, record: ResourceRecord) -> AppResult<ResourceRecord>;

    /// Replace the payload of an existing record; `None` if it does not exist
    async fn update(
        &self,
        resource: &str,
        record: ResourceRecord,
    ) -> AppResult<Option<ResourceRecord>>;

    /// Remove a record; false if it did not exist
    async fn delete(&self, resource: &str, guid: &str) -> AppResult<bool>;

    /// Data privacy rules of a resource
    async fn privacy_rules(&self, resource: &str) -> AppResult<Vec<PrivacyRule>>;

    /// Every employee summary
    async fn list_employee_summaries(&self) -> AppResult<Vec<EmployeeSummary>>;

    /// Employee summaries whose name contains `keyword`, ignoring case
    async fn search_employee_summaries(&self, keyword: &str) -> AppResult<Vec<EmployeeSummary>>;

    /// Check connectivity
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of ResourceRepository
pub struct ResourceStore {
    db: DatabaseConnection,
}

impl ResourceStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn partition(resource: &str) -> Select<hr_resource::Entity> {
        hr_resource::Entity::find().filter(hr_resource::Column::Resource.eq(resource))
    }

    fn oldest_first(query: Select<hr_resource::Entity>) -> Select<hr_resource::Entity> {
        query
            .order_by_asc(hr_resource::Column::CreatedAt)
            .order_by_asc(hr_resource::Column::Id)
    }
}

/// `payload -> key = value` for every criterion.
fn criteria_condition(criteria: &Criteria) -> Condition {
    criteria
        .as_map()
        .iter()
        .fold(Condition::all(), |condition, (key, value)| {
            condition.add(Expr::cust_with_values(
                "payload -> ? = ?",
                [
                    sea_orm::Value::from(key.as_str()),
                    sea_orm::Value::from(value.clone()),
                ],
            ))
        })
}

/// Escape LIKE metacharacters so the keyword matches literally.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ResourceRepository for ResourceStore {
    async fn list_by_resource(&self, resource: &str) -> AppResult<Vec<ResourceRecord>> {
        let models = Self::oldest_first(Self::partition(resource))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(ResourceRecord::from).collect())
    }

    async fn list_page(
        &self,
        resource: &str,
        criteria: &Criteria,
        paging: Paging,
    ) -> AppResult<ResourcePage> {
        let query = Self::partition(resource).filter(criteria_condition(criteria));

        let total = query.clone().count(&self.db).await?;
        let models = Self::oldest_first(query)
            .offset(paging.offset)
            .limit(paging.limit)
            .all(&self.db)
            .await?;

        Ok(ResourcePage::new(
            models.into_iter().map(ResourceRecord::from).collect(),
            total,
        ))
    }

    async fn list_by_person(
        &self,
        resource: &str,
        person_ids: &[String],
    ) -> AppResult<Vec<ResourceRecord>> {
        if person_ids.is_empty() {
            return Ok(Vec::new());
        }

        let people = person_ids.iter().fold(Condition::any(), |condition, id| {
            condition.add(Expr::cust_with_values(
                "payload -> 'person' ->> 'id' = ?",
                [id.clone()],
            ))
        });

        let models = Self::oldest_first(Self::partition(resource).filter(people))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(ResourceRecord::from).collect())
    }

    async fn find_by_guid(&self, resource: &str, guid: &str) -> AppResult<Option<ResourceRecord>> {
        // A key that is not a UUID cannot exist in the table
        let Ok(id) = Uuid::parse_str(guid) else {
            return Ok(None);
        };

        let result = hr_resource::Entity::find_by_id(id)
            .filter(hr_resource::Column::Resource.eq(resource))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(ResourceRecord::from))
    }

    async fn insert(&self, resource: &str, record: ResourceRecord) -> AppResult<ResourceRecord> {
        let id = Uuid::parse_str(&record.id)
            .map_err(|e| AppError::invalid_argument(format!("Invalid GUID: {}", e)))?;
        let now = Utc::now();

        let model = hr_resource::ActiveModel {
            id: Set(id),
            resource: Set(resource.to_string()),
            payload: Set(record.to_json()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(ResourceRecord::from(model))
    }

    async fn update(
        &self,
        resource: &str,
        record: ResourceRecord,
    ) -> AppResult<Option<ResourceRecord>> {
        let Ok(id) = Uuid::parse_str(&record.id) else {
            return Ok(None);
        };

        let Some(existing) = hr_resource::Entity::find_by_id(id)
            .filter(hr_resource::Column::Resource.eq(resource))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: hr_resource::ActiveModel = existing.into();
        active.payload = Set(record.to_json());
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;

        Ok(Some(ResourceRecord::from(model)))
    }

    async fn delete(&self, resource: &str, guid: &str) -> AppResult<bool> {
        let Ok(id) = Uuid::parse_str(guid) else {
            return Ok(false);
        };

        let result = hr_resource::Entity::delete_many()
            .filter(hr_resource::Column::Id.eq(id))
            .filter(hr_resource::Column::Resource.eq(resource))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn privacy_rules(&self, resource: &str) -> AppResult<Vec<PrivacyRule>> {
        let models = data_privacy_setting::Entity::find()
            .filter(data_privacy_setting::Column::Resource.eq(resource))
            .order_by_asc(data_privacy_setting::Column::Property)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(PrivacyRule::from).collect())
    }

    async fn list_employee_summaries(&self) -> AppResult<Vec<EmployeeSummary>> {
        let models = employee_summary::Entity::find()
            .order_by_asc(employee_summary::Column::EmployeeId)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(EmployeeSummary::from).collect())
    }

    async fn search_employee_summaries(&self, keyword: &str) -> AppResult<Vec<EmployeeSummary>> {
        let models = employee_summary::Entity::find()
            .filter(Expr::cust_with_values(
                "name ILIKE ?",
                [like_pattern(keyword)],
            ))
            .order_by_asc(employee_summary::Column::Name)
            .order_by_asc(employee_summary::Column::EmployeeId)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(EmployeeSummary::from).collect())
    }

    async fn ping(&self) -> AppResult<()> {
        db::ping(&self.db).await.map_err(AppError::from)
    }
}
