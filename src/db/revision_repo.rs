// src/db/revision_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::stores::RevisionCacheStore,
    models::rule::{MaintenanceRule, VehicleRevision},
};

#[derive(Clone)]
pub struct RevisionRepository {
    pool: PgPool,
}

impl RevisionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevisionCacheStore for RevisionRepository {
    async fn list_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<VehicleRevision>, AppError> {
        let rows = sqlx::query_as::<_, VehicleRevision>(
            "SELECT * FROM vehicle_revisions WHERE vehicle_id = $1 ORDER BY created_at ASC, item ASC",
        )
            .bind(vehicle_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn bulk_insert(&self, vehicle_id: Uuid, rules: &[MaintenanceRule]) -> Result<u64, AppError> {
        if rules.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO vehicle_revisions (vehicle_id, category, item, description, km_interval, \
             month_interval, kind, criticality, cost_min, cost_max) ",
        );

        builder.push_values(rules, |mut row, rule| {
            row.push_bind(vehicle_id)
                .push_bind(&rule.category)
                .push_bind(&rule.item)
                .push_bind(&rule.description)
                .push_bind(rule.km_interval)
                .push_bind(rule.month_interval)
                .push_bind(rule.kind)
                .push_bind(rule.criticality)
                .push_bind(rule.cost_min)
                .push_bind(rule.cost_max);
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn fetched_flag(&self, vehicle_id: Uuid) -> Result<bool, AppError> {
        let flag: Option<bool> = sqlx::query_scalar("SELECT revisions_fetched FROM vehicles WHERE id = $1")
            .bind(vehicle_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(flag.unwrap_or(false))
    }

    async fn set_fetched_flag(&self, vehicle_id: Uuid, value: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE vehicles SET revisions_fetched = $1 WHERE id = $2")
            .bind(value)
            .bind(vehicle_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_by_vehicle(&self, vehicle_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM vehicle_revisions WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
