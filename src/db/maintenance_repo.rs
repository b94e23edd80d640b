// src/db/maintenance_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::stores::MaintenanceStore,
    models::maintenance::{CreateMaintenancePayload, MaintenanceRecord, UpdateMaintenancePayload},
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceStore for MaintenanceRepository {
    async fn list_maintenances(&self, vehicle_id: Uuid) -> Result<Vec<MaintenanceRecord>, AppError> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            SELECT * FROM maintenances
            WHERE vehicle_id = $1
            ORDER BY performed_on DESC, created_at DESC
            "#,
        )
            .bind(vehicle_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn get_maintenance(&self, id: Uuid) -> Result<Option<MaintenanceRecord>, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>("SELECT * FROM maintenances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn insert_maintenance(
        &self,
        vehicle_id: Uuid,
        payload: &CreateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenances (vehicle_id, performed_on, service_type, km, cost, notes, attachment_ref)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(vehicle_id)
            .bind(payload.performed_on)
            .bind(&payload.service_type)
            .bind(payload.km)
            .bind(payload.cost)
            .bind(payload.notes.as_deref())
            .bind(payload.attachment_ref.as_deref())
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    async fn update_maintenance(
        &self,
        id: Uuid,
        patch: &UpdateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            UPDATE maintenances
            SET performed_on = COALESCE($2, performed_on),
                service_type = COALESCE($3, service_type),
                km = COALESCE($4, km),
                cost = COALESCE($5, cost),
                notes = CASE WHEN $8 THEN $6 ELSE notes END,
                attachment_ref = CASE WHEN $9 THEN $7 ELSE attachment_ref END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(patch.performed_on)
            .bind(patch.service_type.as_deref())
            .bind(patch.km)
            .bind(patch.cost)
            .bind(patch.notes.clone().flatten())
            .bind(patch.attachment_ref.clone().flatten())
            .bind(patch.notes.is_some())
            .bind(patch.attachment_ref.is_some())
            .fetch_optional(&self.pool)
            .await?;

        record.ok_or(AppError::MaintenanceNotFound)
    }

    async fn delete_maintenance(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM maintenances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn latest_km(&self, vehicle_id: Uuid) -> Result<Option<i32>, AppError> {
        let km: Option<i32> = sqlx::query_scalar("SELECT MAX(km) FROM maintenances WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(km)
    }
}
