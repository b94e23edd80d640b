// src/db/vehicle_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::stores::VehicleStore,
    models::vehicle::{NewVehicle, UpdateVehiclePayload, Vehicle},
};

#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStore for VehicleRepository {
    async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list_vehicles(&self, user_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE user_id = $1 ORDER BY created_at ASC",
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    async fn insert_vehicle(&self, user_id: Uuid, vehicle: &NewVehicle) -> Result<Vehicle, AppError> {
        let created = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (user_id, brand, model, year, plate, initial_km, current_km)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(user_id)
            .bind(&vehicle.brand)
            .bind(&vehicle.model)
            .bind(vehicle.year)
            .bind(&vehicle.plate)
            .bind(vehicle.initial_km)
            .bind(vehicle.current_km)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update_vehicle(&self, id: Uuid, patch: &UpdateVehiclePayload) -> Result<Vehicle, AppError> {
        // COALESCE mantém o valor atual quando o campo não veio no patch
        let updated = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET brand = COALESCE($2, brand),
                model = COALESCE($3, model),
                year = COALESCE($4, year),
                plate = COALESCE($5, plate),
                current_km = COALESCE($6, current_km),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(patch.brand.as_deref())
            .bind(patch.model.as_deref())
            .bind(patch.year)
            .bind(patch.plate.as_deref())
            .bind(patch.current_km)
            .fetch_optional(&self.pool)
            .await?;

        updated.ok_or(AppError::VehicleNotFound)
    }

    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, AppError> {
        // Manutenções, selo e cache de revisões caem junto (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
