// src/services/maintenance_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{MaintenanceStore, VehicleStore},
    models::{
        maintenance::{CreateMaintenancePayload, MaintenanceRecord, UpdateMaintenancePayload},
        vehicle::{UpdateVehiclePayload, Vehicle},
    },
    services::vehicle_service::find_owned_vehicle,
};

#[derive(Clone)]
pub struct MaintenanceService {
    vehicles: Arc<dyn VehicleStore>,
    maintenances: Arc<dyn MaintenanceStore>,
}

impl MaintenanceService {
    pub fn new(vehicles: Arc<dyn VehicleStore>, maintenances: Arc<dyn MaintenanceStore>) -> Self {
        Self { vehicles, maintenances }
    }

    pub async fn create_maintenance(
        &self,
        user_id: Uuid,
        vehicle_id: Uuid,
        payload: CreateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError> {
        payload.validate()?;
        check_cost(payload.cost)?;

        let vehicle = find_owned_vehicle(self.vehicles.as_ref(), user_id, vehicle_id).await?;
        check_km(&vehicle, payload.km)?;

        let record = self.maintenances.insert_maintenance(vehicle_id, &payload).await?;
        self.bump_odometer(&vehicle, record.km).await?;

        Ok(record)
    }

    pub async fn list_maintenances(
        &self,
        user_id: Uuid,
        vehicle_id: Uuid,
    ) -> Result<Vec<MaintenanceRecord>, AppError> {
        find_owned_vehicle(self.vehicles.as_ref(), user_id, vehicle_id).await?;
        self.maintenances.list_maintenances(vehicle_id).await
    }

    pub async fn update_maintenance(
        &self,
        user_id: Uuid,
        vehicle_id: Uuid,
        maintenance_id: Uuid,
        patch: UpdateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError> {
        patch.validate()?;
        if let Some(cost) = patch.cost {
            check_cost(cost)?;
        }

        let vehicle = find_owned_vehicle(self.vehicles.as_ref(), user_id, vehicle_id).await?;
        self.owned_record(vehicle_id, maintenance_id).await?;

        if let Some(km) = patch.km {
            check_km(&vehicle, km)?;
        }

        let record = self.maintenances.update_maintenance(maintenance_id, &patch).await?;
        self.bump_odometer(&vehicle, record.km).await?;

        Ok(record)
    }

    pub async fn delete_maintenance(
        &self,
        user_id: Uuid,
        vehicle_id: Uuid,
        maintenance_id: Uuid,
    ) -> Result<(), AppError> {
        find_owned_vehicle(self.vehicles.as_ref(), user_id, vehicle_id).await?;
        self.owned_record(vehicle_id, maintenance_id).await?;

        if !self.maintenances.delete_maintenance(maintenance_id).await? {
            return Err(AppError::MaintenanceNotFound);
        }
        Ok(())
    }

    async fn owned_record(&self, vehicle_id: Uuid, maintenance_id: Uuid) -> Result<MaintenanceRecord, AppError> {
        self.maintenances
            .get_maintenance(maintenance_id)
            .await?
            .filter(|record| record.vehicle_id == vehicle_id)
            .ok_or(AppError::MaintenanceNotFound)
    }

    // Uma manutenção com km acima do hodômetro atual é a leitura mais nova
    async fn bump_odometer(&self, vehicle: &Vehicle, km: i32) -> Result<(), AppError> {
        if km > vehicle.current_km {
            let patch = UpdateVehiclePayload { current_km: Some(km), ..Default::default() };
            self.vehicles.update_vehicle(vehicle.id, &patch).await?;
            tracing::debug!("Hodômetro de {} atualizado para {} km", vehicle.id, km);
        }
        Ok(())
    }
}

fn check_km(vehicle: &Vehicle, km: i32) -> Result<(), AppError> {
    if km < vehicle.initial_km {
        return Err(AppError::InvalidOdometer { km, minimum: vehicle.initial_km });
    }
    Ok(())
}

fn check_cost(cost: Decimal) -> Result<(), AppError> {
    if cost.is_sign_negative() && !cost.is_zero() {
        let mut errors = validator::ValidationErrors::new();
        let mut error = validator::ValidationError::new("range");
        error.message = Some("O custo não pode ser negativo.".into());
        errors.add("cost", error);
        return Err(AppError::ValidationError(errors));
    }
    Ok(())
}
