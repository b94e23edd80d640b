// src/services/vehicle_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{MaintenanceStore, VehicleStore},
    models::vehicle::{normalize_plate, CreateVehiclePayload, NewVehicle, UpdateVehiclePayload, Vehicle},
    services::revision_cache::RevisionCacheService,
};

/// Busca o veículo garantindo que pertence ao usuário. Veículo de outro dono
/// responde como inexistente.
pub(crate) async fn find_owned_vehicle(
    store: &dyn VehicleStore,
    user_id: Uuid,
    vehicle_id: Uuid,
) -> Result<Vehicle, AppError> {
    store
        .get_vehicle(vehicle_id)
        .await?
        .filter(|vehicle| vehicle.user_id == user_id)
        .ok_or(AppError::VehicleNotFound)
}

#[derive(Clone)]
pub struct VehicleService {
    vehicles: Arc<dyn VehicleStore>,
    maintenances: Arc<dyn MaintenanceStore>,
    // Presente só quando a fonte de regras é o plano da montadora
    revision_cache: Option<RevisionCacheService>,
}

impl VehicleService {
    pub fn new(
        vehicles: Arc<dyn VehicleStore>,
        maintenances: Arc<dyn MaintenanceStore>,
        revision_cache: Option<RevisionCacheService>,
    ) -> Self {
        Self { vehicles, maintenances, revision_cache }
    }

    pub async fn create_vehicle(
        &self,
        user_id: Uuid,
        payload: CreateVehiclePayload,
    ) -> Result<Vehicle, AppError> {
        payload.validate()?;

        let current_km = payload.current_km.unwrap_or(payload.initial_km);
        if current_km < payload.initial_km {
            return Err(AppError::InvalidOdometer { km: current_km, minimum: payload.initial_km });
        }

        let new_vehicle = NewVehicle {
            brand: payload.brand.trim().to_string(),
            model: payload.model.trim().to_string(),
            year: payload.year,
            plate: normalize_plate(&payload.plate),
            initial_km: payload.initial_km,
            current_km,
        };

        let vehicle = self.vehicles.insert_vehicle(user_id, &new_vehicle).await?;
        tracing::info!("🚗 Veículo {} ({}) cadastrado", vehicle.id, vehicle.display_name());

        // Enriquecimento em segundo plano: nunca bloqueia nem derruba o cadastro
        if let Some(cache) = self.revision_cache.clone() {
            let (id, brand, model, year) =
                (vehicle.id, vehicle.brand.clone(), vehicle.model.clone(), vehicle.year);
            tokio::spawn(async move {
                if let Err(e) = cache.get_vehicle_revisions(id, &brand, &model, year).await {
                    tracing::warn!("⚠️ Não foi possível popular o cache de revisões de {}: {}", id, e);
                }
            });
        }

        Ok(vehicle)
    }

    pub async fn list_vehicles(&self, user_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        self.vehicles.list_vehicles(user_id).await
    }

    pub async fn get_vehicle(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<Vehicle, AppError> {
        find_owned_vehicle(self.vehicles.as_ref(), user_id, vehicle_id).await
    }

    pub async fn update_vehicle(
        &self,
        user_id: Uuid,
        vehicle_id: Uuid,
        mut patch: UpdateVehiclePayload,
    ) -> Result<Vehicle, AppError> {
        patch.validate()?;
        let vehicle = find_owned_vehicle(self.vehicles.as_ref(), user_id, vehicle_id).await?;

        // O hodômetro não pode ficar abaixo do km inicial nem da última manutenção
        if let Some(km) = patch.current_km {
            let last_service_km = self.maintenances.latest_km(vehicle_id).await?;
            let minimum = last_service_km.map_or(vehicle.initial_km, |last| last.max(vehicle.initial_km));
            if km < minimum {
                return Err(AppError::InvalidOdometer { km, minimum });
            }
        }

        patch.plate = patch.plate.as_deref().map(normalize_plate);
        patch.brand = patch.brand.map(|b| b.trim().to_string());
        patch.model = patch.model.map(|m| m.trim().to_string());

        self.vehicles.update_vehicle(vehicle_id, &patch).await
    }

    pub async fn delete_vehicle(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<(), AppError> {
        find_owned_vehicle(self.vehicles.as_ref(), user_id, vehicle_id).await?;

        if !self.vehicles.delete_vehicle(vehicle_id).await? {
            return Err(AppError::VehicleNotFound);
        }
        tracing::info!("🗑️ Veículo {} removido", vehicle_id);
        Ok(())
    }
}
