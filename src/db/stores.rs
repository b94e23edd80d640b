// src/db/stores.rs
//
// Contratos de persistência usados pelos serviços. As implementações Postgres
// ficam nos *_repo.rs; os testes injetam versões em memória.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        badge::QualityBadge,
        dashboard::{FleetTotals, MonthlyCostEntry, TopServiceEntry},
        maintenance::{CreateMaintenancePayload, MaintenanceRecord, UpdateMaintenancePayload},
        rule::{MaintenanceRule, VehicleRevision},
        vehicle::{NewVehicle, UpdateVehiclePayload, Vehicle},
    },
};

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError>;
    async fn list_vehicles(&self, user_id: Uuid) -> Result<Vec<Vehicle>, AppError>;
    async fn insert_vehicle(&self, user_id: Uuid, vehicle: &NewVehicle) -> Result<Vehicle, AppError>;
    // Campos ausentes no patch permanecem como estão
    async fn update_vehicle(&self, id: Uuid, patch: &UpdateVehiclePayload) -> Result<Vehicle, AppError>;
    async fn delete_vehicle(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait MaintenanceStore: Send + Sync {
    /// Histórico do veículo, do mais recente para o mais antigo.
    async fn list_maintenances(&self, vehicle_id: Uuid) -> Result<Vec<MaintenanceRecord>, AppError>;
    async fn get_maintenance(&self, id: Uuid) -> Result<Option<MaintenanceRecord>, AppError>;
    async fn insert_maintenance(
        &self,
        vehicle_id: Uuid,
        payload: &CreateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError>;
    async fn update_maintenance(
        &self,
        id: Uuid,
        patch: &UpdateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError>;
    async fn delete_maintenance(&self, id: Uuid) -> Result<bool, AppError>;
    /// Maior km registrado em manutenções do veículo.
    async fn latest_km(&self, vehicle_id: Uuid) -> Result<Option<i32>, AppError>;
}

#[async_trait]
pub trait BadgeStore: Send + Sync {
    async fn get(&self, vehicle_id: Uuid) -> Result<Option<QualityBadge>, AppError>;
    async fn upsert(&self, badge: &QualityBadge) -> Result<QualityBadge, AppError>;
}

#[async_trait]
pub trait RevisionCacheStore: Send + Sync {
    async fn list_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<VehicleRevision>, AppError>;
    async fn bulk_insert(&self, vehicle_id: Uuid, rules: &[MaintenanceRule]) -> Result<u64, AppError>;
    async fn fetched_flag(&self, vehicle_id: Uuid) -> Result<bool, AppError>;
    async fn set_fetched_flag(&self, vehicle_id: Uuid, value: bool) -> Result<(), AppError>;
    async fn delete_by_vehicle(&self, vehicle_id: Uuid) -> Result<u64, AppError>;
}

#[async_trait]
pub trait DashboardStore: Send + Sync {
    async fn fleet_totals(&self, user_id: Uuid, since: NaiveDate) -> Result<FleetTotals, AppError>;
    async fn monthly_costs(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<MonthlyCostEntry>, AppError>;
    async fn top_services(&self, user_id: Uuid, limit: i64) -> Result<Vec<TopServiceEntry>, AppError>;
}
