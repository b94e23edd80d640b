// src/services/badge_service.rs

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BadgeStore, MaintenanceStore, VehicleStore},
    models::badge::QualityBadge,
    services::{
        quality_badge::compute_badge, rule_provider::RuleProvider,
        vehicle_service::find_owned_vehicle,
    },
};

#[derive(Clone)]
pub struct BadgeService {
    vehicles: Arc<dyn VehicleStore>,
    maintenances: Arc<dyn MaintenanceStore>,
    rules: Arc<dyn RuleProvider>,
    badges: Arc<dyn BadgeStore>,
}

impl BadgeService {
    pub fn new(
        vehicles: Arc<dyn VehicleStore>,
        maintenances: Arc<dyn MaintenanceStore>,
        rules: Arc<dyn RuleProvider>,
        badges: Arc<dyn BadgeStore>,
    ) -> Self {
        Self { vehicles, maintenances, rules, badges }
    }

    /// Recalcula e grava o selo do veículo, sobrescrevendo o anterior.
    pub async fn recompute_badge(
        &self,
        user_id: Uuid,
        vehicle_id: Uuid,
        today: NaiveDate,
    ) -> Result<QualityBadge, AppError> {
        let vehicle = find_owned_vehicle(self.vehicles.as_ref(), user_id, vehicle_id).await?;
        let rules = self.rules.rules_for_vehicle(&vehicle).await?;
        let history = self.maintenances.list_maintenances(vehicle.id).await?;

        let badge = compute_badge(&vehicle, &history, &rules, today, Utc::now());
        let saved = self.badges.upsert(&badge).await?;

        tracing::info!(
            "🏅 Selo do veículo {}: {:?} ({:.1}% / {:.1}% / {:.1}%)",
            vehicle.id, saved.tier, saved.pct_critical, saved.pct_high, saved.pct_all
        );
        Ok(saved)
    }

    pub async fn get_badge(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<Option<QualityBadge>, AppError> {
        find_owned_vehicle(self.vehicles.as_ref(), user_id, vehicle_id).await?;
        self.badges.get(vehicle_id).await
    }
}
