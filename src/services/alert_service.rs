// src/services/alert_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MaintenanceStore, VehicleStore},
    models::{alert::Alert, rule::MaintenanceRule, vehicle::Vehicle},
    services::{
        due_status::{evaluate_vehicle, sort_alerts},
        rule_provider::RuleProvider,
        vehicle_service::find_owned_vehicle,
    },
};

#[derive(Clone)]
pub struct AlertService {
    vehicles: Arc<dyn VehicleStore>,
    maintenances: Arc<dyn MaintenanceStore>,
    rules: Arc<dyn RuleProvider>,
}

impl AlertService {
    pub fn new(
        vehicles: Arc<dyn VehicleStore>,
        maintenances: Arc<dyn MaintenanceStore>,
        rules: Arc<dyn RuleProvider>,
    ) -> Self {
        Self { vehicles, maintenances, rules }
    }

    pub async fn rules_for(&self, vehicle: &Vehicle) -> Result<Vec<MaintenanceRule>, AppError> {
        self.rules.rules_for_vehicle(vehicle).await
    }

    /// Alertas do veículo que o usuário está vendo. Falha da fonte de regras sobe.
    pub async fn alerts_for_vehicle(
        &self,
        user_id: Uuid,
        vehicle_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<Alert>, AppError> {
        let vehicle = find_owned_vehicle(self.vehicles.as_ref(), user_id, vehicle_id).await?;
        let rules = self.rules_for(&vehicle).await?;
        let history = self.maintenances.list_maintenances(vehicle.id).await?;

        Ok(evaluate_vehicle(&vehicle, &history, &rules, today))
    }

    /// Varredura de todos os veículos do usuário. Veículo cuja fonte de regras
    /// falhar fica de fora desta passada; os demais seguem.
    pub async fn alerts_for_user(&self, user_id: Uuid, today: NaiveDate) -> Result<Vec<Alert>, AppError> {
        let vehicles = self.vehicles.list_vehicles(user_id).await?;
        let mut alerts = Vec::new();

        for vehicle in vehicles {
            let rules = match self.rules_for(&vehicle).await {
                Ok(rules) => rules,
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Veículo {} ({}) ignorado nesta passada: {}",
                        vehicle.id,
                        vehicle.display_name(),
                        e
                    );
                    continue;
                }
            };

            let history = self.maintenances.list_maintenances(vehicle.id).await?;
            alerts.extend(evaluate_vehicle(&vehicle, &history, &rules, today));
        }

        sort_alerts(&mut alerts);
        Ok(alerts)
    }
}
