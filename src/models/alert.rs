// src/models/alert.rs

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::rule::MaintenanceRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AlertStatus {
    Overdue,
    DueSoon,
    Ok,
}

// Derivado, nunca persistido: recalculado a cada consulta
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub vehicle_id: Uuid,
    #[schema(example = "Volkswagen Gol 2019")]
    pub vehicle_name: String,
    pub rule: MaintenanceRule,
    pub status: AlertStatus,
    #[schema(example = "Troca de óleo: atrasada em 1000 km")]
    pub message: String,
    pub remaining_km: Option<i32>,
    pub remaining_days: Option<i64>,
    #[schema(value_type = Option<String>, format = Date)]
    pub last_maintenance_date: Option<NaiveDate>,
    pub last_maintenance_km: Option<i32>,
}
