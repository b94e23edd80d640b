// src/models/rule.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rule_criticality", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Criticality {
    #[serde(rename = "Crítica")]
    Critica,
    #[serde(rename = "Alta")]
    Alta,
    #[serde(rename = "Média")]
    Media,
    #[serde(rename = "Baixa")]
    Baixa,
}

impl Criticality {
    pub fn label(self) -> &'static str {
        match self {
            Criticality::Critica => "Crítica",
            Criticality::Alta => "Alta",
            Criticality::Media => "Média",
            Criticality::Baixa => "Baixa",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "maintenance_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceKind {
    Preventiva,
    Corretiva,
}

// --- Regra (Recomendação) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRule {
    #[schema(example = "Motor")]
    pub category: String,
    #[schema(example = "Troca de óleo")]
    pub item: String,
    #[schema(example = "Substituir o óleo do motor conforme especificação do fabricante")]
    pub description: String,
    #[schema(example = 10000)]
    pub km_interval: Option<i32>,
    #[schema(example = 12)]
    pub month_interval: Option<i32>,
    pub kind: MaintenanceKind,
    pub criticality: Criticality,
    #[schema(example = "150.00")]
    pub cost_min: Option<Decimal>,
    #[schema(example = "300.00")]
    pub cost_max: Option<Decimal>,
}

// Linha do cache de revisões: uma regra da montadora presa a um veículo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRevision {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub rule: MaintenanceRule,
    pub created_at: DateTime<Utc>,
}
