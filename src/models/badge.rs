// src/models/badge.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "badge_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    // A ordem das variantes importa: Nenhum < Bronze < Prata < Ouro
    Nenhum,
    Bronze,
    Prata,
    Ouro,
}

/// Selo de qualidade de um veículo. Um por veículo, sobrescrito a cada recálculo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QualityBadge {
    pub vehicle_id: Uuid,
    pub tier: BadgeTier,
    // Percentual de regras em dia (0..=100) por partição
    #[schema(example = 96.0)]
    pub pct_critical: f64,
    #[schema(example = 85.0)]
    pub pct_high: f64,
    #[schema(example = 80.0)]
    pub pct_all: f64,
    pub overdue_critical: i32,
    pub overdue_high: i32,
    pub overdue_medium: i32,
    pub overdue_low: i32,
    pub computed_at: DateTime<Utc>,
}
