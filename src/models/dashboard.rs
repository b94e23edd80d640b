// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// 1. Resumo da frota (os cards do topo)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub vehicle_count: i64,
    pub maintenance_count: i64,
    pub total_spent: Decimal,          // Soma de todas as manutenções
    pub spent_last_30_days: Decimal,
    pub overdue_alerts: i64,
    pub due_soon_alerts: i64,
}

// Totais crus vindos do banco (sem os alertas, que são derivados)
#[derive(Debug, Clone, FromRow)]
pub struct FleetTotals {
    pub vehicle_count: i64,
    pub maintenance_count: i64,
    pub total_spent: Decimal,
    pub spent_last_30_days: Decimal,
}

// 2. Gastos por mês (últimos 12 meses)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCostEntry {
    #[schema(example = "2024-03")]
    pub month: String,
    pub total: Decimal,
}

// 3. Serviços que mais pesam no bolso
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopServiceEntry {
    #[schema(example = "Troca de óleo")]
    pub service_type: String,
    pub occurrences: i64,
    pub total_cost: Decimal,
}
