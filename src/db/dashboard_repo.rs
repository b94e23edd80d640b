// src/db/dashboard_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::stores::DashboardStore,
    models::dashboard::{FleetTotals, MonthlyCostEntry, TopServiceEntry},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardStore for DashboardRepository {
    // 1. Totais gerais da frota do usuário
    async fn fleet_totals(&self, user_id: Uuid, since: NaiveDate) -> Result<FleetTotals, AppError> {
        let totals = sqlx::query_as::<_, FleetTotals>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM vehicles WHERE user_id = $1) AS vehicle_count,
                COUNT(m.id) AS maintenance_count,
                COALESCE(SUM(m.cost), 0) AS total_spent,
                COALESCE(SUM(m.cost) FILTER (WHERE m.performed_on >= $2), 0) AS spent_last_30_days
            FROM maintenances m
            JOIN vehicles v ON m.vehicle_id = v.id
            WHERE v.user_id = $1
            "#,
        )
            .bind(user_id)
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(totals)
    }

    // 2. Gráfico de barras (gasto por mês)
    async fn monthly_costs(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<MonthlyCostEntry>, AppError> {
        let data = sqlx::query_as::<_, MonthlyCostEntry>(
            r#"
            SELECT
                to_char(m.performed_on, 'YYYY-MM') AS month,
                SUM(m.cost) AS total
            FROM maintenances m
            JOIN vehicles v ON m.vehicle_id = v.id
            WHERE v.user_id = $1
              AND m.performed_on >= $2
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
            .bind(user_id)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        Ok(data)
    }

    // 3. Serviços com maior gasto acumulado
    async fn top_services(&self, user_id: Uuid, limit: i64) -> Result<Vec<TopServiceEntry>, AppError> {
        let data = sqlx::query_as::<_, TopServiceEntry>(
            r#"
            SELECT
                m.service_type,
                COUNT(*) AS occurrences,
                SUM(m.cost) AS total_cost
            FROM maintenances m
            JOIN vehicles v ON m.vehicle_id = v.id
            WHERE v.user_id = $1
            GROUP BY m.service_type
            ORDER BY total_cost DESC
            LIMIT $2
            "#,
        )
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(data)
    }
}
