// src/db/badge_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::stores::BadgeStore,
    models::badge::QualityBadge,
};

#[derive(Clone)]
pub struct BadgeRepository {
    pool: PgPool,
}

impl BadgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BadgeStore for BadgeRepository {
    async fn get(&self, vehicle_id: Uuid) -> Result<Option<QualityBadge>, AppError> {
        let badge = sqlx::query_as::<_, QualityBadge>("SELECT * FROM quality_badges WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(badge)
    }

    async fn upsert(&self, badge: &QualityBadge) -> Result<QualityBadge, AppError> {
        // UPSERT: um selo por veículo, sempre sobrescrito
        let saved = sqlx::query_as::<_, QualityBadge>(
            r#"
            INSERT INTO quality_badges (
                vehicle_id, tier, pct_critical, pct_high, pct_all,
                overdue_critical, overdue_high, overdue_medium, overdue_low, computed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (vehicle_id)
            DO UPDATE SET
                tier = EXCLUDED.tier,
                pct_critical = EXCLUDED.pct_critical,
                pct_high = EXCLUDED.pct_high,
                pct_all = EXCLUDED.pct_all,
                overdue_critical = EXCLUDED.overdue_critical,
                overdue_high = EXCLUDED.overdue_high,
                overdue_medium = EXCLUDED.overdue_medium,
                overdue_low = EXCLUDED.overdue_low,
                computed_at = EXCLUDED.computed_at
            RETURNING *
            "#,
        )
            .bind(badge.vehicle_id)
            .bind(badge.tier)
            .bind(badge.pct_critical)
            .bind(badge.pct_high)
            .bind(badge.pct_all)
            .bind(badge.overdue_critical)
            .bind(badge.overdue_high)
            .bind(badge.overdue_medium)
            .bind(badge.overdue_low)
            .bind(badge.computed_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }
}
