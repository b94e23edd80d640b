// src/services/dashboard_service.rs

use std::sync::Arc;

use chrono::{Datelike, Duration, Months, NaiveDate};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DashboardStore,
    models::{
        alert::AlertStatus,
        dashboard::{FleetSummary, MonthlyCostEntry, TopServiceEntry},
    },
    services::alert_service::AlertService,
};

const TOP_SERVICES_LIMIT: i64 = 5;

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn DashboardStore>,
    alerts: AlertService,
}

impl DashboardService {
    pub fn new(store: Arc<dyn DashboardStore>, alerts: AlertService) -> Self {
        Self { store, alerts }
    }

    pub async fn summary(&self, user_id: Uuid, today: NaiveDate) -> Result<FleetSummary, AppError> {
        let totals = self.store.fleet_totals(user_id, today - Duration::days(30)).await?;
        let alerts = self.alerts.alerts_for_user(user_id, today).await?;

        let count = |status: AlertStatus| alerts.iter().filter(|a| a.status == status).count() as i64;

        Ok(FleetSummary {
            vehicle_count: totals.vehicle_count,
            maintenance_count: totals.maintenance_count,
            total_spent: totals.total_spent,
            spent_last_30_days: totals.spent_last_30_days,
            overdue_alerts: count(AlertStatus::Overdue),
            due_soon_alerts: count(AlertStatus::DueSoon),
        })
    }

    /// Gastos agrupados por mês, do 1º dia de 11 meses atrás até hoje.
    pub async fn monthly_costs(&self, user_id: Uuid, today: NaiveDate) -> Result<Vec<MonthlyCostEntry>, AppError> {
        self.store.monthly_costs(user_id, twelve_month_window_start(today)).await
    }

    pub async fn top_services(&self, user_id: Uuid) -> Result<Vec<TopServiceEntry>, AppError> {
        self.store.top_services(user_id, TOP_SERVICES_LIMIT).await
    }
}

pub fn twelve_month_window_start(today: NaiveDate) -> NaiveDate {
    let first_of_month = today.with_day(1).unwrap_or(today);
    first_of_month
        .checked_sub_months(Months::new(11))
        .unwrap_or(first_of_month)
}
