// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{FleetSummary, MonthlyCostEntry, TopServiceEntry},
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo da frota e dos alertas", body = FleetSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let summary = app_state.dashboard_service.summary(user.0.id, today).await?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/monthly-costs
#[utoipa::path(
    get,
    path = "/api/dashboard/monthly-costs",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Gastos por mês (últimos 12 meses)", body = Vec<MonthlyCostEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_monthly_costs(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let chart = app_state.dashboard_service.monthly_costs(user.0.id, today).await?;
    Ok((StatusCode::OK, Json(chart)))
}

// GET /api/dashboard/top-services
#[utoipa::path(
    get,
    path = "/api/dashboard/top-services",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Serviços com maior gasto acumulado", body = Vec<TopServiceEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_top_services(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let services = app_state.dashboard_service.top_services(user.0.id).await?;
    Ok((StatusCode::OK, Json(services)))
}
