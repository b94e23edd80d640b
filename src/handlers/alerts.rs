// src/handlers/alerts.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{alert::Alert, badge::QualityBadge},
};

// GET /api/alerts
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "Alerts",
    responses(
        (status = 200, description = "Alertas de todos os veículos, atrasados primeiro", body = Vec<Alert>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_alerts(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let alerts = app_state.alert_service.alerts_for_user(user.0.id, today).await?;
    Ok((StatusCode::OK, Json(alerts)))
}

// GET /api/vehicles/{id}/alerts
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/alerts",
    tag = "Alerts",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Alertas do veículo", body = Vec<Alert>),
        (status = 404, description = "Veículo não encontrado"),
        (status = 502, description = "Fonte de regras indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn vehicle_alerts(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let alerts = app_state
        .alert_service
        .alerts_for_vehicle(user.0.id, vehicle_id, today)
        .await?;
    Ok((StatusCode::OK, Json(alerts)))
}

// GET /api/vehicles/{id}/badge
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/badge",
    tag = "Badges",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Último selo calculado", body = QualityBadge),
        (status = 404, description = "Veículo não encontrado ou selo ainda não calculado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_badge(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    match app_state.badge_service.get_badge(user.0.id, vehicle_id).await? {
        Some(badge) => Ok((StatusCode::OK, Json(badge)).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

// POST /api/vehicles/{id}/badge
#[utoipa::path(
    post,
    path = "/api/vehicles/{id}/badge",
    tag = "Badges",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Selo recalculado e gravado", body = QualityBadge),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn recompute_badge(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let badge = app_state
        .badge_service
        .recompute_badge(user.0.id, vehicle_id, today)
        .await?;
    Ok((StatusCode::OK, Json(badge)))
}
