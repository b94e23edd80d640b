// src/handlers/vehicles.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        maintenance::{CreateMaintenancePayload, MaintenanceRecord, UpdateMaintenancePayload},
        rule::MaintenanceRule,
        vehicle::{CreateVehiclePayload, UpdateVehiclePayload, Vehicle},
    },
    services::{revision_cache::RevisionCacheService, rule_provider::distinct_categories},
};

// =============================================================================
//  VEÍCULOS
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "Vehicles",
    request_body = CreateVehiclePayload,
    responses(
        (status = 201, description = "Veículo cadastrado", body = Vehicle),
        (status = 400, description = "Dados inválidos"),
        (status = 422, description = "Hodômetro abaixo do km inicial")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_vehicle(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateVehiclePayload>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.create_vehicle(user.0.id, payload).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "Vehicles",
    responses(
        (status = 200, description = "Veículos do usuário", body = Vec<Vehicle>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_vehicles(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let vehicles = app_state.vehicle_service.list_vehicles(user.0.id).await?;
    Ok((StatusCode::OK, Json(vehicles)))
}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Veículo", body = Vehicle),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_vehicle(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.get_vehicle(user.0.id, vehicle_id).await?;
    Ok((StatusCode::OK, Json(vehicle)))
}

#[utoipa::path(
    patch,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    request_body = UpdateVehiclePayload,
    responses(
        (status = 200, description = "Veículo atualizado", body = Vehicle),
        (status = 404, description = "Veículo não encontrado"),
        (status = 422, description = "Hodômetro abaixo do permitido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_vehicle(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
    Json(payload): Json<UpdateVehiclePayload>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state
        .vehicle_service
        .update_vehicle(user.0.id, vehicle_id, payload)
        .await?;
    Ok((StatusCode::OK, Json(vehicle)))
}

#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 204, description = "Veículo removido com o histórico"),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_vehicle(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.vehicle_service.delete_vehicle(user.0.id, vehicle_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  MANUTENÇÕES
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/vehicles/{id}/maintenances",
    tag = "Maintenances",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    request_body = CreateMaintenancePayload,
    responses(
        (status = 201, description = "Manutenção registrada", body = MaintenanceRecord),
        (status = 404, description = "Veículo não encontrado"),
        (status = 422, description = "Km abaixo do km inicial do veículo")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_maintenance(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
    Json(payload): Json<CreateMaintenancePayload>,
) -> Result<impl IntoResponse, AppError> {
    let record = app_state
        .maintenance_service
        .create_maintenance(user.0.id, vehicle_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/maintenances",
    tag = "Maintenances",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Histórico, mais recente primeiro", body = Vec<MaintenanceRecord>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_maintenances(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state
        .maintenance_service
        .list_maintenances(user.0.id, vehicle_id)
        .await?;
    Ok((StatusCode::OK, Json(records)))
}

#[utoipa::path(
    patch,
    path = "/api/vehicles/{id}/maintenances/{maintenance_id}",
    tag = "Maintenances",
    params(
        ("id" = Uuid, Path, description = "ID do veículo"),
        ("maintenance_id" = Uuid, Path, description = "ID da manutenção")
    ),
    request_body = UpdateMaintenancePayload,
    responses(
        (status = 200, description = "Manutenção atualizada", body = MaintenanceRecord),
        (status = 404, description = "Manutenção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_maintenance(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((vehicle_id, maintenance_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateMaintenancePayload>,
) -> Result<impl IntoResponse, AppError> {
    let record = app_state
        .maintenance_service
        .update_maintenance(user.0.id, vehicle_id, maintenance_id, payload)
        .await?;
    Ok((StatusCode::OK, Json(record)))
}

#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}/maintenances/{maintenance_id}",
    tag = "Maintenances",
    params(
        ("id" = Uuid, Path, description = "ID do veículo"),
        ("maintenance_id" = Uuid, Path, description = "ID da manutenção")
    ),
    responses(
        (status = 204, description = "Manutenção removida"),
        (status = 404, description = "Manutenção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_maintenance(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((vehicle_id, maintenance_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .maintenance_service
        .delete_maintenance(user.0.id, vehicle_id, maintenance_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  REGRAS E REVISÕES
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/rules",
    tag = "Rules",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Regras da fonte ativa para o veículo", body = Vec<MaintenanceRule>),
        (status = 404, description = "Veículo (ou marca/modelo na API externa) não encontrado"),
        (status = 502, description = "Falha na API externa")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_rules(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.get_vehicle(user.0.id, vehicle_id).await?;
    let rules = app_state.rule_provider.rules_for_vehicle(&vehicle).await?;
    Ok((StatusCode::OK, Json(rules)))
}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/rules/categories",
    tag = "Rules",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Categorias distintas das regras", body = Vec<String>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_rule_categories(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.get_vehicle(user.0.id, vehicle_id).await?;
    let rules = app_state.rule_provider.rules_for_vehicle(&vehicle).await?;
    let categories = distinct_categories(&rules);
    Ok((StatusCode::OK, Json(categories)))
}

fn revision_cache(app_state: &AppState) -> Result<&RevisionCacheService, AppError> {
    app_state
        .revision_cache
        .as_ref()
        .ok_or_else(|| AppError::Configuration("Cache de revisões exige RULE_SOURCE=remote".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/revisions",
    tag = "Rules",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Plano da montadora (busca externa no máximo uma vez)", body = Vec<MaintenanceRule>),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_revisions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.get_vehicle(user.0.id, vehicle_id).await?;
    let rules = revision_cache(&app_state)?
        .get_vehicle_revisions(vehicle.id, &vehicle.brand, &vehicle.model, vehicle.year)
        .await?;
    Ok((StatusCode::OK, Json(rules)))
}

#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}/revisions",
    tag = "Rules",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 204, description = "Cache limpo; a próxima consulta busca de novo"),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn clear_revisions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.get_vehicle(user.0.id, vehicle_id).await?;
    revision_cache(&app_state)?.clear_vehicle_revisions(vehicle.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
