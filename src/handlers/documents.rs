// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser};

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/export.csv",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Histórico em CSV"),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_csv(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (vehicle, bytes) = app_state.document_service.export_csv(user.0.id, vehicle_id).await?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"manutencoes_{}.csv\"", vehicle.plate)),
    ];

    Ok((headers, bytes).into_response())
}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/export.pdf",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Histórico em PDF"),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_pdf(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (vehicle, bytes) = app_state.document_service.export_pdf(user.0.id, vehicle_id).await?;

    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"manutencoes_{}.pdf\"", vehicle.plate)),
    ];

    Ok((headers, bytes).into_response())
}
