// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Veículo não encontrado")]
    VehicleNotFound,

    #[error("Manutenção não encontrada")]
    MaintenanceNotFound,

    // O hodômetro nunca pode voltar para trás do km inicial nem da última manutenção
    #[error("Quilometragem inválida: {km} km é menor que o mínimo permitido ({minimum} km)")]
    InvalidOdometer { km: i32, minimum: i32 },

    // Provedor remoto selecionado sem URL/chave configuradas
    #[error("Configuração ausente: {0}")]
    Configuration(String),

    // Montadora/modelo/versão não resolvidos no provedor remoto
    #[error("Não encontrado no provedor de revisões: {0}")]
    LookupNotFound(String),

    // Falha de rede/HTTP ao buscar o plano de revisões
    #[error("Falha ao consultar o provedor de revisões: {0}")]
    TransientFetch(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro ao exportar documento: {0}")]
    ExportError(String),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::TransientFetch(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ExportError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidOdometer { km, minimum } => {
                let body = Json(json!({
                    "error": "Quilometragem inválida.",
                    "details": { "km": km, "minimum": minimum },
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::LookupNotFound(ref what) => {
                let body = Json(json!({ "error": format!("Veículo sem plano de revisão: {}", what) }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::VehicleNotFound => (StatusCode::NOT_FOUND, "Veículo não encontrado."),
            AppError::MaintenanceNotFound => (StatusCode::NOT_FOUND, "Manutenção não encontrada."),
            AppError::TransientFetch(ref e) => {
                tracing::warn!("Provedor de revisões indisponível: {}", e);
                (StatusCode::BAD_GATEWAY, "O provedor de revisões está indisponível no momento.")
            }

            // Todo o resto (Configuration, DatabaseError, ExportError, InternalServerError) vira 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
