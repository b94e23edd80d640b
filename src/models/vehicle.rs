// src/models/vehicle.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(ignore)] // Vem do token, não precisa aparecer na doc pública
    pub user_id: Uuid,
    #[schema(example = "Volkswagen")]
    pub brand: String,
    #[schema(example = "Gol")]
    pub model: String,
    #[schema(example = 2019)]
    pub year: i32,
    #[schema(example = "ABC1D23")]
    pub plate: String,
    // Hodômetro no momento do cadastro
    #[schema(example = 28000)]
    pub initial_km: i32,
    // Última leitura conhecida do hodômetro
    #[schema(example = 31000)]
    pub current_km: i32,
    // Marca se o plano da montadora já foi buscado (com ou sem sucesso)
    pub revisions_fetched: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Nome curto usado nas mensagens de alerta ("Volkswagen Gol 2019").
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.brand, self.model, self.year)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehiclePayload {
    #[validate(length(min = 1, message = "A marca é obrigatória."))]
    #[schema(example = "Volkswagen")]
    pub brand: String,

    #[validate(length(min = 1, message = "O modelo é obrigatório."))]
    #[schema(example = "Gol")]
    pub model: String,

    #[validate(range(min = 1950, max = 2100, message = "Ano inválido."))]
    #[schema(example = 2019)]
    pub year: i32,

    #[validate(length(min = 7, max = 8, message = "Placa inválida."))]
    #[schema(example = "ABC-1D23")]
    pub plate: String,

    #[validate(range(min = 0, message = "A quilometragem não pode ser negativa."))]
    #[schema(example = 28000)]
    pub initial_km: i32,

    // Se ausente, assume o km inicial
    #[validate(range(min = 0, message = "A quilometragem não pode ser negativa."))]
    #[schema(example = 31000)]
    pub current_km: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehiclePayload {
    #[validate(length(min = 1, message = "A marca é obrigatória."))]
    pub brand: Option<String>,

    #[validate(length(min = 1, message = "O modelo é obrigatório."))]
    pub model: Option<String>,

    #[validate(range(min = 1950, max = 2100, message = "Ano inválido."))]
    pub year: Option<i32>,

    #[validate(length(min = 7, max = 8, message = "Placa inválida."))]
    pub plate: Option<String>,

    #[validate(range(min = 0, message = "A quilometragem não pode ser negativa."))]
    #[schema(example = 32500)]
    pub current_km: Option<i32>,
}

/// Normaliza a placa para o formato armazenado: maiúsculas, sem hífen nem espaços.
pub fn normalize_plate(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

// Dados já normalizados, prontos para o INSERT
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub initial_km: i32,
    pub current_km: i32,
}
