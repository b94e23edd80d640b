// src/models/maintenance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub performed_on: NaiveDate,
    // Texto livre. É comparado (sem diferenciar maiúsculas) com o item das regras.
    #[schema(example = "Troca de óleo e filtro")]
    pub service_type: String,
    #[schema(example = 29200)]
    pub km: i32,
    #[schema(example = "249.90")]
    pub cost: Decimal,
    pub notes: Option<String>,
    // Referência ao anexo no storage (o upload em si fica fora deste backend)
    pub attachment_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenancePayload {
    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub performed_on: NaiveDate,

    #[validate(length(min = 1, message = "O tipo de serviço é obrigatório."))]
    #[schema(example = "Troca de óleo")]
    pub service_type: String,

    #[validate(range(min = 0, message = "A quilometragem não pode ser negativa."))]
    #[schema(example = 29200)]
    pub km: i32,

    #[schema(example = "249.90")]
    pub cost: Decimal,

    pub notes: Option<String>,
    pub attachment_ref: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenancePayload {
    #[schema(value_type = Option<String>, format = Date)]
    pub performed_on: Option<NaiveDate>,

    #[validate(length(min = 1, message = "O tipo de serviço é obrigatório."))]
    pub service_type: Option<String>,

    #[validate(range(min = 0, message = "A quilometragem não pode ser negativa."))]
    pub km: Option<i32>,

    pub cost: Option<Decimal>,

    // Campo ausente mantém o valor; `null` apaga
    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,

    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<String>)]
    pub attachment_ref: Option<Option<String>>,
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_tells_missing_notes_from_null_notes() {
        let missing: UpdateMaintenancePayload = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.notes, None);

        let cleared: UpdateMaintenancePayload =
            serde_json::from_str(r#"{"notes": null, "attachmentRef": null}"#).unwrap();
        assert_eq!(cleared.notes, Some(None));
        assert_eq!(cleared.attachment_ref, Some(None));

        let set: UpdateMaintenancePayload = serde_json::from_str(r#"{"notes": "Pneu trocado"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("Pneu trocado".to_string())));
        assert_eq!(set.attachment_ref, None);
    }
}
