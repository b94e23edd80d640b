// src/services/remote_rules.rs
//
// Provedor de regras a partir do plano de revisões da montadora, consultado
// numa API de terceiros em quatro etapas:
// montadora -> modelo -> versão (por ano) -> plano.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    common::error::AppError,
    models::rule::{Criticality, MaintenanceKind, MaintenanceRule},
    services::rule_provider::RuleProvider,
};

const API_KEY_HEADER: &str = "x-api-key";

pub const PARTS_CATEGORY: &str = "Peças";
pub const INSPECTIONS_CATEGORY: &str = "Inspeções";

// Itens de segurança sempre sobem para criticidade máxima
const SAFETY_KEYWORDS: &[&str] = &[
    "freio", "brake", "correia dentada", "timing belt", "pneu", "tyre", "tire",
    "direção", "direcao", "steering", "airbag",
];

// --- Esquema da API externa ---

#[derive(Debug, Clone, Deserialize)]
pub struct ApiNamed {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiVersion {
    pub id: i64,
    pub name: String,
    pub year: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlanItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub km_interval: Option<i32>,
    #[serde(default)]
    pub month_interval: Option<i32>,
    #[serde(default)]
    pub cost: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiPlan {
    #[serde(default)]
    pub parts_to_replace: Vec<ApiPlanItem>,
    #[serde(default)]
    pub inspections: Vec<ApiPlanItem>,
}

#[derive(Clone)]
pub struct RemoteRuleProvider {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl RemoteRuleProvider {
    /// URL e chave são opcionais aqui: a falta delas só vira erro na hora da chamada.
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
            api_key,
        }
    }

    fn credentials(&self) -> Result<(&str, &str), AppError> {
        match (self.base_url.as_deref(), self.api_key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Ok((url, key)),
            _ => Err(AppError::Configuration(
                "REVISION_API_URL e REVISION_API_KEY são obrigatórias com RULE_SOURCE=remote".to_string(),
            )),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let (base_url, api_key) = self.credentials()?;

        let response = self.client
            .get(format!("{}{}", base_url, path))
            .header(API_KEY_HEADER, api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::LookupNotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(AppError::TransientFetch(format!("{} respondeu {}", path, status)));
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn resolve_maker(&self, brand: &str) -> Result<i64, AppError> {
        let makers: Vec<ApiNamed> = self
            .get_json("/makers", &[("name", brand.to_string())])
            .await?;

        pick_by_name(&makers, brand)
            .map(|m| m.id)
            .ok_or_else(|| AppError::LookupNotFound(format!("montadora '{}'", brand)))
    }

    pub async fn resolve_model(&self, maker_id: i64, model: &str) -> Result<i64, AppError> {
        let models: Vec<ApiNamed> = self
            .get_json(&format!("/makers/{}/models", maker_id), &[("name", model.to_string())])
            .await?;

        pick_by_name(&models, model)
            .map(|m| m.id)
            .ok_or_else(|| AppError::LookupNotFound(format!("modelo '{}'", model)))
    }

    pub async fn resolve_version(&self, model_id: i64, year: i32) -> Result<i64, AppError> {
        let versions: Vec<ApiVersion> = self
            .get_json(&format!("/models/{}/versions", model_id), &[("year", year.to_string())])
            .await?;

        versions
            .iter()
            .find(|v| v.year == year)
            .map(|v| v.id)
            .ok_or_else(|| AppError::LookupNotFound(format!("versão do ano {}", year)))
    }

    pub async fn fetch_plan(&self, version_id: i64) -> Result<ApiPlan, AppError> {
        self.get_json(&format!("/versions/{}/maintenance-plan", version_id), &[])
            .await
    }
}

#[async_trait]
impl RuleProvider for RemoteRuleProvider {
    async fn recommendations(
        &self,
        brand: &str,
        model: &str,
        year: i32,
    ) -> Result<Vec<MaintenanceRule>, AppError> {
        let maker_id = self.resolve_maker(brand).await?;
        let model_id = self.resolve_model(maker_id, model).await?;
        let version_id = self.resolve_version(model_id, year).await?;
        let plan = self.fetch_plan(version_id).await?;

        let rules = plan_to_rules(&plan);
        tracing::debug!(
            "📋 Plano da montadora para {} {} {}: {} regras",
            brand, model, year, rules.len()
        );
        Ok(rules)
    }
}

/// Igualdade sem diferenciar maiúsculas; na falta dela, o primeiro que contém o nome.
pub fn pick_by_name<'a>(candidates: &'a [ApiNamed], name: &str) -> Option<&'a ApiNamed> {
    let wanted = name.trim().to_lowercase();
    candidates
        .iter()
        .find(|c| c.name.trim().to_lowercase() == wanted)
        .or_else(|| {
            candidates
                .iter()
                .find(|c| c.name.to_lowercase().contains(&wanted))
        })
}

pub fn plan_to_rules(plan: &ApiPlan) -> Vec<MaintenanceRule> {
    let parts = plan
        .parts_to_replace
        .iter()
        .map(|item| to_rule(item, PARTS_CATEGORY, Criticality::Alta));
    let inspections = plan
        .inspections
        .iter()
        .map(|item| to_rule(item, INSPECTIONS_CATEGORY, Criticality::Media));

    parts.chain(inspections).collect()
}

fn to_rule(item: &ApiPlanItem, category: &str, base: Criticality) -> MaintenanceRule {
    let name = item.name.to_lowercase();
    let criticality = if SAFETY_KEYWORDS.iter().any(|k| name.contains(k)) {
        Criticality::Critica
    } else {
        base
    };

    MaintenanceRule {
        category: category.to_string(),
        item: item.name.clone(),
        description: item.description.clone().unwrap_or_default(),
        km_interval: item.km_interval.filter(|km| *km > 0),
        month_interval: item.month_interval.filter(|m| *m > 0),
        kind: MaintenanceKind::Preventiva,
        criticality,
        cost_min: item.cost,
        cost_max: item.cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: i64, name: &str) -> ApiNamed {
        ApiNamed { id, name: name.to_string() }
    }

    #[test]
    fn pick_by_name_prefers_exact_match_over_substring() {
        let candidates = vec![named(1, "Gol G5"), named(2, "GOL"), named(3, "Golf")];
        assert_eq!(pick_by_name(&candidates, "gol").map(|c| c.id), Some(2));
    }

    #[test]
    fn pick_by_name_falls_back_to_substring() {
        let candidates = vec![named(7, "Onix Plus"), named(8, "Prisma")];
        assert_eq!(pick_by_name(&candidates, "onix").map(|c| c.id), Some(7));
        assert!(pick_by_name(&candidates, "Civic").is_none());
    }

    #[test]
    fn plan_items_are_mapped_into_rules() {
        let plan: ApiPlan = serde_json::from_value(serde_json::json!({
            "parts_to_replace": [
                { "name": "Óleo do motor", "km_interval": 10000, "month_interval": 12, "cost": 220.5 },
                { "name": "Pastilhas de freio", "km_interval": 30000 }
            ],
            "inspections": [
                { "name": "Suspensão", "km_interval": 20000, "description": "Verificar buchas" },
                { "name": "Direção hidráulica", "month_interval": 0 }
            ]
        }))
        .unwrap();

        let rules = plan_to_rules(&plan);
        assert_eq!(rules.len(), 4);

        assert_eq!(rules[0].category, PARTS_CATEGORY);
        assert_eq!(rules[0].criticality, Criticality::Alta);
        assert_eq!(rules[0].cost_min, Some(Decimal::new(2205, 1)));
        assert_eq!(rules[0].cost_min, rules[0].cost_max);

        assert_eq!(rules[1].criticality, Criticality::Critica);

        assert_eq!(rules[2].category, INSPECTIONS_CATEGORY);
        assert_eq!(rules[2].criticality, Criticality::Media);
        assert_eq!(rules[2].description, "Verificar buchas");

        // Intervalo zero equivale a "sem intervalo"; direção é item de segurança
        assert_eq!(rules[3].month_interval, None);
        assert_eq!(rules[3].criticality, Criticality::Critica);
    }

    #[tokio::test]
    async fn missing_credentials_is_a_configuration_error() {
        let provider = RemoteRuleProvider::new(None, Some("chave".to_string()));
        let result = provider.recommendations("Fiat", "Uno", 2015).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
