// src/services/rule_provider.rs

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{
        rule::{Criticality, MaintenanceKind, MaintenanceRule},
        vehicle::Vehicle,
    },
};

/// Fonte das regras de manutenção. Cada implantação usa exatamente uma
/// (catálogo fixo ou plano da montadora), escolhida na configuração.
#[async_trait]
pub trait RuleProvider: Send + Sync {
    async fn recommendations(
        &self,
        brand: &str,
        model: &str,
        year: i32,
    ) -> Result<Vec<MaintenanceRule>, AppError>;

    /// Regras de um veículo já cadastrado. Fontes com cache por veículo sobrescrevem.
    async fn rules_for_vehicle(&self, vehicle: &Vehicle) -> Result<Vec<MaintenanceRule>, AppError> {
        self.recommendations(&vehicle.brand, &vehicle.model, vehicle.year).await
    }

    /// Categorias distintas, na ordem em que aparecem nas regras.
    async fn categories(&self, brand: &str, model: &str, year: i32) -> Result<Vec<String>, AppError> {
        let rules = self.recommendations(brand, model, year).await?;
        Ok(distinct_categories(&rules))
    }
}

pub fn distinct_categories(rules: &[MaintenanceRule]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for rule in rules {
        if !categories.iter().any(|c| c == &rule.category) {
            categories.push(rule.category.clone());
        }
    }
    categories
}

// =============================================================================
//  CATÁLOGO FIXO
// =============================================================================

/// Catálogo genérico em memória. Não depende do veículo nem de rede.
#[derive(Clone)]
pub struct StaticRuleProvider {
    rules: Vec<MaintenanceRule>,
}

impl StaticRuleProvider {
    pub fn new() -> Self {
        Self { rules: default_catalog() }
    }

    pub fn with_rules(rules: Vec<MaintenanceRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[MaintenanceRule] {
        &self.rules
    }
}

impl Default for StaticRuleProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuleProvider for StaticRuleProvider {
    async fn recommendations(
        &self,
        _brand: &str,
        _model: &str,
        _year: i32,
    ) -> Result<Vec<MaintenanceRule>, AppError> {
        Ok(self.rules.clone())
    }
}

// Valores em centavos para não depender de parse em runtime
fn reais(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[allow(clippy::too_many_arguments)]
fn preventive(
    category: &str,
    item: &str,
    description: &str,
    km_interval: Option<i32>,
    month_interval: Option<i32>,
    criticality: Criticality,
    cost: Option<(i64, i64)>,
) -> MaintenanceRule {
    MaintenanceRule {
        category: category.to_string(),
        item: item.to_string(),
        description: description.to_string(),
        km_interval,
        month_interval,
        kind: MaintenanceKind::Preventiva,
        criticality,
        cost_min: cost.map(|(min, _)| reais(min)),
        cost_max: cost.map(|(_, max)| reais(max)),
    }
}

pub fn default_catalog() -> Vec<MaintenanceRule> {
    use Criticality::*;

    vec![
        // --- Motor ---
        preventive("Motor", "Troca de óleo",
            "Substituir o óleo do motor conforme a viscosidade indicada no manual",
            Some(10000), Some(12), Alta, Some((15000, 35000))),
        preventive("Motor", "Filtro de óleo",
            "Substituir o filtro de óleo junto com a troca de óleo",
            Some(10000), Some(12), Alta, Some((3000, 8000))),
        preventive("Motor", "Filtro de ar",
            "Substituir o elemento do filtro de ar do motor",
            Some(15000), Some(12), Media, Some((4000, 12000))),
        preventive("Motor", "Filtro de combustível",
            "Substituir o filtro de combustível",
            Some(20000), Some(24), Media, Some((5000, 15000))),
        preventive("Motor", "Correia dentada",
            "Substituir correia dentada e tensor; o rompimento danifica o motor",
            Some(60000), Some(48), Critica, Some((60000, 150000))),
        preventive("Motor", "Velas de ignição",
            "Substituir as velas de ignição",
            Some(30000), Some(36), Media, Some((12000, 40000))),
        preventive("Arrefecimento", "Líquido de arrefecimento",
            "Trocar o aditivo do sistema de arrefecimento",
            Some(40000), Some(24), Alta, Some((10000, 25000))),

        // --- Freios ---
        preventive("Freios", "Pastilhas de freio",
            "Inspecionar e substituir as pastilhas dianteiras",
            Some(30000), None, Critica, Some((15000, 40000))),
        preventive("Freios", "Fluido de freio",
            "Substituir o fluido de freio (higroscópico, perde eficiência com o tempo)",
            None, Some(24), Critica, Some((8000, 20000))),

        // --- Pneus e suspensão ---
        preventive("Pneus", "Rodízio de pneus",
            "Fazer o rodízio dos pneus para desgaste uniforme",
            Some(10000), None, Media, Some((5000, 10000))),
        preventive("Pneus", "Alinhamento e balanceamento",
            "Alinhar a direção e balancear as rodas",
            Some(10000), Some(12), Media, Some((8000, 18000))),
        preventive("Pneus", "Pneus",
            "Verificar sulcos (mínimo 1,6 mm) e substituir quando necessário",
            Some(50000), Some(60), Critica, Some((120000, 320000))),
        preventive("Suspensão", "Amortecedores",
            "Inspecionar vazamentos e eficiência dos amortecedores",
            Some(40000), None, Alta, Some((80000, 200000))),

        // --- Elétrica e conforto ---
        preventive("Elétrica", "Bateria",
            "Testar a carga e os terminais da bateria",
            None, Some(24), Media, Some((35000, 70000))),
        preventive("Conforto", "Filtro de cabine",
            "Substituir o filtro do ar-condicionado",
            Some(15000), Some(12), Baixa, Some((4000, 10000))),
        preventive("Conforto", "Palhetas do limpador",
            "Substituir as palhetas do limpador de para-brisa",
            None, Some(12), Baixa, Some((5000, 12000))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_items_are_unique_and_have_some_interval() {
        let catalog = default_catalog();
        for rule in &catalog {
            assert!(
                rule.km_interval.is_some() || rule.month_interval.is_some(),
                "{} sem intervalo",
                rule.item
            );
            let same_name = catalog.iter().filter(|r| r.item == rule.item).count();
            assert_eq!(same_name, 1, "item duplicado: {}", rule.item);
        }
    }

    #[test]
    fn catalog_cost_ranges_are_ordered() {
        for rule in default_catalog() {
            if let (Some(min), Some(max)) = (rule.cost_min, rule.cost_max) {
                assert!(min <= max, "faixa invertida em {}", rule.item);
            }
        }
    }

    #[tokio::test]
    async fn categories_keep_first_appearance_order() {
        let provider = StaticRuleProvider::new();
        let categories = provider.categories("Fiat", "Uno", 2015).await.unwrap();

        assert_eq!(categories.first().map(String::as_str), Some("Motor"));
        assert!(categories.contains(&"Freios".to_string()));
        let unique: std::collections::HashSet<_> = categories.iter().collect();
        assert_eq!(unique.len(), categories.len());
    }
}
