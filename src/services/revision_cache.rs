// src/services/revision_cache.rs

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RevisionCacheStore,
    models::{rule::MaintenanceRule, vehicle::Vehicle},
    services::rule_provider::RuleProvider,
};

type LockMap = Arc<Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>>;

/// Cache persistente do plano de revisões da montadora.
///
/// O provedor externo é consultado no máximo uma vez por veículo: depois da
/// primeira tentativa (com ou sem sucesso) a marca `revisions_fetched` fica
/// ligada até alguém limpar o cache.
#[derive(Clone)]
pub struct RevisionCacheService {
    store: Arc<dyn RevisionCacheStore>,
    provider: Arc<dyn RuleProvider>,
    // Serializa o "consulta -> busca -> marca" por veículo dentro do processo
    locks: LockMap,
}

// Trava de um veículo. Ao soltar, remove a entrada do mapa se ninguém mais a usa.
struct VehicleLock {
    locks: LockMap,
    vehicle_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for VehicleLock {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        drop(self.guard.take());
        let idle = locks
            .get(&self.vehicle_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&self.vehicle_id);
        }
    }
}

impl RevisionCacheService {
    pub fn new(store: Arc<dyn RevisionCacheStore>, provider: Arc<dyn RuleProvider>) -> Self {
        Self {
            store,
            provider,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn provider(&self) -> &Arc<dyn RuleProvider> {
        &self.provider
    }

    /// Quantos veículos têm trava em uso neste momento.
    pub fn active_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    async fn lock_vehicle(&self, vehicle_id: Uuid) -> VehicleLock {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(vehicle_id).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        VehicleLock { locks: self.locks.clone(), vehicle_id, guard: Some(guard) }
    }

    async fn cached_rules(&self, vehicle_id: Uuid) -> Result<Vec<MaintenanceRule>, AppError> {
        let cached = self.store.list_by_vehicle(vehicle_id).await?;
        if !cached.is_empty() {
            tracing::debug!("♻️ Revisões do veículo {} servidas do cache ({})", vehicle_id, cached.len());
        }
        Ok(cached.into_iter().map(|row| row.rule).collect())
    }

    async fn store_fetched(&self, vehicle_id: Uuid, rules: &[MaintenanceRule]) -> Result<(), AppError> {
        if !rules.is_empty() {
            let inserted = self.store.bulk_insert(vehicle_id, rules).await?;
            tracing::info!("📥 {} revisões salvas para o veículo {}", inserted, vehicle_id);
        }
        self.store.set_fetched_flag(vehicle_id, true).await
    }

    /// Regras da montadora para o veículo. Erros do provedor externo são
    /// engolidos (vira lista vazia); só falhas do banco sobem.
    pub async fn get_vehicle_revisions(
        &self,
        vehicle_id: Uuid,
        brand: &str,
        model: &str,
        year: i32,
    ) -> Result<Vec<MaintenanceRule>, AppError> {
        let _lock = self.lock_vehicle(vehicle_id).await;

        // 1. Já está no cache?
        let cached = self.cached_rules(vehicle_id).await?;
        if !cached.is_empty() {
            return Ok(cached);
        }

        // 2. Já tentamos antes e não veio nada
        if self.store.fetched_flag(vehicle_id).await? {
            return Ok(Vec::new());
        }

        // 3. Busca externa, uma única vez
        let rules = match self.provider.recommendations(brand, model, year).await {
            Ok(rules) => rules,
            Err(e) => {
                tracing::warn!(
                    "⚠️ Falha ao buscar revisões de {} {} {} (veículo {}): {}",
                    brand, model, year, vehicle_id, e
                );
                Vec::new()
            }
        };

        self.store_fetched(vehicle_id, &rules).await?;
        Ok(rules)
    }

    /// Variante usada por quem precisa das regras para avaliar o veículo:
    /// serve do cache quando há linhas; senão busca e grava, e a falha sobe.
    pub async fn vehicle_rules(&self, vehicle: &Vehicle) -> Result<Vec<MaintenanceRule>, AppError> {
        let _lock = self.lock_vehicle(vehicle.id).await;

        let cached = self.cached_rules(vehicle.id).await?;
        if !cached.is_empty() {
            return Ok(cached);
        }

        let rules = self
            .provider
            .recommendations(&vehicle.brand, &vehicle.model, vehicle.year)
            .await?;

        self.store_fetched(vehicle.id, &rules).await?;
        Ok(rules)
    }

    /// Apaga o cache e libera exatamente mais uma busca externa.
    pub async fn clear_vehicle_revisions(&self, vehicle_id: Uuid) -> Result<u64, AppError> {
        let _lock = self.lock_vehicle(vehicle_id).await;

        let deleted = self.store.delete_by_vehicle(vehicle_id).await?;
        self.store.set_fetched_flag(vehicle_id, false).await?;

        tracing::info!("🧹 Cache de revisões do veículo {} limpo ({} linhas)", vehicle_id, deleted);
        Ok(deleted)
    }
}

/// Fonte remota lida através do cache: alertas e selo de um veículo
/// cadastrado usam as revisões gravadas e só vão à API quando não há nenhuma.
#[derive(Clone)]
pub struct CachedRuleProvider {
    cache: RevisionCacheService,
}

impl CachedRuleProvider {
    pub fn new(cache: RevisionCacheService) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl RuleProvider for CachedRuleProvider {
    async fn recommendations(
        &self,
        brand: &str,
        model: &str,
        year: i32,
    ) -> Result<Vec<MaintenanceRule>, AppError> {
        // Sem veículo não há chave de cache
        self.cache.provider().recommendations(brand, model, year).await
    }

    async fn rules_for_vehicle(&self, vehicle: &Vehicle) -> Result<Vec<MaintenanceRule>, AppError> {
        self.cache.vehicle_rules(vehicle).await
    }
}
