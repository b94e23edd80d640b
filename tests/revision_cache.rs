//! Revision cache: fetch-once semantics, failure handling and invalidation.

mod common;

use std::{sync::Arc, time::Duration};

use common::{rule, MemoryRevisions, ScriptedProvider};
use garagem::{
    common::error::AppError, models::rule::Criticality,
    services::revision_cache::RevisionCacheService,
};
use uuid::Uuid;

fn plan() -> Vec<garagem::models::rule::MaintenanceRule> {
    vec![
        rule("Troca de óleo", Some(10000), Some(12), Criticality::Alta),
        rule("Correia dentada", Some(60000), None, Criticality::Critica),
    ]
}

fn service(store: &Arc<MemoryRevisions>, provider: &Arc<ScriptedProvider>) -> RevisionCacheService {
    RevisionCacheService::new(store.clone(), provider.clone())
}

#[tokio::test]
async fn first_call_fetches_and_later_calls_hit_the_cache() {
    let store = Arc::new(MemoryRevisions::default());
    let provider = Arc::new(ScriptedProvider::with_rules(plan()));
    let cache = service(&store, &provider);
    let vehicle_id = Uuid::new_v4();

    let first = cache.get_vehicle_revisions(vehicle_id, "Volkswagen", "Gol", 2019).await.unwrap();
    let second = cache.get_vehicle_revisions(vehicle_id, "Volkswagen", "Gol", 2019).await.unwrap();

    assert_eq!(provider.call_count(), 1);
    assert_eq!(first, plan());
    assert_eq!(second, plan());
    assert_eq!(store.row_count(vehicle_id), 2);
    assert!(store.is_fetched(vehicle_id));
}

#[tokio::test]
async fn provider_failure_is_swallowed_and_never_retried() {
    let store = Arc::new(MemoryRevisions::default());
    let provider = Arc::new(ScriptedProvider::failing_for("Fiat", plan()));
    let cache = service(&store, &provider);
    let vehicle_id = Uuid::new_v4();

    let first = cache.get_vehicle_revisions(vehicle_id, "Fiat", "Uno", 2010).await.unwrap();
    assert!(first.is_empty());
    assert!(store.is_fetched(vehicle_id));

    let second = cache.get_vehicle_revisions(vehicle_id, "Fiat", "Uno", 2010).await.unwrap();
    assert!(second.is_empty());
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn empty_plan_is_remembered() {
    let store = Arc::new(MemoryRevisions::default());
    let provider = Arc::new(ScriptedProvider::with_rules(Vec::new()));
    let cache = service(&store, &provider);
    let vehicle_id = Uuid::new_v4();

    cache.get_vehicle_revisions(vehicle_id, "Chery", "QQ", 2012).await.unwrap();
    cache.get_vehicle_revisions(vehicle_id, "Chery", "QQ", 2012).await.unwrap();

    assert_eq!(provider.call_count(), 1);
    assert_eq!(store.row_count(vehicle_id), 0);
}

#[tokio::test]
async fn clearing_allows_exactly_one_more_fetch() {
    let store = Arc::new(MemoryRevisions::default());
    let provider = Arc::new(ScriptedProvider::with_rules(plan()));
    let cache = service(&store, &provider);
    let vehicle_id = Uuid::new_v4();

    cache.get_vehicle_revisions(vehicle_id, "Volkswagen", "Gol", 2019).await.unwrap();
    let deleted = cache.clear_vehicle_revisions(vehicle_id).await.unwrap();
    assert_eq!(deleted, 2);
    assert!(!store.is_fetched(vehicle_id));

    cache.get_vehicle_revisions(vehicle_id, "Volkswagen", "Gol", 2019).await.unwrap();
    cache.get_vehicle_revisions(vehicle_id, "Volkswagen", "Gol", 2019).await.unwrap();

    assert_eq!(provider.call_count(), 2);
    assert_eq!(store.row_count(vehicle_id), 2);
}

#[tokio::test]
async fn concurrent_requests_for_one_vehicle_fetch_once() {
    let store = Arc::new(MemoryRevisions::default());
    let provider = Arc::new(ScriptedProvider {
        rules: plan(),
        delay: Some(Duration::from_millis(50)),
        ..Default::default()
    });
    let cache = service(&store, &provider);
    let vehicle_id = Uuid::new_v4();

    let (a, b) = tokio::join!(
        cache.get_vehicle_revisions(vehicle_id, "Volkswagen", "Gol", 2019),
        cache.get_vehicle_revisions(vehicle_id, "Volkswagen", "Gol", 2019),
    );

    assert_eq!(a.unwrap().len(), 2);
    assert_eq!(b.unwrap().len(), 2);
    assert_eq!(provider.call_count(), 1);
    assert_eq!(store.row_count(vehicle_id), 2);
    assert_eq!(cache.active_locks(), 0);
}

#[tokio::test]
async fn vehicle_locks_are_released_after_use() {
    let store = Arc::new(MemoryRevisions::default());
    let provider = Arc::new(ScriptedProvider::with_rules(plan()));
    let cache = service(&store, &provider);

    for _ in 0..3 {
        let vehicle_id = Uuid::new_v4();
        cache.get_vehicle_revisions(vehicle_id, "Volkswagen", "Gol", 2019).await.unwrap();
        cache.clear_vehicle_revisions(vehicle_id).await.unwrap();
    }

    assert_eq!(cache.active_locks(), 0);
}

#[tokio::test]
async fn different_vehicles_are_cached_independently() {
    let store = Arc::new(MemoryRevisions::default());
    let provider = Arc::new(ScriptedProvider::with_rules(plan()));
    let cache = service(&store, &provider);

    cache.get_vehicle_revisions(Uuid::new_v4(), "Volkswagen", "Gol", 2019).await.unwrap();
    cache.get_vehicle_revisions(Uuid::new_v4(), "Volkswagen", "Gol", 2019).await.unwrap();

    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn store_failure_propagates_and_leaves_flag_unset() {
    let store = Arc::new(MemoryRevisions::failing_inserts());
    let provider = Arc::new(ScriptedProvider::with_rules(plan()));
    let cache = service(&store, &provider);
    let vehicle_id = Uuid::new_v4();

    let result = cache.get_vehicle_revisions(vehicle_id, "Volkswagen", "Gol", 2019).await;

    assert!(matches!(result, Err(AppError::DatabaseError(_))));
    assert!(!store.is_fetched(vehicle_id));
}
